use serde::Serialize;

use super::version_record::VersionRecord;

/// Account-wide reduction over all version records
#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    /// Count of distinct subgraph ids
    pub total_subgraphs: usize,
    /// Count of version records
    pub total_versions: usize,
    /// Sum of the trailing query volume across versions
    pub total_query_volume: f64,
    /// Versions with a positive query volume
    pub subgraphs_with_queries: usize,
    /// Distinct indexers backing at least one version
    pub unique_indexer_count: usize,
    /// Sum of per-version allocation counts; double-counts an indexer
    /// backing multiple versions
    pub total_indexer_instances: usize,
    pub responding_indexers: usize,
    pub synced_indexers: usize,
    pub healthy_indexers: usize,
    /// Percentage of versions with at least one fully synced indexer,
    /// 0 when there are no versions
    pub sync_rate: f64,
}

/// A version flagged as problematic: active indexers, a known sync
/// percentage, and sync below 100%
#[derive(Debug, Clone, Serialize)]
pub struct ProblemVersion {
    #[serde(flatten)]
    pub record: VersionRecord,
    /// Whether this is the highest-numbered version of its subgraph
    pub is_latest: bool,
    /// Signal amount scaled for display
    pub signal_display: String,
}

/// Full output of one aggregation run, handed to presentation/export
#[derive(Debug, Clone, Serialize)]
pub struct AccountReport {
    /// The account the run was performed for
    pub account: String,
    pub summary: AccountSummary,
    /// Every version record, registry order
    pub versions: Vec<VersionRecord>,
    /// Top five versions by signal amount (non-zero signal only)
    pub top_by_signal: Vec<VersionRecord>,
    /// Top five versions by query volume (positive volume only)
    pub top_by_queries: Vec<VersionRecord>,
    pub problematic: Vec<ProblemVersion>,
}
