use serde::Serialize;

use super::deployment::signal_tokens;
use super::indexer_status::{parse_percentage, IndexerStatus};

/// Aggregated status of one deployment version
///
/// The per-indexer detail lives in a single ordered `indexers` list; the
/// joined display strings are derived from it on demand so the id, URL and
/// percentage views can never fall out of alignment.
#[derive(Debug, Clone, Serialize)]
pub struct VersionRecord {
    pub subgraph_id: String,
    pub version: u32,
    pub ipfs_hash: String,
    /// Raw signal amount, see [`super::DeploymentVersion::signal_amount`]
    pub signal_amount: String,
    /// Per-indexer statuses, upstream report order
    pub indexers: Vec<IndexerStatus>,
    /// Number of active allocations for this version
    pub indexer_count: usize,
    /// Indexers that carried a successful progress report
    pub indexers_responding: usize,
    /// Indexers whose sync percentage reached 100
    pub indexers_synced: usize,
    /// Indexers reporting healthy
    pub indexers_healthy: usize,
    /// Highest sync percentage among reporting indexers, else `"0%"`
    pub sync_percentage: String,
    /// Query count over the trailing volume window
    pub query_volume_30d: f64,
    /// Day span of the volume window
    pub query_volume_days: u32,
}

impl VersionRecord {
    /// Raw signal amount as an integer token quantity
    pub fn signal_tokens(&self) -> u128 {
        signal_tokens(&self.signal_amount)
    }

    /// Joined indexer addresses, `"None"` when no indexer is active
    pub fn active_indexer_ids(&self) -> String {
        self.joined(|s| s.indexer_id.clone())
    }

    /// Joined indexer display URLs, `"None"` when no indexer is active
    pub fn indexer_urls(&self) -> String {
        self.joined(|s| s.indexer_url.clone())
    }

    /// Joined per-indexer sync percentages, `"None"` when no indexer is active
    pub fn indexer_sync_percentages(&self) -> String {
        self.joined(|s| s.sync_percentage.clone())
    }

    /// Numeric value of the version-level sync percentage, `None` for `"N/A"`
    pub fn numeric_sync_percentage(&self) -> Option<u64> {
        parse_percentage(&self.sync_percentage)
    }

    /// Whether at least one indexer has fully synced this version
    pub fn has_synced_indexer(&self) -> bool {
        self.indexers_synced > 0
    }

    fn joined<F>(&self, field: F) -> String
    where
        F: Fn(&IndexerStatus) -> String,
    {
        if self.indexers.is_empty() {
            return "None".to_string();
        }
        self.indexers
            .iter()
            .map(|s| field(s))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
