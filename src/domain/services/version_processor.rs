use std::sync::Arc;
use std::time::Duration;

use crate::config::MonitorConfig;
use crate::domain::models::{DeploymentVersion, IndexerStatus, VersionRecord};
use crate::infrastructure::api::fetch::{with_timeout, FetchOutcome};
use crate::infrastructure::api::{ManifestStore, ProgressFeed, QueryVolumeFeed};
use crate::utils::logging;

use super::start_block::resolve_start_block;
use super::telemetry::{normalize_statuses, unreported_statuses};

/// Per-call time bounds of the pipeline
#[derive(Debug, Clone, Copy)]
pub struct PipelineTimeouts {
    /// Bound on one manifest fetch
    pub manifest: Duration,
    /// Bound on one progress or query-volume fetch
    pub telemetry: Duration,
}

impl Default for PipelineTimeouts {
    fn default() -> Self {
        Self {
            manifest: Duration::from_secs(2),
            telemetry: Duration::from_secs(5),
        }
    }
}

impl PipelineTimeouts {
    pub fn from_config(config: &MonitorConfig) -> Self {
        Self {
            manifest: Duration::from_millis(config.manifest_timeout_ms),
            telemetry: Duration::from_millis(config.telemetry_timeout_ms),
        }
    }
}

/// Produces one [`VersionRecord`] per deployment version.
///
/// Resolves the start block, then fetches progress telemetry and query
/// volume concurrently with an all-settle policy: a timeout or failure on
/// either source leaves that source absent and never blocks the other.
/// Processing never fails; in the worst case the record shows zero
/// responding indexers and defaulted fields.
pub struct VersionProcessor {
    manifest_store: Arc<dyn ManifestStore>,
    progress_feed: Arc<dyn ProgressFeed>,
    query_volume_feed: Arc<dyn QueryVolumeFeed>,
    timeouts: PipelineTimeouts,
}

impl VersionProcessor {
    pub fn new(
        manifest_store: Arc<dyn ManifestStore>,
        progress_feed: Arc<dyn ProgressFeed>,
        query_volume_feed: Arc<dyn QueryVolumeFeed>,
        timeouts: PipelineTimeouts,
    ) -> Self {
        Self {
            manifest_store,
            progress_feed,
            query_volume_feed,
            timeouts,
        }
    }

    /// Build the status record for one deployment version
    pub async fn process(&self, deployment: &DeploymentVersion) -> VersionRecord {
        let start_block = resolve_start_block(
            self.manifest_store.as_ref(),
            &deployment.ipfs_hash,
            self.timeouts.manifest,
        )
        .await;

        // Progress and query volume settle independently under their own
        // timeouts; neither blocks consumption of the other
        let (progress, volume) = tokio::join!(
            with_timeout(
                self.timeouts.telemetry,
                self.progress_feed
                    .fetch_progress(&deployment.ipfs_hash, &deployment.allocations),
            ),
            with_timeout(
                self.timeouts.telemetry,
                self.query_volume_feed.fetch_query_volume(&deployment.ipfs_hash),
            ),
        );

        let indexers = match progress {
            FetchOutcome::Success(reports) => normalize_statuses(&reports, start_block),
            FetchOutcome::TimedOut => {
                logging::log_debug(&format!(
                    "Progress feed timed out for {}",
                    deployment.ipfs_hash
                ));
                unreported_statuses(&deployment.allocations)
            }
            FetchOutcome::Failed(reason) => {
                logging::log_debug(&format!(
                    "Progress feed failed for {}: {}",
                    deployment.ipfs_hash, reason
                ));
                unreported_statuses(&deployment.allocations)
            }
        };

        let (query_volume_30d, query_volume_days) = match volume {
            FetchOutcome::Success(volume) => (volume.count, volume.num_days),
            FetchOutcome::TimedOut => {
                logging::log_debug(&format!(
                    "Query volume fetch timed out for {}",
                    deployment.ipfs_hash
                ));
                (0.0, 0)
            }
            FetchOutcome::Failed(reason) => {
                logging::log_debug(&format!(
                    "Query volume fetch failed for {}: {}",
                    deployment.ipfs_hash, reason
                ));
                (0.0, 0)
            }
        };

        let (sync_percentage, indexers_synced) = version_sync_summary(&indexers);

        VersionRecord {
            subgraph_id: deployment.subgraph_id.clone(),
            version: deployment.version,
            ipfs_hash: deployment.ipfs_hash.clone(),
            signal_amount: deployment.signal_amount.clone(),
            indexer_count: deployment.allocations.len(),
            indexers_responding: indexers.iter().filter(|s| s.responded).count(),
            indexers_healthy: indexers.iter().filter(|s| s.is_healthy()).count(),
            indexers,
            indexers_synced,
            sync_percentage,
            query_volume_30d,
            query_volume_days,
        }
    }
}

/// Highest sync percentage across all statuses plus the count of fully
/// synced indexers. Without any numeric percentage the version reads as
/// `"0%"` with zero synced indexers.
fn version_sync_summary(indexers: &[IndexerStatus]) -> (String, usize) {
    let highest = indexers
        .iter()
        .filter_map(|s| s.numeric_sync_percentage())
        .max();

    match highest {
        Some(pct) => {
            let synced = indexers.iter().filter(|s| s.is_fully_synced()).count();
            (format!("{}%", pct), synced)
        }
        None => ("0%".to_string(), 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::IndexerHealth;

    fn status(pct: &str) -> IndexerStatus {
        IndexerStatus {
            indexer_id: "a".to_string(),
            indexer_url: "https://a.example.com".to_string(),
            health: IndexerHealth::Healthy,
            synced: false,
            responded: true,
            chain: None,
            sync_percentage: pct.to_string(),
        }
    }

    #[test]
    fn highest_percentage_wins() {
        let (pct, synced) = version_sync_summary(&[status("40%"), status("100%"), status("85%")]);
        assert_eq!(pct, "100%");
        assert_eq!(synced, 1);
    }

    #[test]
    fn counts_every_fully_synced_indexer() {
        let (pct, synced) = version_sync_summary(&[status("100%"), status("100%"), status("N/A")]);
        assert_eq!(pct, "100%");
        assert_eq!(synced, 2);
    }

    #[test]
    fn no_numeric_percentage_reads_as_zero() {
        let (pct, synced) = version_sync_summary(&[status("N/A"), status("N/A")]);
        assert_eq!(pct, "0%");
        assert_eq!(synced, 0);

        let (pct, synced) = version_sync_summary(&[]);
        assert_eq!(pct, "0%");
        assert_eq!(synced, 0);
    }
}
