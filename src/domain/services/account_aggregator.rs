use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;

use crate::domain::errors::MonitorError;
use crate::domain::models::{
    format_signal_amount, AccountReport, AccountSummary, ProblemVersion, VersionRecord,
};
use crate::infrastructure::api::SubgraphRegistry;
use crate::utils::logging;

use super::version_processor::VersionProcessor;

const TOP_N: usize = 5;

/// Fans the version processor out over every deployment version of an
/// account and reduces the records into the account-wide report.
///
/// Concurrency is bounded by a semaphore so upstream rate limits are
/// respected; the permit count does not affect the aggregate output.
pub struct AccountAggregator {
    registry: Arc<dyn SubgraphRegistry>,
    processor: Arc<VersionProcessor>,
    max_concurrent_versions: usize,
}

impl AccountAggregator {
    pub fn new(
        registry: Arc<dyn SubgraphRegistry>,
        processor: VersionProcessor,
        max_concurrent_versions: usize,
    ) -> Self {
        Self {
            registry,
            processor: Arc::new(processor),
            max_concurrent_versions: max_concurrent_versions.max(1),
        }
    }

    /// Run one aggregation pass for an account.
    ///
    /// Only a malformed account address or a registry failure aborts the
    /// run; every telemetry failure downstream degrades to per-version
    /// defaults, so a completed run always carries a fully structured
    /// report.
    pub async fn analyze(&self, account: &str) -> Result<AccountReport, MonitorError> {
        validate_account(account)?;

        let deployments = self.registry.fetch_deployments(account).await?;
        logging::log_info(&format!(
            "Found {} deployment versions for account {}",
            deployments.len(),
            account
        ));

        // Bounded fan-out; records are re-ordered back to registry order so
        // the output is independent of completion order
        let permits = Arc::new(Semaphore::new(self.max_concurrent_versions));
        let mut tasks = FuturesUnordered::new();
        for (idx, deployment) in deployments.iter().enumerate() {
            let processor = Arc::clone(&self.processor);
            let permits = Arc::clone(&permits);
            tasks.push(async move {
                // acquire only fails when the semaphore is closed, which it never is
                let _permit = permits.acquire().await.ok();
                (idx, processor.process(deployment).await)
            });
        }

        let mut indexed: Vec<(usize, VersionRecord)> = Vec::with_capacity(deployments.len());
        while let Some(result) = tasks.next().await {
            indexed.push(result);
        }
        indexed.sort_by_key(|(idx, _)| *idx);
        let versions: Vec<VersionRecord> = indexed.into_iter().map(|(_, rec)| rec).collect();

        Ok(AccountReport {
            account: account.to_string(),
            summary: summarize(&versions),
            top_by_signal: top_by_signal(&versions),
            top_by_queries: top_by_queries(&versions),
            problematic: problematic_versions(&versions),
            versions,
        })
    }
}

/// Check the `0x` plus 40 hex digit account address shape
pub fn validate_account(account: &str) -> Result<(), MonitorError> {
    if account.is_empty() {
        return Err(MonitorError::InvalidAccount(
            "account address is empty".to_string(),
        ));
    }

    let hex = account
        .strip_prefix("0x")
        .filter(|rest| rest.len() == 40 && rest.chars().all(|c| c.is_ascii_hexdigit()));
    if hex.is_none() {
        return Err(MonitorError::InvalidAccount(format!(
            "'{}' is not a 0x-prefixed 40-hex-digit address",
            account
        )));
    }

    Ok(())
}

/// Reduce all version records into the account-wide summary
pub fn summarize(versions: &[VersionRecord]) -> AccountSummary {
    let total_subgraphs = versions
        .iter()
        .map(|v| v.subgraph_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    let unique_indexer_count = versions
        .iter()
        .flat_map(|v| v.indexers.iter().map(|s| s.indexer_id.as_str()))
        .collect::<HashSet<_>>()
        .len();

    let total_versions = versions.len();
    let synced_versions = versions.iter().filter(|v| v.has_synced_indexer()).count();
    let sync_rate = if total_versions > 0 {
        synced_versions as f64 * 100.0 / total_versions as f64
    } else {
        0.0
    };

    AccountSummary {
        total_subgraphs,
        total_versions,
        total_query_volume: versions.iter().map(|v| v.query_volume_30d).sum(),
        subgraphs_with_queries: versions.iter().filter(|v| v.query_volume_30d > 0.0).count(),
        unique_indexer_count,
        total_indexer_instances: versions.iter().map(|v| v.indexer_count).sum(),
        responding_indexers: versions.iter().map(|v| v.indexers_responding).sum(),
        synced_indexers: versions.iter().map(|v| v.indexers_synced).sum(),
        healthy_indexers: versions.iter().map(|v| v.indexers_healthy).sum(),
        sync_rate,
    }
}

/// Top versions by signal amount: non-zero signal only, integer token
/// quantity descending
pub fn top_by_signal(versions: &[VersionRecord]) -> Vec<VersionRecord> {
    let mut ranked: Vec<VersionRecord> = versions
        .iter()
        .filter(|v| v.signal_tokens() > 0)
        .cloned()
        .collect();
    ranked.sort_by(|a, b| b.signal_tokens().cmp(&a.signal_tokens()));
    ranked.truncate(TOP_N);
    ranked
}

/// Top versions by trailing query volume: positive volume only, descending
pub fn top_by_queries(versions: &[VersionRecord]) -> Vec<VersionRecord> {
    let mut ranked: Vec<VersionRecord> = versions
        .iter()
        .filter(|v| v.query_volume_30d > 0.0)
        .cloned()
        .collect();
    ranked.sort_by(|a, b| {
        b.query_volume_30d
            .partial_cmp(&a.query_volume_30d)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(TOP_N);
    ranked
}

/// Versions with active indexers, a known sync percentage and sync below
/// 100%, annotated with latest-version status and a display signal amount
pub fn problematic_versions(versions: &[VersionRecord]) -> Vec<ProblemVersion> {
    let mut latest_by_subgraph: HashMap<&str, u32> = HashMap::new();
    for version in versions {
        let entry = latest_by_subgraph
            .entry(version.subgraph_id.as_str())
            .or_insert(version.version);
        if version.version > *entry {
            *entry = version.version;
        }
    }

    versions
        .iter()
        .filter(|v| {
            v.indexer_count > 0
                && matches!(v.numeric_sync_percentage(), Some(pct) if pct > 0 && pct < 100)
        })
        .map(|v| ProblemVersion {
            is_latest: latest_by_subgraph.get(v.subgraph_id.as_str()) == Some(&v.version),
            signal_display: format_signal_amount(&v.signal_amount),
            record: v.clone(),
        })
        .collect()
}
