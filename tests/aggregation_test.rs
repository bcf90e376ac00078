use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use subgraph_monitor::domain::errors::MonitorError;
use subgraph_monitor::domain::models::{Allocation, DeploymentVersion};
use subgraph_monitor::domain::services::{AccountAggregator, PipelineTimeouts, VersionProcessor};
use subgraph_monitor::infrastructure::api::status_feed::{ChainReport, ProgressReport};
use subgraph_monitor::infrastructure::api::{
    ApiClientError, ManifestStore, ProgressFeed, QueryVolume, QueryVolumeFeed, SubgraphRegistry,
};

const ACCOUNT: &str = "0xa4c6a8392f046332628f33fd9891a7006b05cc95";

struct StaticRegistry {
    deployments: Vec<DeploymentVersion>,
}

#[async_trait]
impl SubgraphRegistry for StaticRegistry {
    async fn fetch_deployments(
        &self,
        _account: &str,
    ) -> Result<Vec<DeploymentVersion>, ApiClientError> {
        Ok(self.deployments.clone())
    }
}

struct FailingRegistry;

#[async_trait]
impl SubgraphRegistry for FailingRegistry {
    async fn fetch_deployments(
        &self,
        _account: &str,
    ) -> Result<Vec<DeploymentVersion>, ApiClientError> {
        Err(ApiClientError::ApiError("registry unavailable".to_string()))
    }
}

struct StaticManifestStore {
    manifests: HashMap<String, String>,
}

#[async_trait]
impl ManifestStore for StaticManifestStore {
    async fn fetch_manifest(&self, ipfs_hash: &str) -> Result<String, ApiClientError> {
        self.manifests
            .get(ipfs_hash)
            .cloned()
            .ok_or_else(|| ApiClientError::ApiError("manifest not found".to_string()))
    }
}

/// Progress feed double: scripted reports per deployment, with some
/// deployments configured to hang past any test timeout
struct ScriptedProgressFeed {
    reports: HashMap<String, Vec<ProgressReport>>,
    hanging: HashSet<String>,
}

#[async_trait]
impl ProgressFeed for ScriptedProgressFeed {
    async fn fetch_progress(
        &self,
        ipfs_hash: &str,
        _allocations: &[Allocation],
    ) -> Result<Vec<ProgressReport>, ApiClientError> {
        if self.hanging.contains(ipfs_hash) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        self.reports
            .get(ipfs_hash)
            .cloned()
            .ok_or_else(|| ApiClientError::ApiError("no status data".to_string()))
    }
}

struct StaticVolumeFeed {
    volumes: HashMap<String, QueryVolume>,
}

#[async_trait]
impl QueryVolumeFeed for StaticVolumeFeed {
    async fn fetch_query_volume(&self, ipfs_hash: &str) -> Result<QueryVolume, ApiClientError> {
        self.volumes
            .get(ipfs_hash)
            .copied()
            .ok_or_else(|| ApiClientError::ApiError("no volume data".to_string()))
    }
}

fn allocation(id: &str) -> Allocation {
    Allocation {
        indexer_id: id.to_string(),
        indexer_url: Some(format!("https://{}.example.com/", id)),
    }
}

fn deployment(subgraph: &str, version: u32, hash: &str, indexers: &[&str]) -> DeploymentVersion {
    DeploymentVersion {
        subgraph_id: subgraph.to_string(),
        version,
        ipfs_hash: hash.to_string(),
        signal_amount: "0".to_string(),
        allocations: indexers.iter().map(|id| allocation(id)).collect(),
    }
}

fn report(id: &str, latest: u64, head: u64) -> ProgressReport {
    ProgressReport {
        indexer_id: id.to_string(),
        indexer_url: Some(format!("https://{}.example.com/", id)),
        responded: true,
        health: Some("healthy".to_string()),
        synced: Some(true),
        chains: vec![ChainReport {
            network: "mainnet".to_string(),
            latest_block: Some(latest),
            chain_head_block: head,
            earliest_block: 0,
        }],
    }
}

fn test_timeouts() -> PipelineTimeouts {
    PipelineTimeouts {
        manifest: Duration::from_millis(200),
        telemetry: Duration::from_millis(200),
    }
}

fn aggregator_for(
    deployments: Vec<DeploymentVersion>,
    manifests: HashMap<String, String>,
    reports: HashMap<String, Vec<ProgressReport>>,
    hanging: HashSet<String>,
    volumes: HashMap<String, QueryVolume>,
) -> AccountAggregator {
    let processor = VersionProcessor::new(
        Arc::new(StaticManifestStore { manifests }),
        Arc::new(ScriptedProgressFeed { reports, hanging }),
        Arc::new(StaticVolumeFeed { volumes }),
        test_timeouts(),
    );
    AccountAggregator::new(Arc::new(StaticRegistry { deployments }), processor, 4)
}

#[tokio::test]
async fn timed_out_feed_degrades_while_sibling_version_completes() {
    let deployments = vec![
        deployment("sg1", 1, "QmStuck", &["0xaaa"]),
        deployment("sg1", 2, "QmLive", &["0xbbb"]),
    ];

    let mut reports = HashMap::new();
    reports.insert("QmLive".to_string(), vec![report("0xbbb", 100, 100)]);

    let mut hanging = HashSet::new();
    hanging.insert("QmStuck".to_string());

    let aggregator = aggregator_for(
        deployments,
        HashMap::new(),
        reports,
        hanging,
        HashMap::new(),
    );
    let result = aggregator.analyze(ACCOUNT).await.unwrap();

    assert_eq!(result.versions.len(), 2);

    let stuck = &result.versions[0];
    assert_eq!(stuck.indexers_responding, 0);
    assert_eq!(stuck.sync_percentage, "0%");
    assert_eq!(stuck.indexer_count, 1);
    // The allocated indexer is still listed, as not responding
    assert_eq!(stuck.active_indexer_ids(), "0xaaa");
    assert_eq!(stuck.indexer_sync_percentages(), "N/A");

    let live = &result.versions[1];
    assert_eq!(live.sync_percentage, "100%");
    assert_eq!(live.indexers_synced, 1);
    assert_eq!(live.indexers_responding, 1);
    assert_eq!(live.indexers_healthy, 1);

    assert_eq!(result.summary.sync_rate, 50.0);
    assert_eq!(result.summary.total_subgraphs, 1);
    assert_eq!(result.summary.total_versions, 2);
}

#[tokio::test]
async fn start_block_from_manifest_shifts_sync_percentage() {
    let deployments = vec![deployment("sg1", 1, "QmManifest", &["0xaaa"])];

    let mut manifests = HashMap::new();
    manifests.insert(
        "QmManifest".to_string(),
        "dataSources:\n  source:\n    startBlock: 50\n".to_string(),
    );

    let mut reports = HashMap::new();
    reports.insert("QmManifest".to_string(), vec![report("0xaaa", 75, 100)]);

    let aggregator = aggregator_for(
        deployments,
        manifests,
        reports,
        HashSet::new(),
        HashMap::new(),
    );
    let result = aggregator.analyze(ACCOUNT).await.unwrap();

    // (75 - 50) / (100 - 50) floors to 50%
    assert_eq!(result.versions[0].sync_percentage, "50%");
}

#[tokio::test]
async fn query_volume_failure_defaults_to_zero_without_blocking_progress() {
    let deployments = vec![
        deployment("sg1", 1, "QmWithVolume", &["0xaaa"]),
        deployment("sg2", 1, "QmNoVolume", &["0xbbb"]),
    ];

    let mut reports = HashMap::new();
    reports.insert("QmWithVolume".to_string(), vec![report("0xaaa", 100, 100)]);
    reports.insert("QmNoVolume".to_string(), vec![report("0xbbb", 100, 100)]);

    let mut volumes = HashMap::new();
    volumes.insert(
        "QmWithVolume".to_string(),
        QueryVolume {
            count: 4200.0,
            num_days: 30,
        },
    );

    let aggregator = aggregator_for(deployments, HashMap::new(), reports, HashSet::new(), volumes);
    let result = aggregator.analyze(ACCOUNT).await.unwrap();

    assert_eq!(result.versions[0].query_volume_30d, 4200.0);
    assert_eq!(result.versions[0].query_volume_days, 30);
    assert_eq!(result.versions[1].query_volume_30d, 0.0);
    // The failed volume fetch did not block the progress telemetry
    assert_eq!(result.versions[1].sync_percentage, "100%");

    assert_eq!(result.summary.total_query_volume, 4200.0);
    assert_eq!(result.summary.subgraphs_with_queries, 1);
    assert_eq!(result.top_by_queries.len(), 1);
    assert_eq!(result.top_by_queries[0].ipfs_hash, "QmWithVolume");
}

#[tokio::test]
async fn identical_snapshots_produce_identical_reports() {
    let deployments = vec![
        deployment("sg1", 1, "QmA", &["0xaaa", "0xbbb"]),
        deployment("sg2", 1, "QmB", &["0xaaa"]),
    ];

    let mut reports = HashMap::new();
    reports.insert(
        "QmA".to_string(),
        vec![report("0xaaa", 80, 100), report("0xbbb", 100, 100)],
    );
    reports.insert("QmB".to_string(), vec![report("0xaaa", 100, 100)]);

    let make = || {
        aggregator_for(
            deployments.clone(),
            HashMap::new(),
            reports.clone(),
            HashSet::new(),
            HashMap::new(),
        )
    };

    let first = make().analyze(ACCOUNT).await.unwrap();
    let second = make().analyze(ACCOUNT).await.unwrap();

    let first_json = serde_json::to_value(&first).unwrap();
    let second_json = serde_json::to_value(&second).unwrap();
    assert_eq!(first_json, second_json);

    // Shared indexer across versions: unique count stays below instances
    assert_eq!(first.summary.unique_indexer_count, 2);
    assert_eq!(first.summary.total_indexer_instances, 3);
}

#[tokio::test]
async fn malformed_account_is_fatal() {
    let aggregator = aggregator_for(
        Vec::new(),
        HashMap::new(),
        HashMap::new(),
        HashSet::new(),
        HashMap::new(),
    );

    let result = aggregator.analyze("not-an-address").await;
    assert!(matches!(result, Err(MonitorError::InvalidAccount(_))));
}

#[tokio::test]
async fn registry_failure_is_fatal() {
    let processor = VersionProcessor::new(
        Arc::new(StaticManifestStore {
            manifests: HashMap::new(),
        }),
        Arc::new(ScriptedProgressFeed {
            reports: HashMap::new(),
            hanging: HashSet::new(),
        }),
        Arc::new(StaticVolumeFeed {
            volumes: HashMap::new(),
        }),
        test_timeouts(),
    );
    let aggregator = AccountAggregator::new(Arc::new(FailingRegistry), processor, 4);

    let result = aggregator.analyze(ACCOUNT).await;
    assert!(matches!(result, Err(MonitorError::RegistryError(_))));
}

#[tokio::test]
async fn every_telemetry_source_down_still_yields_a_structured_report() {
    let deployments = vec![deployment("sg1", 1, "QmDark", &["0xaaa", "0xbbb"])];

    let aggregator = aggregator_for(
        deployments,
        HashMap::new(),
        HashMap::new(),
        HashSet::new(),
        HashMap::new(),
    );
    let result = aggregator.analyze(ACCOUNT).await.unwrap();

    let record = &result.versions[0];
    assert_eq!(record.indexer_count, 2);
    assert_eq!(record.indexers_responding, 0);
    assert_eq!(record.indexers_synced, 0);
    assert_eq!(record.indexers_healthy, 0);
    assert_eq!(record.sync_percentage, "0%");
    assert_eq!(record.indexer_sync_percentages(), "N/A, N/A");

    assert_eq!(result.summary.sync_rate, 0.0);
    assert!(result.problematic.is_empty());
    assert!(result.top_by_signal.is_empty());
}
