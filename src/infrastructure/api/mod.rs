//! Upstream service clients
//!
//! The four upstream services are opaque collaborators behind async traits
//! so the pipeline can run against test doubles. One reqwest-backed
//! production client exists per trait.

pub mod error;
pub mod fetch;
pub mod manifest;
pub mod query_volume;
pub mod registry;
pub mod status_feed;

pub use error::ApiClientError;
pub use fetch::FetchOutcome;
pub use manifest::IpfsManifestClient;
pub use query_volume::{ExplorerQueryVolumeClient, QueryVolume};
pub use registry::GatewayRegistryClient;
pub use status_feed::{IndexerStatusClient, ProgressReport};

use async_trait::async_trait;

use crate::domain::models::{Allocation, DeploymentVersion};

/// Deployment registry: account → subgraphs → versions with allocations.
/// The only upstream whose failure is fatal to a run.
#[async_trait]
pub trait SubgraphRegistry: Send + Sync {
    async fn fetch_deployments(
        &self,
        account: &str,
    ) -> Result<Vec<DeploymentVersion>, ApiClientError>;
}

/// Content-addressed manifest store
#[async_trait]
pub trait ManifestStore: Send + Sync {
    /// Fetch raw manifest text by content identifier
    async fn fetch_manifest(&self, ipfs_hash: &str) -> Result<String, ApiClientError>;
}

/// Per-deployment progress feed: one report per allocated indexer
#[async_trait]
pub trait ProgressFeed: Send + Sync {
    async fn fetch_progress(
        &self,
        ipfs_hash: &str,
        allocations: &[Allocation],
    ) -> Result<Vec<ProgressReport>, ApiClientError>;
}

/// Trailing query-volume feed for one deployment
#[async_trait]
pub trait QueryVolumeFeed: Send + Sync {
    async fn fetch_query_volume(&self, ipfs_hash: &str) -> Result<QueryVolume, ApiClientError>;
}
