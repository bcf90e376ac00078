pub mod account_aggregator;
pub mod indexer_ranking;
pub mod start_block;
pub mod sync_percentage;
pub mod telemetry;
pub mod version_processor;

// Re-export services for direct imports
pub use account_aggregator::AccountAggregator;
pub use indexer_ranking::rank_indexers;
pub use sync_percentage::sync_percentage;
pub use version_processor::{PipelineTimeouts, VersionProcessor};
