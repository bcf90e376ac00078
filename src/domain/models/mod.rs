pub mod deployment;
pub mod indexer_status;
pub mod summary;
pub mod version_record;

pub use deployment::{format_signal_amount, signal_tokens, Allocation, DeploymentVersion};
pub use indexer_status::{ChainStatus, IndexerHealth, IndexerStatus};
pub use summary::{AccountReport, AccountSummary, ProblemVersion};
pub use version_record::VersionRecord;
