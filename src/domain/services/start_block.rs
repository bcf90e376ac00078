use std::time::Duration;

use regex::Regex;

use crate::infrastructure::api::fetch::{with_timeout, FetchOutcome};
use crate::infrastructure::api::ManifestStore;
use crate::utils::logging;

/// Extract the start block from manifest text.
///
/// A manifest may declare several data sources with different start blocks;
/// the minimum is returned so sync-percentage math is never negative for any
/// one indexer. Zero matches (or an empty manifest) yield 0.
pub fn extract_start_block(manifest: &str) -> u64 {
    let re = match Regex::new(r"startBlock:\s*(\d+)") {
        Ok(re) => re,
        Err(_) => return 0,
    };

    re.captures_iter(manifest)
        .filter_map(|caps| caps[1].parse::<u64>().ok())
        .min()
        .unwrap_or(0)
}

/// Resolve the start block of one deployment from its manifest.
///
/// Timeout, a non-success response and a manifest without any `startBlock`
/// declaration all fall back to 0. Resolution never fails the pipeline.
pub async fn resolve_start_block(
    store: &dyn ManifestStore,
    ipfs_hash: &str,
    timeout: Duration,
) -> u64 {
    match with_timeout(timeout, store.fetch_manifest(ipfs_hash)).await {
        FetchOutcome::Success(manifest) => extract_start_block(&manifest),
        FetchOutcome::TimedOut => {
            logging::log_debug(&format!("Manifest fetch timed out for {}", ipfs_hash));
            0
        }
        FetchOutcome::Failed(reason) => {
            logging::log_debug(&format!(
                "Manifest fetch failed for {}: {}",
                ipfs_hash, reason
            ));
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_single_start_block() {
        let manifest = "dataSources:\n  - kind: ethereum\n    source:\n      startBlock: 1234567\n";
        assert_eq!(extract_start_block(manifest), 1234567);
    }

    #[test]
    fn takes_minimum_across_data_sources() {
        let manifest = "startBlock: 500\nstartBlock: 120\nstartBlock: 9000\n";
        assert_eq!(extract_start_block(manifest), 120);
    }

    #[test]
    fn no_declaration_defaults_to_zero() {
        assert_eq!(extract_start_block("specVersion: 0.0.5\n"), 0);
        assert_eq!(extract_start_block(""), 0);
    }

    #[test]
    fn tolerates_varied_whitespace() {
        assert_eq!(extract_start_block("startBlock:42"), 42);
        assert_eq!(extract_start_block("startBlock:   42"), 42);
    }
}
