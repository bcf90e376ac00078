use crate::domain::models::{Allocation, ChainStatus, IndexerHealth, IndexerStatus};
use crate::infrastructure::api::status_feed::ProgressReport;

use super::sync_percentage::sync_percentage;

/// Normalize the raw per-indexer progress feed of one deployment into
/// uniform status records.
///
/// Only the first reported chain of each indexer is inspected; an indexer
/// reporting multiple chains is treated as reporting its primary one.
/// Health and synced flags pass through verbatim, defaulting to
/// unknown/false when absent. Output preserves upstream order.
pub fn normalize_statuses(reports: &[ProgressReport], start_block: u64) -> Vec<IndexerStatus> {
    reports
        .iter()
        .map(|report| normalize_report(report, start_block))
        .collect()
}

/// Statuses for allocations whose progress feed produced nothing at all
/// (feed timeout or failure): every allocated indexer is still listed, as
/// not responding and with an unknown sync percentage.
pub fn unreported_statuses(allocations: &[Allocation]) -> Vec<IndexerStatus> {
    allocations
        .iter()
        .map(|alloc| IndexerStatus::unreported(&alloc.indexer_id, alloc.indexer_url.as_deref()))
        .collect()
}

fn normalize_report(report: &ProgressReport, start_block: u64) -> IndexerStatus {
    let mut status = IndexerStatus::unreported(&report.indexer_id, report.indexer_url.as_deref());
    status.responded = report.responded;
    status.health = IndexerHealth::parse(report.health.as_deref());
    status.synced = report.synced.unwrap_or(false);

    // First reported chain only; multi-chain indexers are represented by
    // their primary chain
    if let Some(chain) = report.chains.first() {
        let latest_block = chain.latest_block.unwrap_or(0);
        status.sync_percentage = sync_percentage(start_block, latest_block, chain.chain_head_block);
        status.chain = Some(ChainStatus {
            network: chain.network.clone(),
            latest_block,
            chain_head_block: chain.chain_head_block,
            earliest_block: chain.earliest_block,
            blocks_behind: chain.chain_head_block.saturating_sub(latest_block),
        });
    }

    status
}
