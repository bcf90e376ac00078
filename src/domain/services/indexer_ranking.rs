use std::cmp::Ordering;

use crate::domain::models::IndexerStatus;

/// Display order for a version's per-indexer detail rows.
///
/// Four priority tiers, most- to least-preferred: fully synced and healthy;
/// healthy but not fully synced; fully synced but not healthy; neither.
/// Within a tier, numeric percentages sort before `"N/A"`, then by numeric
/// percentage descending. The sort is stable, so equal entries keep their
/// upstream order.
pub fn rank_indexers(indexers: &[IndexerStatus]) -> Vec<IndexerStatus> {
    let mut ranked = indexers.to_vec();
    ranked.sort_by(compare_priority);
    ranked
}

/// The ranking comparator, a pure function of the two statuses
pub fn compare_priority(a: &IndexerStatus, b: &IndexerStatus) -> Ordering {
    priority_tier(a)
        .cmp(&priority_tier(b))
        .then_with(|| compare_percentages(a, b))
}

fn priority_tier(status: &IndexerStatus) -> u8 {
    match (status.is_fully_synced(), status.is_healthy()) {
        (true, true) => 0,
        (false, true) => 1,
        (true, false) => 2,
        (false, false) => 3,
    }
}

fn compare_percentages(a: &IndexerStatus, b: &IndexerStatus) -> Ordering {
    match (a.numeric_sync_percentage(), b.numeric_sync_percentage()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
