/// Sync progress of one indexer over the `[start_block, chain_head_block]`
/// range, as a clamped integer percentage string.
///
/// Returns `"N/A"` when the indexer has not reported any progress
/// (`latest_block == 0`) or when the chain range is degenerate
/// (`chain_head_block <= start_block`). The clamp is exact-integer: no
/// indexer ever displays over 100%.
pub fn sync_percentage(start_block: u64, latest_block: u64, chain_head_block: u64) -> String {
    if latest_block == 0 {
        return "N/A".to_string();
    }

    let total_blocks = chain_head_block.saturating_sub(start_block);
    if total_blocks == 0 {
        return "N/A".to_string();
    }

    let blocks_processed = latest_block.saturating_sub(start_block);
    let synced = (blocks_processed as u128 * 100 / total_blocks as u128) as u64;
    format!("{}%", synced.min(100))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_floored_percentage() {
        assert_eq!(sync_percentage(0, 50, 100), "50%");
        assert_eq!(sync_percentage(0, 1, 3), "33%");
        assert_eq!(sync_percentage(100, 150, 200), "50%");
    }

    #[test]
    fn clamps_at_one_hundred() {
        assert_eq!(sync_percentage(0, 150, 100), "100%");
        assert_eq!(sync_percentage(0, 100, 100), "100%");
    }

    #[test]
    fn no_reported_progress_is_not_available() {
        assert_eq!(sync_percentage(0, 0, 100), "N/A");
    }

    #[test]
    fn degenerate_chain_range_is_not_available() {
        assert_eq!(sync_percentage(10, 10, 10), "N/A");
        assert_eq!(sync_percentage(200, 150, 100), "N/A");
    }

    #[test]
    fn latest_below_start_clamps_to_zero() {
        // A lagging indexer on a deployment whose earliest data source
        // starts later never goes negative
        assert_eq!(sync_percentage(100, 50, 200), "0%");
    }

    #[test]
    fn large_block_heights_do_not_overflow() {
        assert_eq!(sync_percentage(0, u64::MAX / 2, u64::MAX), "49%");
    }
}
