use serde::Serialize;

/// Health of a deployment as reported by one indexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexerHealth {
    Healthy,
    Unhealthy,
    /// The indexer did not report a recognizable health value
    Unknown,
}

impl IndexerHealth {
    /// Parse an upstream health string, defaulting to `Unknown`
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("healthy") => IndexerHealth::Healthy,
            Some("unhealthy") => IndexerHealth::Unhealthy,
            _ => IndexerHealth::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IndexerHealth::Healthy => "healthy",
            IndexerHealth::Unhealthy => "unhealthy",
            IndexerHealth::Unknown => "unknown",
        }
    }
}

/// Block positions reported by an indexer for its primary chain
#[derive(Debug, Clone, Serialize)]
pub struct ChainStatus {
    pub network: String,
    pub latest_block: u64,
    pub chain_head_block: u64,
    pub earliest_block: u64,
    pub blocks_behind: u64,
}

/// Normalized per-indexer status for one deployment version
#[derive(Debug, Clone, Serialize)]
pub struct IndexerStatus {
    /// Indexer address
    pub indexer_id: String,
    /// Display URL (trailing slash stripped, placeholder when unknown)
    pub indexer_url: String,
    pub health: IndexerHealth,
    /// Synced flag passed through verbatim from the upstream report
    pub synced: bool,
    /// Whether the indexer carried a successful progress report
    pub responded: bool,
    /// Chain facts, present when the indexer reported at least one chain
    pub chain: Option<ChainStatus>,
    /// Sync percentage string, `"N/A"` without chain facts
    pub sync_percentage: String,
}

impl IndexerStatus {
    /// A status for an allocated indexer that produced no report at all
    pub fn unreported(indexer_id: &str, indexer_url: Option<&str>) -> Self {
        Self {
            indexer_id: indexer_id.to_string(),
            indexer_url: display_url(indexer_id, indexer_url),
            health: IndexerHealth::Unknown,
            synced: false,
            responded: false,
            chain: None,
            sync_percentage: "N/A".to_string(),
        }
    }

    /// Numeric value of the sync percentage, `None` for `"N/A"`
    pub fn numeric_sync_percentage(&self) -> Option<u64> {
        parse_percentage(&self.sync_percentage)
    }

    /// Whether this indexer has processed the full chain range
    pub fn is_fully_synced(&self) -> bool {
        matches!(self.numeric_sync_percentage(), Some(pct) if pct >= 100)
    }

    pub fn is_healthy(&self) -> bool {
        self.health == IndexerHealth::Healthy
    }
}

/// Numeric value of a percentage string such as `"85%"`, `None` otherwise
pub fn parse_percentage(value: &str) -> Option<u64> {
    value.strip_suffix('%').and_then(|n| n.parse::<u64>().ok())
}

/// Display form of an indexer URL: trailing slash stripped, or a
/// placeholder derived from the indexer id when no URL is known
pub fn display_url(indexer_id: &str, indexer_url: Option<&str>) -> String {
    match indexer_url {
        Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
        _ => format!("https://indexer.invalid/{}", indexer_id),
    }
}
