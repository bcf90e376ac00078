use serde::Serialize;

/// Token amounts carry 18 implicit fraction digits
const SIGNAL_SCALE: u128 = 1_000_000_000_000_000_000;

/// An active assignment of an indexer to a deployment
#[derive(Debug, Clone, Serialize)]
pub struct Allocation {
    /// Indexer address
    pub indexer_id: String,
    /// Indexer service URL, when the indexer published one
    pub indexer_url: Option<String>,
}

/// One indexed build of a subgraph at a specific version number
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentVersion {
    /// Subgraph identifier
    pub subgraph_id: String,
    /// Version number within the subgraph
    pub version: u32,
    /// Content identifier of the deployment manifest
    pub ipfs_hash: String,
    /// Signalled token amount as a raw decimal string (18 implicit
    /// fraction digits); parsed as an integer only, never floated
    pub signal_amount: String,
    /// Indexers currently backing this version
    pub allocations: Vec<Allocation>,
}

impl DeploymentVersion {
    /// Raw signal amount as an integer token quantity
    pub fn signal_tokens(&self) -> u128 {
        signal_tokens(&self.signal_amount)
    }
}

/// Parse a raw signal string to its integer token quantity (0 when malformed)
pub fn signal_tokens(raw: &str) -> u128 {
    raw.parse::<u128>().unwrap_or(0)
}

/// Format a raw signal string for display: scaled by 10^18 with two
/// decimals, `"0"` for a raw value of `"0"` or anything unparseable
pub fn format_signal_amount(raw: &str) -> String {
    let value = signal_tokens(raw);
    if value == 0 {
        return "0".to_string();
    }

    let mut whole = value / SIGNAL_SCALE;
    // Round the fractional part to two decimals, carrying into the whole part
    let mut cents = (value % SIGNAL_SCALE + SIGNAL_SCALE / 200) / (SIGNAL_SCALE / 100);
    if cents == 100 {
        whole += 1;
        cents = 0;
    }
    format!("{}.{:02}", whole, cents)
}
