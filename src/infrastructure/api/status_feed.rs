use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use crate::domain::models::Allocation;
use crate::utils::logging;

use super::error::ApiClientError;
use super::ProgressFeed;

/// Raw block positions for one chain as reported by an indexer
#[derive(Debug, Clone)]
pub struct ChainReport {
    pub network: String,
    /// Absent when the indexer has not reported progress on this chain
    pub latest_block: Option<u64>,
    pub chain_head_block: u64,
    pub earliest_block: u64,
}

/// Raw progress report of one indexer for one deployment
#[derive(Debug, Clone)]
pub struct ProgressReport {
    pub indexer_id: String,
    pub indexer_url: Option<String>,
    /// Whether the indexer answered the status query successfully
    pub responded: bool,
    pub health: Option<String>,
    pub synced: Option<bool>,
    pub chains: Vec<ChainReport>,
}

impl ProgressReport {
    /// A report for an indexer whose status endpoint could not be queried
    fn unavailable(allocation: &Allocation) -> Self {
        Self {
            indexer_id: allocation.indexer_id.clone(),
            indexer_url: allocation.indexer_url.clone(),
            responded: false,
            health: None,
            synced: None,
            chains: Vec::new(),
        }
    }
}

/// Progress feed backed by each indexer's own status endpoint.
///
/// One status query per allocated indexer, run concurrently; an indexer
/// that is unreachable, answers with an error or reports no status still
/// yields a (non-responding) report, so output order and length always
/// match the allocation list.
pub struct IndexerStatusClient {
    client: Client,
}

impl IndexerStatusClient {
    pub fn new() -> Result<Self, ApiClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .connect_timeout(Duration::from_secs(3))
            .build()
            .map_err(|e| {
                ApiClientError::ResponseError(format!("Failed to create HTTP client: {}", e))
            })?;
        Ok(Self { client })
    }

    async fn query_indexer(
        &self,
        ipfs_hash: &str,
        allocation: &Allocation,
    ) -> ProgressReport {
        let Some(url) = allocation.indexer_url.as_deref().filter(|u| !u.is_empty()) else {
            return ProgressReport::unavailable(allocation);
        };

        let status_url = format!("{}/status", normalize_indexer_url(url));
        let query = format!(
            r#"{{ indexingStatuses(subgraphs: ["{}"]) {{
  subgraph
  synced
  health
  chains {{
    network
    chainHeadBlock {{ number }}
    latestBlock {{ number }}
    earliestBlock {{ number }}
  }}
}} }}"#,
            ipfs_hash
        );

        let response = self
            .client
            .post(&status_url)
            .json(&json!({ "query": query }))
            .send()
            .await;

        let body: Value = match response {
            Ok(resp) if resp.status().is_success() => match resp.json().await {
                Ok(body) => body,
                Err(e) => {
                    logging::log_debug(&format!(
                        "Bad status response from {}: {}",
                        status_url, e
                    ));
                    return ProgressReport::unavailable(allocation);
                }
            },
            Ok(resp) => {
                logging::log_debug(&format!(
                    "Status endpoint {} returned {}",
                    status_url,
                    resp.status()
                ));
                return ProgressReport::unavailable(allocation);
            }
            Err(e) => {
                logging::log_debug(&format!("Status query to {} failed: {}", status_url, e));
                return ProgressReport::unavailable(allocation);
            }
        };

        if body.get("errors").is_some() {
            return ProgressReport::unavailable(allocation);
        }

        let Some(status) = body
            .pointer("/data/indexingStatuses")
            .and_then(Value::as_array)
            .and_then(|statuses| statuses.first())
        else {
            return ProgressReport::unavailable(allocation);
        };

        ProgressReport {
            indexer_id: allocation.indexer_id.clone(),
            indexer_url: allocation.indexer_url.clone(),
            responded: true,
            health: status
                .get("health")
                .and_then(Value::as_str)
                .map(str::to_string),
            synced: status.get("synced").and_then(Value::as_bool),
            chains: status
                .get("chains")
                .and_then(Value::as_array)
                .map(|chains| chains.iter().filter_map(parse_chain).collect())
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl ProgressFeed for IndexerStatusClient {
    async fn fetch_progress(
        &self,
        ipfs_hash: &str,
        allocations: &[Allocation],
    ) -> Result<Vec<ProgressReport>, ApiClientError> {
        let mut tasks = FuturesUnordered::new();
        for (idx, allocation) in allocations.iter().enumerate() {
            tasks.push(async move { (idx, self.query_indexer(ipfs_hash, allocation).await) });
        }

        let mut indexed: Vec<(usize, ProgressReport)> = Vec::with_capacity(allocations.len());
        while let Some(result) = tasks.next().await {
            indexed.push(result);
        }
        indexed.sort_by_key(|(idx, _)| *idx);

        Ok(indexed.into_iter().map(|(_, report)| report).collect())
    }
}

/// Prefix bare hostnames with https and strip any trailing slash
fn normalize_indexer_url(url: &str) -> String {
    let with_scheme = if url.starts_with("http") {
        url.to_string()
    } else {
        format!("https://{}", url)
    };
    with_scheme.trim_end_matches('/').to_string()
}

/// Block numbers arrive as decimal strings in the status API
fn parse_chain(chain: &Value) -> Option<ChainReport> {
    Some(ChainReport {
        network: chain
            .get("network")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        latest_block: block_number(chain.get("latestBlock")),
        chain_head_block: block_number(chain.get("chainHeadBlock"))?,
        earliest_block: block_number(chain.get("earliestBlock")).unwrap_or(0),
    })
}

fn block_number(block: Option<&Value>) -> Option<u64> {
    let number = block?.get("number")?;
    match number {
        Value::String(s) => s.parse::<u64>().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    }
}
