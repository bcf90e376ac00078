use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::config::AppConfig;

use super::error::ApiClientError;
use super::QueryVolumeFeed;

/// Trailing query volume of one deployment
#[derive(Debug, Clone, Copy)]
pub struct QueryVolume {
    /// Query count over the window
    pub count: f64,
    /// Day span of the window
    pub num_days: u32,
}

/// Query-volume feed backed by the explorer API
pub struct ExplorerQueryVolumeClient {
    client: Client,
    base_url: String,
}

impl ExplorerQueryVolumeClient {
    pub fn new(config: &AppConfig) -> Result<Self, ApiClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .connect_timeout(Duration::from_secs(3))
            .build()
            .map_err(|e| {
                ApiClientError::ResponseError(format!("Failed to create HTTP client: {}", e))
            })?;
        Ok(Self {
            client,
            base_url: config.query_volume.base_url.clone(),
        })
    }
}

#[async_trait]
impl QueryVolumeFeed for ExplorerQueryVolumeClient {
    async fn fetch_query_volume(&self, ipfs_hash: &str) -> Result<QueryVolume, ApiClientError> {
        let url = format!("{}/{}", self.base_url, ipfs_hash);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiClientError::ApiError(format!(
                "Query-volume feed returned error status: {}",
                status
            )));
        }

        let body: Value = response.json().await?;
        parse_query_volume(&body)
    }
}

fn parse_query_volume(body: &Value) -> Result<QueryVolume, ApiClientError> {
    let count = body.get("count").and_then(Value::as_f64);
    let num_days = body.get("numDays").and_then(Value::as_u64);

    match (count, num_days) {
        (Some(count), Some(num_days)) => Ok(QueryVolume {
            count,
            num_days: num_days as u32,
        }),
        _ => Err(ApiClientError::ResponseError(
            "Query-volume response missing count or numDays".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_count_and_day_span() {
        let volume = parse_query_volume(&json!({ "count": 12345.0, "numDays": 30 })).unwrap();
        assert_eq!(volume.count, 12345.0);
        assert_eq!(volume.num_days, 30);
    }

    #[test]
    fn missing_fields_are_an_error() {
        assert!(parse_query_volume(&json!({ "count": 5 })).is_err());
        assert!(parse_query_volume(&json!({})).is_err());
    }
}
