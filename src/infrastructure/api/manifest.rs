use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::config::AppConfig;

use super::error::ApiClientError;
use super::ManifestStore;

/// Manifest store backed by an IPFS gateway
pub struct IpfsManifestClient {
    client: Client,
    gateway_url: String,
}

impl IpfsManifestClient {
    pub fn new(config: &AppConfig) -> Result<Self, ApiClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .connect_timeout(Duration::from_secs(2))
            .build()
            .map_err(|e| {
                ApiClientError::ResponseError(format!("Failed to create HTTP client: {}", e))
            })?;
        Ok(Self {
            client,
            gateway_url: config.manifest.gateway_url.clone(),
        })
    }
}

#[async_trait]
impl ManifestStore for IpfsManifestClient {
    async fn fetch_manifest(&self, ipfs_hash: &str) -> Result<String, ApiClientError> {
        let url = format!("{}/api/v0/cat?arg={}", self.gateway_url, ipfs_hash);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiClientError::ApiError(format!(
                "Manifest store returned error status: {}",
                status
            )));
        }

        Ok(response.text().await?)
    }
}
