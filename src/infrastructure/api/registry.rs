use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::AppConfig;
use crate::domain::models::{Allocation, DeploymentVersion};

use super::error::ApiClientError;
use super::SubgraphRegistry;

/// Registry client against the network subgraph on the gateway
pub struct GatewayRegistryClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GatewayRegistryClient {
    /// Create a new registry client
    pub fn new(config: &AppConfig) -> Result<Self, ApiClientError> {
        if config.registry.api_key.is_empty() {
            return Err(ApiClientError::ConfigError(
                "THEGRAPH_API_KEY is not set".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| {
                ApiClientError::ResponseError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            endpoint: config.registry.endpoint.clone(),
            api_key: config.registry.api_key.clone(),
        })
    }

    fn deployments_query(account: &str) -> String {
        format!(
            r#"{{
  graphAccounts(where: {{id: "{}"}}) {{
    subgraphs {{
      id
      versions {{
        version
        subgraphDeployment {{
          ipfsHash
          signalledTokens
          indexerAllocations(where: {{status: Active}}) {{
            indexer {{
              id
              url
            }}
          }}
        }}
      }}
    }}
  }}
}}"#,
            account
        )
    }
}

#[async_trait]
impl SubgraphRegistry for GatewayRegistryClient {
    async fn fetch_deployments(
        &self,
        account: &str,
    ) -> Result<Vec<DeploymentVersion>, ApiClientError> {
        let query = Self::deployments_query(account);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&json!({ "query": query }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiClientError::ApiError(format!(
                "Registry returned error status: {}",
                status
            )));
        }

        let body: Value = response.json().await?;
        if let Some(errors) = body.get("errors") {
            return Err(ApiClientError::ApiError(format!(
                "Registry query errors: {}",
                errors
            )));
        }

        parse_deployments(&body)
    }
}

/// Flatten the registry response into one entry per deployment version
fn parse_deployments(body: &Value) -> Result<Vec<DeploymentVersion>, ApiClientError> {
    let accounts = body
        .pointer("/data/graphAccounts")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            ApiClientError::ResponseError("No graphAccounts in registry response".to_string())
        })?;

    let account = accounts.first().ok_or_else(|| {
        ApiClientError::ResponseError("Account not found in registry".to_string())
    })?;

    let mut deployments = Vec::new();
    for subgraph in account
        .get("subgraphs")
        .and_then(Value::as_array)
        .unwrap_or(&Vec::new())
    {
        let subgraph_id = subgraph
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        for version in subgraph
            .get("versions")
            .and_then(Value::as_array)
            .unwrap_or(&Vec::new())
        {
            let Some(deployment) = version.get("subgraphDeployment") else {
                continue;
            };
            let Some(ipfs_hash) = deployment.get("ipfsHash").and_then(Value::as_str) else {
                continue;
            };

            let allocations = deployment
                .pointer("/indexerAllocations")
                .and_then(Value::as_array)
                .map(|allocs| {
                    allocs
                        .iter()
                        .filter_map(|alloc| alloc.get("indexer"))
                        .filter_map(|indexer| {
                            let id = indexer.get("id").and_then(Value::as_str)?;
                            Some(Allocation {
                                indexer_id: id.to_string(),
                                indexer_url: indexer
                                    .get("url")
                                    .and_then(Value::as_str)
                                    .map(str::to_string),
                            })
                        })
                        .collect()
                })
                .unwrap_or_default();

            deployments.push(DeploymentVersion {
                subgraph_id: subgraph_id.clone(),
                version: version.get("version").and_then(Value::as_u64).unwrap_or(0) as u32,
                ipfs_hash: ipfs_hash.to_string(),
                signal_amount: deployment
                    .get("signalledTokens")
                    .and_then(Value::as_str)
                    .unwrap_or("0")
                    .to_string(),
                allocations,
            });
        }
    }

    Ok(deployments)
}
