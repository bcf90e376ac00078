use dotenv::dotenv;
use std::env;

/// Configuration for the network registry (gateway) client
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Network subgraph endpoint on the gateway
    pub endpoint: String,
    /// Bearer credential for the gateway
    pub api_key: String,
}

/// Configuration for the manifest (IPFS) store client
#[derive(Debug, Clone)]
pub struct ManifestConfig {
    /// IPFS gateway base URL
    pub gateway_url: String,
}

/// Configuration for the query-volume feed client
#[derive(Debug, Clone)]
pub struct QueryVolumeConfig {
    /// Explorer query-volume base URL
    pub base_url: String,
}

/// Configuration for the aggregation pipeline
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Timeout for manifest fetches in milliseconds
    pub manifest_timeout_ms: u64,
    /// Timeout for telemetry fetches (progress, query volume) in milliseconds
    pub telemetry_timeout_ms: u64,
    /// Maximum number of deployment versions processed concurrently
    pub max_concurrent_versions: usize,
}

/// Configuration for result exports
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Path of the per-version summary CSV
    pub csv_path: String,
    /// Path of the detailed JSON report
    pub json_path: String,
    /// Path of the problematic-versions CSV
    pub problems_csv_path: String,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Registry client configuration
    pub registry: RegistryConfig,
    /// Manifest store configuration
    pub manifest: ManifestConfig,
    /// Query-volume feed configuration
    pub query_volume: QueryVolumeConfig,
    /// Pipeline configuration
    pub monitor: MonitorConfig,
    /// Export configuration
    pub export: ExportConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        // Ensure .env file is loaded
        dotenv().ok();

        let registry = RegistryConfig {
            endpoint: env::var("GRAPH_NETWORK_ENDPOINT").unwrap_or_else(|_| {
                "https://gateway.thegraph.com/api/subgraphs/id/DZz4kDTdmzWLWsV373w2bSmoar3umKKH9y82SUKr5qmp"
                    .to_string()
            }),
            api_key: env::var("THEGRAPH_API_KEY").unwrap_or_default(),
        };

        let manifest = ManifestConfig {
            gateway_url: env::var("GRAPH_IPFS_URL")
                .unwrap_or_else(|_| "https://api.thegraph.com/ipfs".to_string()),
        };

        let query_volume = QueryVolumeConfig {
            base_url: env::var("GRAPH_QUERY_VOLUME_URL").unwrap_or_else(|_| {
                "https://thegraph.com/explorer/api/subgraph/query-volume".to_string()
            }),
        };

        let monitor = MonitorConfig {
            manifest_timeout_ms: env::var("MANIFEST_TIMEOUT_MS")
                .unwrap_or_else(|_| "2000".to_string())
                .parse::<u64>()
                .unwrap_or(2000),
            telemetry_timeout_ms: env::var("TELEMETRY_TIMEOUT_MS")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u64>()
                .unwrap_or(5000),
            max_concurrent_versions: env::var("MAX_CONCURRENT_VERSIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<usize>()
                .unwrap_or(10),
        };

        let export = ExportConfig {
            csv_path: env::var("EXPORT_CSV_PATH")
                .unwrap_or_else(|_| "subgraph_network_data.csv".to_string()),
            json_path: env::var("EXPORT_JSON_PATH")
                .unwrap_or_else(|_| "subgraph_network_data_detailed.json".to_string()),
            problems_csv_path: env::var("EXPORT_PROBLEMS_CSV_PATH")
                .unwrap_or_else(|_| "problematic_subgraphs.csv".to_string()),
        };

        Self {
            registry,
            manifest,
            query_volume,
            monitor,
            export,
        }
    }
}
