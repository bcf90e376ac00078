use std::env;
use std::path::Path;
use std::sync::Arc;

use subgraph_monitor::config::AppConfig;
use subgraph_monitor::domain::models::AccountReport;
use subgraph_monitor::domain::services::{AccountAggregator, PipelineTimeouts, VersionProcessor};
use subgraph_monitor::infrastructure::api::{
    ExplorerQueryVolumeClient, GatewayRegistryClient, IndexerStatusClient, IpfsManifestClient,
};
use subgraph_monitor::infrastructure::export;
use subgraph_monitor::utils::logging;

#[tokio::main]
async fn main() {
    logging::init_logger();

    let config = AppConfig::from_env();

    let account = match env::args().nth(1) {
        Some(account) => account,
        None => {
            logging::log_error(
                "Usage: subgraph-monitor <account-address> (e.g. 0xa4c6a8392f046332628f33fd9891a7006b05cc95)",
            );
            std::process::exit(1);
        }
    };

    let aggregator = match build_aggregator(&config) {
        Ok(aggregator) => aggregator,
        Err(e) => {
            logging::log_error(&format!("Failed to initialize clients: {}", e));
            std::process::exit(1);
        }
    };

    logging::log_info(&format!("Fetching subgraph data for account: {}", account));

    match aggregator.analyze(&account).await {
        Ok(report) => {
            log_summary(&report);
            write_exports(&config, &report);
        }
        Err(e) => {
            logging::log_error(&format!("Aggregation failed: {}", e));
            std::process::exit(1);
        }
    }
}

fn build_aggregator(
    config: &AppConfig,
) -> Result<AccountAggregator, Box<dyn std::error::Error>> {
    let registry = Arc::new(GatewayRegistryClient::new(config)?);
    let processor = VersionProcessor::new(
        Arc::new(IpfsManifestClient::new(config)?),
        Arc::new(IndexerStatusClient::new()?),
        Arc::new(ExplorerQueryVolumeClient::new(config)?),
        PipelineTimeouts::from_config(&config.monitor),
    );

    Ok(AccountAggregator::new(
        registry,
        processor,
        config.monitor.max_concurrent_versions,
    ))
}

fn log_summary(report: &AccountReport) {
    let summary = &report.summary;

    logging::log_info(&format!(
        "Summary: {} subgraphs, {} versions, {} unique indexers ({} instances)",
        summary.total_subgraphs,
        summary.total_versions,
        summary.unique_indexer_count,
        summary.total_indexer_instances,
    ));
    logging::log_info(&format!(
        "Indexers: {} responding, {} synced, {} healthy; sync rate {:.1}%",
        summary.responding_indexers,
        summary.synced_indexers,
        summary.healthy_indexers,
        summary.sync_rate,
    ));
    logging::log_info(&format!(
        "Query volume: {:.0} queries over the window, {} versions with traffic",
        summary.total_query_volume, summary.subgraphs_with_queries,
    ));

    for record in &report.top_by_signal {
        logging::log_info(&format!(
            "Top by signal: {} v{} ({}) signal={} sync={}",
            record.subgraph_id,
            record.version,
            record.ipfs_hash,
            record.signal_amount,
            record.sync_percentage,
        ));
    }

    for record in &report.top_by_queries {
        logging::log_info(&format!(
            "Top by queries: {} v{} ({}) volume={:.0} sync={}",
            record.subgraph_id,
            record.version,
            record.ipfs_hash,
            record.query_volume_30d,
            record.sync_percentage,
        ));
    }

    if report.problematic.is_empty() {
        logging::log_info("No issues found - all indexed versions are fully synced");
    } else {
        for problem in &report.problematic {
            logging::log_warning(&format!(
                "Lagging version: {} v{} ({}) sync={} latest={} signal={}",
                problem.record.subgraph_id,
                problem.record.version,
                problem.record.ipfs_hash,
                problem.record.sync_percentage,
                problem.is_latest,
                problem.signal_display,
            ));
        }
    }
}

fn write_exports(config: &AppConfig, report: &AccountReport) {
    if let Err(e) = export::write_summary_csv(Path::new(&config.export.csv_path), report) {
        logging::log_error(&format!("Failed to write summary CSV: {}", e));
    } else {
        logging::log_info(&format!("Data saved to {}", config.export.csv_path));
    }

    if let Err(e) = export::write_detailed_json(Path::new(&config.export.json_path), report) {
        logging::log_error(&format!("Failed to write detailed JSON: {}", e));
    } else {
        logging::log_info(&format!(
            "Detailed data saved to {}",
            config.export.json_path
        ));
    }

    match export::write_problematic_csv(Path::new(&config.export.problems_csv_path), report) {
        Ok(true) => logging::log_info(&format!(
            "Problematic versions saved to {}",
            config.export.problems_csv_path
        )),
        Ok(false) => {}
        Err(e) => logging::log_error(&format!("Failed to write problematic CSV: {}", e)),
    }
}
