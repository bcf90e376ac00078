//! Flat-file exports of a finished aggregation run

use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

use serde_json::json;

use crate::domain::models::AccountReport;
use crate::domain::services::rank_indexers;

/// Error type for export operations
#[derive(Debug)]
pub enum ExportError {
    IoError(std::io::Error),
    JsonError(serde_json::Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::IoError(e) => write!(f, "I/O error: {}", e),
            ExportError::JsonError(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl Error for ExportError {}

impl From<std::io::Error> for ExportError {
    fn from(error: std::io::Error) -> Self {
        ExportError::IoError(error)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(error: serde_json::Error) -> Self {
        ExportError::JsonError(error)
    }
}

/// Write the per-version summary CSV (scalar columns only)
pub fn write_summary_csv(path: &Path, report: &AccountReport) -> Result<(), ExportError> {
    let mut out = String::from(
        "subgraph_id,version,ipfs_hash,signal_amount,active_indexers,indexer_sync_percentages,\
         indexer_count,indexers_responding,indexers_synced,indexers_healthy,sync_percentage,\
         query_volume_30d,query_volume_days\n",
    );

    for record in &report.versions {
        let row = [
            record.subgraph_id.clone(),
            record.version.to_string(),
            record.ipfs_hash.clone(),
            record.signal_amount.clone(),
            record.active_indexer_ids(),
            record.indexer_sync_percentages(),
            record.indexer_count.to_string(),
            record.indexers_responding.to_string(),
            record.indexers_synced.to_string(),
            record.indexers_healthy.to_string(),
            record.sync_percentage.clone(),
            record.query_volume_30d.to_string(),
            record.query_volume_days.to_string(),
        ];
        push_row(&mut out, &row);
    }

    fs::write(path, out)?;
    Ok(())
}

/// Write the detailed JSON report: every version with its full per-indexer
/// status list, ranked by display priority
pub fn write_detailed_json(path: &Path, report: &AccountReport) -> Result<(), ExportError> {
    let versions: Vec<serde_json::Value> = report
        .versions
        .iter()
        .map(|record| {
            json!({
                "subgraph_id": record.subgraph_id,
                "version": record.version,
                "ipfs_hash": record.ipfs_hash,
                "signal_amount": record.signal_amount,
                "indexer_count": record.indexer_count,
                "indexers_responding": record.indexers_responding,
                "indexers_synced": record.indexers_synced,
                "indexers_healthy": record.indexers_healthy,
                "sync_percentage": record.sync_percentage,
                "query_volume_30d": record.query_volume_30d,
                "query_volume_days": record.query_volume_days,
                "indexers": rank_indexers(&record.indexers),
            })
        })
        .collect();

    let detailed = json!({
        "account": report.account,
        "summary": report.summary,
        "versions": versions,
    });

    fs::write(path, serde_json::to_string_pretty(&detailed)?)?;
    Ok(())
}

/// Write the problematic-versions CSV; no file is written when nothing is
/// problematic
pub fn write_problematic_csv(path: &Path, report: &AccountReport) -> Result<bool, ExportError> {
    if report.problematic.is_empty() {
        return Ok(false);
    }

    let mut out = String::from(
        "subgraph_id,ipfs_hash,is_latest,signal_amount_formatted,query_volume_30d,\
         active_indexers,indexer_count,indexers_responding,sync_percentage,\
         indexer_sync_percentages\n",
    );

    for problem in &report.problematic {
        let record = &problem.record;
        let row = [
            record.subgraph_id.clone(),
            record.ipfs_hash.clone(),
            problem.is_latest.to_string(),
            problem.signal_display.clone(),
            record.query_volume_30d.to_string(),
            record.active_indexer_ids(),
            record.indexer_count.to_string(),
            record.indexers_responding.to_string(),
            record.sync_percentage.clone(),
            record.indexer_sync_percentages(),
        ];
        push_row(&mut out, &row);
    }

    fs::write(path, out)?;
    Ok(true)
}

fn push_row(out: &mut String, fields: &[String]) {
    let escaped: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
    out.push_str(&escaped.join(","));
    out.push('\n');
}

/// Quote a field when it contains a separator, quote or newline
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fields_pass_through() {
        assert_eq!(csv_field("QmHash"), "QmHash");
        assert_eq!(csv_field("100%"), "100%");
    }

    #[test]
    fn fields_with_separators_are_quoted() {
        assert_eq!(csv_field("a, b"), "\"a, b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
