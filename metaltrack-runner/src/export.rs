//! CSV export and re-import.
//!
//! One row per record with the record's own fields followed by the derived
//! columns (bullish count, bearish count, advice label). Import reads the
//! same layout back and ignores the derived columns.
//!
//! Columns: date, silver_price, gold_price, gold_silver_ratio, momentum,
//! comex_inventory, cot_commercial, cot_change, cot_speculator, slv_holdings,
//! monthly_change, weekly_change, bullish, bearish, advice, note

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use metaltrack_core::{assess, CotChange, Evaluator, Record, StoredRecord};

pub const CSV_HEADER: [&str; 16] = [
    "date",
    "silver_price",
    "gold_price",
    "gold_silver_ratio",
    "momentum",
    "comex_inventory",
    "cot_commercial",
    "cot_change",
    "cot_speculator",
    "slv_holdings",
    "monthly_change",
    "weekly_change",
    "bullish",
    "bearish",
    "advice",
    "note",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush CSV writer: {0}")]
    Flush(String),

    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `metaltrack_{YYYY-MM-DD}.csv`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("metaltrack_{}.csv", date.format("%Y-%m-%d"))
}

/// Render records plus their computed summary and advice as CSV.
pub fn export_csv(records: &[StoredRecord], evaluator: &Evaluator) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(CSV_HEADER)?;

    for stored in records {
        let r = &stored.record;
        let (evaluation, advice) = assess(evaluator, r);
        let date = r.date.to_string();
        let bullish = evaluation.summary.bullish.to_string();
        let bearish = evaluation.summary.bearish.to_string();
        wtr.write_record([
            date.as_str(),
            r.silver_price.as_str(),
            r.gold_price.as_str(),
            r.gold_silver_ratio.as_str(),
            r.momentum.as_str(),
            r.comex_inventory.as_str(),
            r.cot_commercial.as_str(),
            r.cot_change.map(|c| c.as_str()).unwrap_or(""),
            r.cot_speculator.as_str(),
            r.slv_holdings.as_str(),
            r.monthly_change.as_deref().unwrap_or(""),
            r.weekly_change.as_deref().unwrap_or(""),
            bullish.as_str(),
            bearish.as_str(),
            advice.label,
            r.note.as_str(),
        ])?;
    }

    let data = wtr
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))?;
    Ok(String::from_utf8(data)?)
}

/// Write the export to `{dir}/metaltrack_{date}.csv`, creating `dir` if needed.
pub fn write_export(
    dir: &Path,
    records: &[StoredRecord],
    evaluator: &Evaluator,
    date: NaiveDate,
) -> Result<PathBuf, ExportError> {
    let csv = export_csv(records, evaluator)?;
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(export_file_name(date));
    std::fs::write(&path, csv).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), records = records.len(), "exported CSV");
    Ok(path)
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    silver_price: String,
    gold_price: String,
    gold_silver_ratio: String,
    momentum: String,
    comex_inventory: String,
    cot_commercial: String,
    #[serde(default)]
    cot_change: String,
    #[serde(default)]
    cot_speculator: String,
    #[serde(default)]
    slv_holdings: String,
    #[serde(default)]
    monthly_change: String,
    #[serde(default)]
    weekly_change: String,
    #[serde(default)]
    note: String,
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

impl From<CsvRow> for Record {
    fn from(row: CsvRow) -> Self {
        Record {
            silver_price: row.silver_price,
            gold_price: row.gold_price,
            gold_silver_ratio: row.gold_silver_ratio,
            momentum: row.momentum,
            comex_inventory: row.comex_inventory,
            cot_commercial: row.cot_commercial,
            cot_change: CotChange::parse(&row.cot_change),
            cot_speculator: row.cot_speculator,
            slv_holdings: row.slv_holdings,
            monthly_change: non_empty(row.monthly_change),
            weekly_change: non_empty(row.weekly_change),
            note: row.note,
            ..Record::new(row.date)
        }
    }
}

/// Parse an exported CSV back into records, in file order.
pub fn import_csv(data: &str) -> Result<Vec<Record>, ExportError> {
    let mut rdr = csv::Reader::from_reader(data.as_bytes());
    let mut records = Vec::new();
    for row in rdr.deserialize::<CsvRow>() {
        records.push(row?.into());
    }
    Ok(records)
}
