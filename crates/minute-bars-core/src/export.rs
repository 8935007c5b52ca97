use std::fs::File;
use std::path::Path;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::bar::Bar;
use crate::error::ExportError;

/// Column names of the exported CSV, in order.
pub const CSV_HEADER: [&str; 3] = ["timestamp", "price", "volume"];

/// Timestamp rendering used in the CSV (exchange-local, no offset).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One exported row: a bar reduced to its close price and volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    pub timestamp: NaiveDateTime,
    pub price: Decimal,
    pub volume: i64,
}

impl From<&Bar> for ExportRow {
    fn from(bar: &Bar) -> Self {
        Self {
            timestamp: bar.timestamp,
            price: bar.close,
            volume: bar.volume,
        }
    }
}

/// Project bars to export rows. Order and row count are preserved.
pub fn project(bars: &[Bar]) -> Vec<ExportRow> {
    bars.iter().map(ExportRow::from).collect()
}

/// Write rows to `path` as CSV, replacing any existing file.
/// An empty slice still produces the header line.
pub fn write_csv(path: &Path, rows: &[ExportRow]) -> Result<(), ExportError> {
    let file = File::create(path)?;
    let mut wtr = csv::Writer::from_writer(file);

    wtr.write_record(CSV_HEADER)?;
    for row in rows {
        wtr.write_record([
            row.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            row.price.to_string(),
            row.volume.to_string(),
        ])?;
    }
    wtr.flush()?;

    Ok(())
}
