//! Flat delimited climate tables (header row, one row per month).

use crate::domain::model::ClimateTable;
use crate::utils::error::{AlgaeError, Result};

pub fn read_table(data: &[u8]) -> Result<ClimateTable> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut table = ClimateTable::new(headers);
    for record in reader.records() {
        let record = record?;
        table.rows.push(record.iter().map(str::to_string).collect());
    }

    tracing::debug!(
        "Read climate table with {} columns and {} rows",
        table.headers.len(),
        table.rows.len()
    );
    Ok(table)
}

pub fn write_table(table: &ClimateTable) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| AlgaeError::IoError(e.into_error()))
}

/// Parses a numeric cell. `row` is 1-based over data rows.
pub fn parse_cell(row: usize, column: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AlgaeError::InvalidValue {
            row,
            column: column.to_string(),
            value: value.to_string(),
        })
}

/// Shortest representation that parses back to the same `f64`.
pub fn format_value(value: f64) -> String {
    format!("{}", value)
}
