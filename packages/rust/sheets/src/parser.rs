//! CSV parser for published sheet tabs.
//!
//! The first record is the header row. Each following record becomes a
//! [`Row`] keyed by header name:
//! - headers and values are trimmed
//! - columns with an empty header are dropped
//! - short records simply lack the trailing columns; extra cells are ignored
//! - rows whose values are all empty are discarded

use salonsite_shared::{Result, Row, SalonSiteError};

/// Parse CSV text into rows keyed by the header row.
pub(crate) fn parse_csv(text: &str) -> Result<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| SalonSiteError::parse(format!("failed to read header row: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            SalonSiteError::parse(format!("malformed record {}: {e}", index + 1))
        })?;

        let row: Row = headers
            .iter()
            .zip(record.iter())
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, value)| (header.clone(), value.trim().to_string()))
            .collect();

        if row.values().any(|v| !v.is_empty()) {
            rows.push(row);
        }
    }

    Ok(rows)
}
