// Input table loading.
//
// The dataset ships as a headed, delimiter-separated file (semicolons by
// default, because the feature vectors themselves contain commas). Only the
// five columns the pipeline needs are read; anything else, such as a
// leading unnamed index column, is ignored.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::db::models::RawVideoRow;

/// Default column delimiter for input tables.
pub const DEFAULT_DELIMITER: u8 = b';';

/// Load every row of the input table at `path`.
pub fn load_table(path: &Path, delimiter: u8) -> Result<Vec<RawVideoRow>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open input table {}", path.display()))?;
    let rows = read_table(file, delimiter)
        .with_context(|| format!("Failed to read input table {}", path.display()))?;

    debug!(rows = rows.len(), path = %path.display(), "Loaded input table");
    Ok(rows)
}

/// Read rows from any reader producing a headed delimited table.
pub fn read_table<R: Read>(reader: R, delimiter: u8) -> Result<Vec<RawVideoRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (i, record) in csv_reader.deserialize::<RawVideoRow>().enumerate() {
        // +2: one for the header line, one for 1-based line numbers
        let row = record.with_context(|| format!("Invalid row on line {}", i + 2))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Parse a delimiter given as a string (`";"`, `","`, `"\t"` or `"tab"`).
pub fn parse_delimiter(raw: &str) -> Result<u8> {
    if matches!(raw, "\\t" | "tab") {
        return Ok(b'\t');
    }
    let bytes = raw.as_bytes();
    if bytes.len() != 1 {
        anyhow::bail!("Delimiter must be a single byte, got {raw:?}");
    }
    Ok(bytes[0])
}
