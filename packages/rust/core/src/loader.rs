//! Input table loading.
//!
//! The table is plain CSV with no header row and exactly four columns:
//! `label,unused,region_code,locality_name`. Any malformed row fails the whole
//! load, so nothing is fetched for a broken file. Fields that are not valid
//! UTF-8 are decoded lossily rather than rejected.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{info, instrument};

use walkscore_shared::{InputRecord, Result, WalkScoreError};

/// Number of columns every input row must have.
pub const FIELDS_PER_RECORD: usize = 4;

/// Read every record from the CSV file at `path`.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_records(path: &Path) -> Result<Vec<InputRecord>> {
    let file = File::open(path).map_err(|e| WalkScoreError::io(path, e))?;
    let records = parse_records(file, path)?;

    info!(records = records.len(), "input table loaded");
    Ok(records)
}

/// Parse CSV from any reader. `source` is only used in error messages.
pub fn parse_records<R: Read>(reader: R, source: &Path) -> Result<Vec<InputRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        // Row width is checked below so the error names the line and count.
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();

    for result in rdr.byte_records() {
        let row = result.map_err(|e| WalkScoreError::input(source, e.to_string()))?;

        if row.len() != FIELDS_PER_RECORD {
            let line = row.position().map(|p| p.line()).unwrap_or_default();
            return Err(WalkScoreError::input(
                source,
                format!(
                    "line {line}: expected {FIELDS_PER_RECORD} fields, found {}",
                    row.len()
                ),
            ));
        }

        let field = |idx: usize| String::from_utf8_lossy(&row[idx]).into_owned();
        records.push(InputRecord::new(field(0), field(1), field(2), field(3)));
    }

    Ok(records)
}
