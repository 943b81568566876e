//! Result table output.

use std::io::Write;

use walkscore_shared::{OutputRecord, Result};

/// Printed before anything else.
pub const START_BANNER: &str = "INFO: start processing";

/// Printed after the last result row.
pub const STOP_BANNER: &str = "INFO: stop processing";

/// Write a banner line.
pub fn write_banner<W: Write + ?Sized>(out: &mut W, banner: &str) -> Result<()> {
    writeln!(out, "{banner}")?;
    Ok(())
}

/// Write one row as `label,region_code,locality_name,score`.
///
/// Fields are written verbatim; no CSV quoting is applied.
pub fn write_record<W: Write + ?Sized>(out: &mut W, record: &OutputRecord) -> Result<()> {
    writeln!(
        out,
        "{},{},{},{}",
        record.label, record.region_code, record.locality_name, record.score
    )?;
    Ok(())
}

/// Write all rows in order.
pub fn write_records<W: Write + ?Sized>(out: &mut W, records: &[OutputRecord]) -> Result<()> {
    for record in records {
        write_record(out, record)?;
    }
    Ok(())
}
