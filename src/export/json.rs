// JSON export of the full report (matrix, pairs, warnings, timestamp).

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::report::Report;

pub fn to_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn write_json(report: &Report, path: &Path) -> Result<()> {
    fs::write(path, to_json(report)?)?;
    Ok(())
}
