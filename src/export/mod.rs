// Export: CSV, spreadsheet and JSON artifacts for a finished report.

pub mod csv;
pub mod json;
pub mod xlsx;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::report::Report;

pub const CSV_FILE_NAME: &str = "similarity.csv";
pub const XLSX_FILE_NAME: &str = "similarity.xlsx";
pub const JSON_FILE_NAME: &str = "report.json";

/// Write every artifact into `dir` (created if missing). Returns the paths written.
pub fn export_all(report: &Report, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let csv_path = dir.join(CSV_FILE_NAME);
    let xlsx_path = dir.join(XLSX_FILE_NAME);
    let json_path = dir.join(JSON_FILE_NAME);

    self::csv::write_csv(&report.matrix, &csv_path)?;
    xlsx::write_xlsx(&report.matrix, &xlsx_path)?;
    json::write_json(report, &json_path)?;

    info!(dir = %dir.display(), "Exported report artifacts");
    Ok(vec![csv_path, xlsx_path, json_path])
}
