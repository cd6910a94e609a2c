// CSV export of the labeled similarity matrix, and the matching reader.
//
// Layout: an empty corner cell followed by the labels as the header row,
// then one row per document (label first). Values use Rust's shortest
// round-trip float formatting; the masked diagonal is an empty cell.

use std::fs;
use std::path::Path;

use crate::error::{CopyCatchError, Result};
use crate::report::LabeledMatrix;

/// Marker some spreadsheet tools write for missing values; accepted on read.
const NA: &str = "NA";

/// Serialize the matrix to UTF-8 CSV bytes.
pub fn to_csv_bytes(matrix: &LabeledMatrix) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let header = std::iter::once(String::new()).chain(matrix.labels.iter().cloned());
    writer.write_record(header)?;

    for (label, row) in matrix.labels.iter().zip(&matrix.cells) {
        let cells = row
            .iter()
            .map(|cell| cell.map(|v| v.to_string()).unwrap_or_default());
        writer.write_record(std::iter::once(label.clone()).chain(cells))?;
    }

    writer
        .into_inner()
        .map_err(|e| CopyCatchError::Io(e.into_error()))
}

pub fn write_csv(matrix: &LabeledMatrix, path: &Path) -> Result<()> {
    fs::write(path, to_csv_bytes(matrix)?)?;
    Ok(())
}

/// Parse CSV produced by [`to_csv_bytes`] back into a labeled matrix.
pub fn from_csv_bytes(bytes: &[u8]) -> Result<LabeledMatrix> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(bytes);

    let mut records = reader.records();
    let header = records
        .next()
        .ok_or_else(|| CopyCatchError::MalformedCsv("empty input".to_string()))??;

    let labels: Vec<String> = header.iter().skip(1).map(str::to_string).collect();
    let size = labels.len();

    let mut cells = Vec::with_capacity(size);
    for (i, record) in records.enumerate() {
        let record = record?;
        if record.len() != size + 1 {
            return Err(CopyCatchError::MalformedCsv(format!(
                "row {} has {} fields, expected {}",
                i + 1,
                record.len(),
                size + 1
            )));
        }
        if record.get(0) != labels.get(i).map(String::as_str) {
            return Err(CopyCatchError::MalformedCsv(format!(
                "row {} is labelled '{}' but column {} is '{}'",
                i + 1,
                record.get(0).unwrap_or_default(),
                i + 1,
                labels.get(i).map(String::as_str).unwrap_or_default()
            )));
        }

        let row = record
            .iter()
            .skip(1)
            .map(parse_cell)
            .collect::<Result<Vec<Option<f64>>>>()?;
        cells.push(row);
    }

    if cells.len() != size {
        return Err(CopyCatchError::MalformedCsv(format!(
            "{} rows for {} labels",
            cells.len(),
            size
        )));
    }

    Ok(LabeledMatrix { labels, cells })
}

fn parse_cell(raw: &str) -> Result<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == NA {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| CopyCatchError::MalformedCsv(format!("'{trimmed}' is not a number")))
}
