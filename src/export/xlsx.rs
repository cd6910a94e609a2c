// Spreadsheet export: one worksheet, same layout as the CSV.
//
// Values are stored at full precision; the "0.00" number format only
// changes how Excel displays them.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};

use crate::error::Result;
use crate::report::LabeledMatrix;

pub const SHEET_NAME: &str = "Plagiarism Report";

const DISPLAY_FORMAT: &str = "0.00";

/// Build the workbook in memory.
pub fn to_workbook(matrix: &LabeledMatrix) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let label_format = Format::new().set_bold();
    let value_format = Format::new().set_num_format(DISPLAY_FORMAT);

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (j, label) in matrix.labels.iter().enumerate() {
        sheet.write_string_with_format(0, col(j + 1), label, &label_format)?;
    }

    for (i, (label, row)) in matrix.labels.iter().zip(&matrix.cells).enumerate() {
        let r = (i + 1) as u32;
        sheet.write_string_with_format(r, 0, label, &label_format)?;
        for (j, cell) in row.iter().enumerate() {
            if let Some(value) = cell {
                sheet.write_number_with_format(r, col(j + 1), *value, &value_format)?;
            }
        }
    }

    Ok(workbook)
}

pub fn to_xlsx_bytes(matrix: &LabeledMatrix) -> Result<Vec<u8>> {
    let mut workbook = to_workbook(matrix)?;
    Ok(workbook.save_to_buffer()?)
}

pub fn write_xlsx(matrix: &LabeledMatrix, path: &Path) -> Result<()> {
    let mut workbook = to_workbook(matrix)?;
    workbook.save(path)?;
    Ok(())
}

/// Column index; anything past u16 is well beyond Excel's column limit and
/// gets rejected by the writer.
fn col(index: usize) -> u16 {
    u16::try_from(index).unwrap_or(u16::MAX)
}
