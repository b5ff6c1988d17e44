use rust_xlsxwriter::{Format, FormatAlign, Workbook, XlsxError};

use std::path::{Path, PathBuf};

use crate::errors::SplitError;
use crate::orders::{Cell, OrderSheet};

// Positional widths for columns A onward, applied regardless of header
// content.
const COLUMN_WIDTHS: [f64; 9] = [11.0, 13.0, 15.0, 15.0, 15.0, 13.0, 13.0, 10.0, 30.0];

const MONEY_FORMAT: &str = "$#,##0.00";

/// Writes one order's sheet to `Order_<id>.xlsx` in `dir`, returning the
/// path of the file written.
///
/// An existing file with the same name is overwritten, so re-running against
/// the same export on the same day replaces each artifact in place. The
/// workbook is assembled in memory and saved in one step per order.
///
/// # Errors
///
/// Returns [`SplitError::Workbook`], naming the order, if the workbook
/// cannot be built or saved.
pub fn write_order(sheet: &OrderSheet, dir: impl AsRef<Path>) -> Result<PathBuf, SplitError> {
    let path = dir.as_ref().join(format!("Order_{}.xlsx", sheet.order_id));
    write_workbook(sheet, &path).map_err(|source| SplitError::Workbook {
        order_id: sheet.order_id.to_string(),
        source,
    })?;
    Ok(path)
}

fn write_workbook(sheet: &OrderSheet, path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold().set_align(FormatAlign::Center);
    let money_format = Format::new().set_num_format(MONEY_FORMAT);
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(format!("Order {}", sheet.order_id))?;
    for (col, name) in sheet.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, name.as_str(), &header_format)?;
    }
    for (row, cells) in sheet.rows.iter().enumerate() {
        let row = row as u32 + 1;
        for (col, cell) in cells.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Empty => {}
                Cell::Text(s) => {
                    worksheet.write_string(row, col, s.as_str())?;
                }
                Cell::Number(n) => {
                    worksheet.write_number(row, col, *n)?;
                }
                Cell::Money(amount) => {
                    worksheet.write_number_with_format(
                        row,
                        col,
                        amount.as_dollars(),
                        &money_format,
                    )?;
                }
            }
        }
    }
    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width)?;
    }
    workbook.save(path)?;
    Ok(())
}
