#![doc = include_str!("../README.md")]
use chrono::NaiveDate;
use log::{debug, info};

use std::{
    fs,
    path::{Path, PathBuf},
};

pub mod dataset;
mod errors;
pub mod orders;
pub mod sheet;
pub mod usd;

pub use crate::dataset::{Dataset, ItemNumber, OrderId, Transaction};
pub use crate::errors::SplitError;
pub use crate::orders::{split_orders, Cell, OrderSheet};
pub use crate::sheet::write_order;
pub use crate::usd::Usd;

/// Returns the dated output directory for a run, creating it if necessary.
///
/// The directory is named `Orders_<YYYY-MM-DD>` for the given calendar day
/// and placed as a sibling of the input file. Creation is idempotent: an
/// existing directory is reused, and missing intermediate segments are
/// created.
///
/// The date is passed in rather than read from the system clock, so callers
/// (and tests) control which day a run stamps its output with.
///
/// # Errors
///
/// Returns [`SplitError::Io`] if the directory cannot be created, for
/// example because of permissions.
pub fn orders_dir(sales_csv: impl AsRef<Path>, date: NaiveDate) -> Result<PathBuf, SplitError> {
    let parent = sales_csv.as_ref().parent().unwrap_or_else(|| Path::new(""));
    let dir = parent.join(format!("Orders_{}", date.format("%Y-%m-%d")));
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Splits the sales export at `sales_csv` into one workbook per order,
/// written into the dated output directory for `date`.
///
/// This is the whole batch run: resolve the input, plan the output
/// directory, load and validate the data, then transform and emit each
/// order group in turn. Returns the paths of the workbooks written, in the
/// order they were emitted.
///
/// The run is all-or-nothing: the first error aborts it, and no further
/// artifacts are written.
///
/// # Errors
///
/// Returns [`SplitError::FileNotFound`] if `sales_csv` is not an existing
/// regular file, and propagates every validation, data, and output error
/// from the steps above.
pub fn split_sales(
    sales_csv: impl AsRef<Path>,
    date: NaiveDate,
) -> Result<Vec<PathBuf>, SplitError> {
    let sales_csv = sales_csv.as_ref();
    if !sales_csv.is_file() {
        return Err(SplitError::FileNotFound(sales_csv.to_path_buf()));
    }
    let dir = orders_dir(sales_csv, date)?;
    let data = Dataset::from_csv(sales_csv)?;
    debug!("columns: {:?}", data.headers());
    let mut written = Vec::new();
    for sheet in split_orders(&data) {
        let path = write_order(&sheet, &dir)?;
        info!(
            "order {} ({} total) saved to {}",
            sheet.order_id,
            sheet.grand_total,
            path.display()
        );
        written.push(path);
    }
    Ok(written)
}
