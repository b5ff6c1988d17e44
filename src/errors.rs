use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for input resolution, schema validation, data loading, and
/// workbook output failures.
///
/// Every variant is terminal: the run reports it once and exits non-zero.
#[derive(Debug, Error)]
pub enum SplitError {
    #[error("the file '{}' does not exist", .0.display())]
    FileNotFound(PathBuf),
    #[error("the sales data is missing required columns: {}", .0.join(", "))]
    Schema(Vec<String>),
    #[error("line {line}: invalid field value: {source}")]
    DataType { line: u64, source: csv::Error },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("reading sales data: {0}")]
    Csv(#[from] csv::Error),
    #[error("writing workbook for order {order_id}: {source}")]
    Workbook {
        order_id: String,
        source: rust_xlsxwriter::XlsxError,
    },
}
