use serde::Deserialize;

use std::{
    cmp::Ordering,
    fmt::Display,
    path::Path,
};

use crate::errors::SplitError;
use crate::usd::Usd;

pub const ORDER_ID: &str = "ORDER ID";
pub const ITEM_NUMBER: &str = "ITEM NUMBER";
pub const ITEM_QUANTITY: &str = "ITEM QUANTITY";
pub const ITEM_PRICE: &str = "ITEM PRICE";

/// Header of the derived column appended to every output sheet.
pub const TOTAL_PRICE: &str = "TOTAL PRICE";

/// The columns a sales export must contain. Matching is exact and
/// case-sensitive; any other columns are passed through to the output.
pub const REQUIRED_COLUMNS: [&str; 4] = [ORDER_ID, ITEM_QUANTITY, ITEM_PRICE, ITEM_NUMBER];

/// The key that partitions transactions into one output workbook each.
///
/// Identifiers are opaque, but iteration over orders follows their natural
/// ordering: identifiers that parse as integers sort numerically and ahead
/// of any non-numeric identifier, which sort lexicographically. An export
/// keyed `1, 2, ..., 10` therefore comes out in counting order.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl Ord for OrderId {
    fn cmp(&self, other: &Self) -> Ordering {
        natural_cmp(&self.0, &other.0)
    }
}

impl PartialOrd for OrderId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The sort key for line items within one order's sheet.
///
/// Uses the same natural ordering as [`OrderId`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct ItemNumber(String);

impl ItemNumber {
    pub fn new(n: impl Into<String>) -> Self {
        Self(n.into())
    }
}

impl Display for ItemNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl Ord for ItemNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        natural_cmp(&self.0, &other.0)
    }
}

impl PartialOrd for ItemNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Integer keys sort numerically and before any non-integer key; ties and
// non-integer keys fall back to string order, keeping the order total.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// One line of the sales export, with its derived total.
///
/// The typed fields are decoded from the required columns; `cells` keeps the
/// whole raw row so passthrough columns survive to the output in their
/// original positions. A `Transaction` is never mutated after loading.
#[derive(Clone, Debug)]
pub struct Transaction {
    pub order_id: OrderId,
    pub item_number: ItemNumber,
    pub qty: i32,
    pub price: Usd,
    /// `price * qty`, computed once during the load pass.
    pub total: Usd,
    pub(crate) cells: Vec<String>,
}

/// Defines the CSV format for the required columns of a sales export.
#[derive(Debug, Deserialize)]
struct Line {
    #[serde(rename = "ORDER ID")]
    order_id: OrderId,
    #[serde(rename = "ITEM NUMBER")]
    item_number: ItemNumber,
    #[serde(rename = "ITEM QUANTITY")]
    qty: i32,
    #[serde(rename = "ITEM PRICE")]
    price: Usd,
}

/// Positions of the required columns, resolved once against the validated
/// header row. All later positional access goes through these indices.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Columns {
    pub(crate) order_id: usize,
    pub(crate) item_number: usize,
    pub(crate) price: usize,
}

impl Columns {
    fn resolve(headers: &[String]) -> Result<Self, SplitError> {
        let position = |name: &str| headers.iter().position(|h| h == name);
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| position(name).is_none())
            .map(|name| (*name).to_string())
            .collect();
        match (position(ORDER_ID), position(ITEM_NUMBER), position(ITEM_PRICE)) {
            (Some(order_id), Some(item_number), Some(price)) if missing.is_empty() => Ok(Self {
                order_id,
                item_number,
                price,
            }),
            _ => Err(SplitError::Schema(missing)),
        }
    }
}

/// Holds one fully loaded and validated sales export.
///
/// To load one, use [`Dataset::from_csv`]. The dataset owns every
/// transaction for the run; order groups are later derived as borrowing,
/// non-overlapping views.
#[derive(Debug)]
pub struct Dataset {
    headers: Vec<String>,
    columns: Columns,
    transactions: Vec<Transaction>,
}

impl Dataset {
    /// Reads sales data from the CSV file at `path`.
    ///
    /// The header row is validated against [`REQUIRED_COLUMNS`] before any
    /// record is parsed, and each line's total price is derived as it is
    /// read, so the returned dataset is complete and ready to partition.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::Schema`] naming every missing required column,
    /// [`SplitError::DataType`] for a quantity or price that does not parse
    /// as a number, or [`SplitError::Csv`] for a malformed file.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, SplitError> {
        let mut rdr = csv::Reader::from_path(path)?;
        let header_record = rdr.headers()?.clone();
        let headers: Vec<String> = header_record.iter().map(str::to_string).collect();
        let columns = Columns::resolve(&headers)?;
        let mut transactions = Vec::new();
        for result in rdr.records() {
            let record = result?;
            let line: Line =
                record
                    .deserialize(Some(&header_record))
                    .map_err(|source| SplitError::DataType {
                        line: record.position().map_or(0, csv::Position::line),
                        source,
                    })?;
            let total = line.price * line.qty;
            transactions.push(Transaction {
                order_id: line.order_id,
                item_number: line.item_number,
                qty: line.qty,
                price: line.price,
                total,
                cells: record.iter().map(str::to_string).collect(),
            });
        }
        log::debug!(
            "loaded {} transactions, derived {TOTAL_PRICE} for each",
            transactions.len()
        );
        Ok(Self {
            headers,
            columns,
            transactions,
        })
    }

    /// The column names of the export, in file order.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Every transaction in the export, in file order.
    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub(crate) fn columns(&self) -> Columns {
        self.columns
    }
}
