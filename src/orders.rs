use std::collections::BTreeMap;

use crate::dataset::{Dataset, OrderId, Transaction, TOTAL_PRICE};
use crate::usd::Usd;

/// The label written in the item number column of each sheet's final row.
pub const GRAND_TOTAL: &str = "GRAND TOTAL";

/// One spreadsheet cell value.
///
/// Money cells carry their exact amount so the emitter can apply a currency
/// format; everything else is a plain number, text, or a blank.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Money(Usd),
}

impl Cell {
    fn from_raw(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::Empty;
        }
        match raw.parse::<f64>() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Text(raw.to_string()),
        }
    }
}

/// The fully transformed contents of one order's output workbook.
///
/// `headers` is the export's header row with the order-id column removed
/// and [`TOTAL_PRICE`] appended. `rows` holds the order's line items sorted
/// ascending by item number, followed by the [`GRAND_TOTAL`] summary row,
/// which is always last.
#[derive(Debug)]
pub struct OrderSheet {
    pub order_id: OrderId,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    pub grand_total: Usd,
}

/// Partitions a dataset into per-order sheets.
///
/// Groups are yielded in the natural ordering of their order identifiers,
/// and each sheet is built lazily as the iterator is advanced. The grouping
/// is a single pass: each transaction belongs to exactly one sheet.
pub fn split_orders(data: &Dataset) -> impl Iterator<Item = OrderSheet> + '_ {
    let mut groups: BTreeMap<&OrderId, Vec<&Transaction>> = BTreeMap::new();
    for tx in data.transactions() {
        groups.entry(&tx.order_id).or_default().push(tx);
    }
    groups
        .into_iter()
        .map(move |(order_id, lines)| build_sheet(order_id, lines, data))
}

fn build_sheet(order_id: &OrderId, mut lines: Vec<&Transaction>, data: &Dataset) -> OrderSheet {
    let columns = data.columns();
    // Stable, so repeated item numbers keep their file order.
    lines.sort_by(|a, b| a.item_number.cmp(&b.item_number));
    let headers: Vec<String> = data
        .headers()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != columns.order_id)
        .map(|(_, name)| name.clone())
        .chain(std::iter::once(TOTAL_PRICE.to_string()))
        .collect();
    let total_col = headers.len() - 1;
    let item_col = out_index(columns.item_number, columns.order_id);
    let mut grand_total = Usd::default();
    let mut rows = Vec::with_capacity(lines.len() + 1);
    for tx in &lines {
        let mut row: Vec<Cell> = tx
            .cells
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != columns.order_id)
            .map(|(i, raw)| {
                if i == columns.price {
                    Cell::Money(tx.price)
                } else {
                    Cell::from_raw(raw)
                }
            })
            .collect();
        row.push(Cell::Money(tx.total));
        grand_total += tx.total;
        rows.push(row);
    }
    let mut summary = vec![Cell::Empty; headers.len()];
    summary[item_col] = Cell::Text(GRAND_TOTAL.to_string());
    summary[total_col] = Cell::Money(grand_total);
    rows.push(summary);
    OrderSheet {
        order_id: order_id.clone(),
        headers,
        rows,
        grand_total,
    }
}

// Output position of an input column once the order-id column is dropped.
fn out_index(col: usize, dropped: usize) -> usize {
    if col > dropped {
        col - 1
    } else {
        col
    }
}
