//! Conversion between worksheet cells and [`BudgetItem`]s.
//!
//! Reading is forgiving: bad numbers become 0, anything but "TRUE" is false,
//! and columns missing from the sheet are backfilled. Writing always derives
//! the total from the item itself.

use crate::models::{BudgetItem, Column, PricingMode, Schema};

const TRUE_CELL: &str = "TRUE";
const FALSE_CELL: &str = "FALSE";

/// An in-memory snapshot of the budget worksheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BudgetTable {
    pub(crate) columns: Vec<String>,
    pub(crate) items: Vec<BudgetItem>,
}

impl BudgetTable {
    pub(crate) fn empty(schema: Schema) -> Self {
        Self {
            columns: schema.headers(),
            items: Vec::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }
}

/// Parse an integer cell. Decimals truncate toward zero; anything else is 0.
pub(crate) fn parse_int(cell: &str) -> i64 {
    let cell = cell.trim();
    if let Ok(n) = cell.parse::<i64>() {
        return n;
    }
    match cell.parse::<f64>() {
        Ok(f) if f.is_finite() && f.abs() < i64::MAX as f64 => f.trunc() as i64,
        _ => 0,
    }
}

pub(crate) fn parse_flag(cell: &str) -> bool {
    cell.trim().eq_ignore_ascii_case(TRUE_CELL)
}

pub(crate) fn flag_cell(value: bool) -> &'static str {
    if value {
        TRUE_CELL
    } else {
        FALSE_CELL
    }
}

/// Decode the raw grid returned by a worksheet.
pub(crate) fn decode_table(values: &[Vec<String>], schema: Schema) -> BudgetTable {
    if values.len() < 2 {
        return BudgetTable::empty(schema);
    }

    let header = &values[0];
    let positions: Vec<(Column, Option<usize>)> = Column::all()
        .iter()
        .map(|col| (*col, header.iter().position(|h| col.matches_header(h))))
        .collect();

    for (col, pos) in &positions {
        if pos.is_none() {
            log::info!(
                "Column '{}' missing from sheet, backfilling with '{}'",
                schema.header(*col),
                missing_cell(*col)
            );
        }
    }

    let mut items = Vec::with_capacity(values.len() - 1);
    for (i, row) in values[1..].iter().enumerate() {
        let cell = |col: Column| cell_at(row, &positions, col);

        let name = cell(Column::Name);
        if name.is_empty() {
            log::debug!("Skipping blank row {}", i + 2);
            continue;
        }

        let item = BudgetItem {
            name: name.to_string(),
            quantity: u32::try_from(parse_int(cell(Column::Quantity))).unwrap_or(0),
            unit_price: u64::try_from(parse_int(cell(Column::UnitPrice))).unwrap_or(0),
            pricing_mode: PricingMode::parse(cell(Column::PricingMode)),
            paid: parse_flag(cell(Column::Paid)),
            booked: parse_flag(cell(Column::Booked)),
        };

        let stored_total = parse_int(cell(Column::Total));
        if u64::try_from(stored_total).ok() != Some(item.total()) {
            log::debug!(
                "Row {}: stored total {stored_total} differs from derived {}",
                i + 2,
                item.total()
            );
        }

        items.push(item);
    }

    BudgetTable {
        columns: schema.headers(),
        items,
    }
}

fn cell_at<'a>(row: &'a [String], positions: &[(Column, Option<usize>)], col: Column) -> &'a str {
    match positions.iter().find(|(c, _)| *c == col) {
        Some((_, Some(idx))) => row.get(*idx).map(|s| s.trim()).unwrap_or(""),
        _ => missing_cell(col),
    }
}

/// Backfill for a column the sheet lacks. Without a name column every row is
/// blank, so nothing gets loaded or written back under a made-up name.
fn missing_cell(col: Column) -> &'static str {
    match col {
        Column::Name => "",
        _ => FALSE_CELL,
    }
}

pub(crate) fn cell_value(item: &BudgetItem, column: Column, schema: Schema) -> String {
    match column {
        Column::Name => item.name.clone(),
        Column::Quantity => item.quantity.to_string(),
        Column::UnitPrice => item.unit_price.to_string(),
        Column::Total => item.total().to_string(),
        Column::PricingMode => schema.mode_label(item.pricing_mode).to_string(),
        Column::Paid => flag_cell(item.paid).to_string(),
        Column::Booked => flag_cell(item.booked).to_string(),
    }
}

/// One row in storage order.
pub(crate) fn encode_item(item: &BudgetItem, schema: Schema) -> Vec<String> {
    Column::all()
        .iter()
        .map(|col| cell_value(item, *col, schema))
        .collect()
}

/// Header plus every item, ready for a full rewrite.
pub(crate) fn encode_table(items: &[BudgetItem], schema: Schema) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(items.len() + 1);
    rows.push(schema.headers());
    rows.extend(items.iter().map(|item| encode_item(item, schema)));
    rows
}

/// Lay out a row to match an existing header. Unknown header columns get an
/// empty cell.
pub(crate) fn align_to_header(item: &BudgetItem, header: &[String], schema: Schema) -> Vec<String> {
    header
        .iter()
        .map(|h| {
            Column::all()
                .iter()
                .find(|col| col.matches_header(h))
                .map(|col| cell_value(item, *col, schema))
                .unwrap_or_default()
        })
        .collect()
}

/// Expected columns the header does not carry.
pub(crate) fn missing_columns(header: &[String]) -> Vec<Column> {
    Column::all()
        .iter()
        .filter(|col| !header.iter().any(|h| col.matches_header(h)))
        .copied()
        .collect()
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
