use anyhow::{Context, Result};

use crate::book::codec::flag_cell;
use crate::format::format_rupiah;
use crate::models::{BudgetItem, Column, Schema};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// CSV with a byte-order mark so spreadsheet apps pick up UTF-8.
/// Money columns are written as display strings.
pub(crate) fn to_csv(items: &[BudgetItem], schema: Schema) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(UTF8_BOM.to_vec());
    wtr.write_record(schema.headers())
        .context("Failed to write CSV header")?;

    for item in items {
        let record: Vec<String> = Column::all()
            .iter()
            .map(|col| display_cell(item, *col, schema))
            .collect();
        wtr.write_record(&record)
            .with_context(|| format!("Failed to write CSV row for '{}'", item.name))?;
    }

    wtr.into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to finish CSV export: {}", e.error()))
}

fn display_cell(item: &BudgetItem, column: Column, schema: Schema) -> String {
    match column {
        Column::Name => item.name.clone(),
        Column::Quantity => item.quantity.to_string(),
        Column::UnitPrice => format_rupiah(item.unit_price),
        Column::Total => format_rupiah(item.total()),
        Column::PricingMode => schema.mode_label(item.pricing_mode).to_string(),
        Column::Paid => flag_cell(item.paid).to_string(),
        Column::Booked => flag_cell(item.booked).to_string(),
    }
}
