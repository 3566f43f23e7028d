use anyhow::{Context, Result};
use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook};

use crate::models::{BudgetItem, Column, Schema};

const SHEET_NAME: &str = "Trip Budget";
const HEADER_FILL: u32 = 0x1F4788;
const RUPIAH_FORMAT: &str = "\"Rp \"#,##0";
const COLUMN_WIDTHS: [f64; 7] = [25.0, 8.0, 15.0, 15.0, 20.0, 10.0, 10.0];

/// Excel workbook mirroring the budget table, with a grand total row.
pub(crate) fn to_xlsx(items: &[BudgetItem], schema: Schema) -> Result<Vec<u8>> {
    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    let number_format = Format::new().set_align(FormatAlign::Right);
    let money_format = Format::new()
        .set_align(FormatAlign::Right)
        .set_num_format(RUPIAH_FORMAT);
    let bold_format = Format::new().set_bold();
    let bold_money_format = money_format.clone().set_bold();

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(SHEET_NAME)
        .context("Failed to name worksheet")?;

    for (c, header) in schema.headers().iter().enumerate() {
        worksheet.write_string_with_format(0, c as u16, header, &header_format)?;
    }

    for (i, item) in items.iter().enumerate() {
        let row = u32::try_from(i + 1).context("Too many rows for a worksheet")?;
        for (c, column) in Column::all().iter().enumerate() {
            let col = c as u16;
            match column {
                Column::Name => worksheet.write_string(row, col, &item.name)?,
                Column::Quantity => worksheet.write_number_with_format(
                    row,
                    col,
                    f64::from(item.quantity),
                    &number_format,
                )?,
                Column::UnitPrice => worksheet.write_number_with_format(
                    row,
                    col,
                    item.unit_price as f64,
                    &money_format,
                )?,
                Column::Total => {
                    worksheet.write_number_with_format(row, col, item.total() as f64, &money_format)?
                }
                Column::PricingMode => {
                    worksheet.write_string(row, col, schema.mode_label(item.pricing_mode))?
                }
                Column::Paid => worksheet.write_boolean(row, col, item.paid)?,
                Column::Booked => worksheet.write_boolean(row, col, item.booked)?,
            };
        }
    }

    let total_row = u32::try_from(items.len() + 1).context("Too many rows for a worksheet")?;
    let grand_total: u64 = items.iter().map(BudgetItem::total).fold(0, u64::saturating_add);
    worksheet.write_string_with_format(total_row, 0, "GRAND TOTAL", &bold_format)?;
    worksheet.write_number_with_format(total_row, 3, grand_total as f64, &bold_money_format)?;

    for (c, width) in COLUMN_WIDTHS.iter().enumerate() {
        worksheet.set_column_width(c as u16, *width)?;
    }

    workbook
        .save_to_buffer()
        .context("Failed to build Excel workbook")
}
