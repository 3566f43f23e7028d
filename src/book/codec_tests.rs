#![allow(clippy::unwrap_used)]

use super::*;

fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect()
}

const EN_HEADER: &[&str] = &["Item", "Qty", "Price", "Total", "Type", "Paid", "Booked"];

// ── parse_int / parse_flag ────────────────────────────────────

#[test]
fn test_parse_int_plain() {
    assert_eq!(parse_int("1500000"), 1_500_000);
    assert_eq!(parse_int("  42 "), 42);
    assert_eq!(parse_int("-3"), -3);
}

#[test]
fn test_parse_int_truncates_decimals() {
    assert_eq!(parse_int("3.0"), 3);
    assert_eq!(parse_int("2.9"), 2);
    assert_eq!(parse_int("-2.9"), -2);
}

#[test]
fn test_parse_int_garbage_is_zero() {
    assert_eq!(parse_int(""), 0);
    assert_eq!(parse_int("abc"), 0);
    assert_eq!(parse_int("Rp 1,000"), 0);
    assert_eq!(parse_int("NaN"), 0);
    assert_eq!(parse_int("inf"), 0);
    assert_eq!(parse_int("FALSE"), 0);
}

#[test]
fn test_parse_flag() {
    assert!(parse_flag("TRUE"));
    assert!(parse_flag("true"));
    assert!(parse_flag(" True "));
    assert!(!parse_flag("FALSE"));
    assert!(!parse_flag("yes"));
    assert!(!parse_flag("1"));
    assert!(!parse_flag(""));
}

#[test]
fn test_flag_cell() {
    assert_eq!(flag_cell(true), "TRUE");
    assert_eq!(flag_cell(false), "FALSE");
}

// ── decode_table ──────────────────────────────────────────────

#[test]
fn test_decode_empty_sheet() {
    let table = decode_table(&[], Schema::English);
    assert!(table.is_empty());
    assert_eq!(table.columns, Schema::English.headers());
}

#[test]
fn test_decode_header_only() {
    let table = decode_table(&grid(&[EN_HEADER]), Schema::Indonesian);
    assert!(table.is_empty());
    assert_eq!(table.columns, Schema::Indonesian.headers());
}

#[test]
fn test_decode_full_row() {
    let values = grid(&[
        EN_HEADER,
        &["Hotel", "3", "500000", "1500000", "Per Unit", "TRUE", "false"],
    ]);
    let table = decode_table(&values, Schema::English);
    assert_eq!(table.len(), 1);
    let item = &table.items[0];
    assert_eq!(item.name, "Hotel");
    assert_eq!(item.quantity, 3);
    assert_eq!(item.unit_price, 500_000);
    assert_eq!(item.pricing_mode, PricingMode::PerUnit);
    assert!(item.paid);
    assert!(!item.booked);
    assert_eq!(item.total(), 1_500_000);
}

#[test]
fn test_decode_coerces_bad_numbers_to_zero() {
    let values = grid(&[
        EN_HEADER,
        &["Snorkel", "two", "-5", "oops", "Lump Sum", "", ""],
    ]);
    let item = &decode_table(&values, Schema::English).items[0];
    assert_eq!(item.quantity, 0);
    assert_eq!(item.unit_price, 0);
    assert_eq!(item.pricing_mode, PricingMode::LumpSum);
}

#[test]
fn test_decode_ignores_stale_total() {
    let values = grid(&[
        EN_HEADER,
        &["Hotel", "3", "600000", "1500000", "Per Unit", "FALSE", "FALSE"],
    ]);
    let item = &decode_table(&values, Schema::English).items[0];
    assert_eq!(item.total(), 1_800_000);
}

#[test]
fn test_decode_backfills_missing_flag_columns() {
    // Older sheets predate the Paid/Booked columns.
    let values = grid(&[
        &["Nama Barang", "Qty", "Harga Input", "Total Akhir", "Tipe"],
        &["Villa", "2", "750000", "1500000", "Harga Satuan"],
    ]);
    let table = decode_table(&values, Schema::Indonesian);
    assert_eq!(table.columns.len(), 7);
    let item = &table.items[0];
    assert_eq!(item.name, "Villa");
    assert!(!item.paid);
    assert!(!item.booked);
    assert_eq!(item.total(), 1_500_000);
}

#[test]
fn test_decode_without_name_column_has_no_items() {
    let values = grid(&[
        &["Qty", "Price", "Total", "Type"],
        &["3", "500000", "1500000", "Per Unit"],
    ]);
    let table = decode_table(&values, Schema::English);
    assert!(table.is_empty());
    assert_eq!(table.columns.len(), 7);
}

#[test]
fn test_decode_reorders_columns() {
    let values = grid(&[
        &["Paid", "Price", "Item", "Qty", "Type"],
        &["TRUE", "100000", "Scooter", "4", "Per Unit"],
    ]);
    let item = &decode_table(&values, Schema::English).items[0];
    assert_eq!(item.name, "Scooter");
    assert_eq!(item.quantity, 4);
    assert_eq!(item.unit_price, 100_000);
    assert!(item.paid);
}

#[test]
fn test_decode_ignores_extra_columns() {
    let values = grid(&[
        &["Item", "Notes", "Qty", "Price", "Total", "Type", "Paid", "Booked"],
        &["Tour", "ask guide", "1", "350000", "350000", "Lump Sum", "FALSE", "TRUE"],
    ]);
    let item = &decode_table(&values, Schema::English).items[0];
    assert_eq!(item.name, "Tour");
    assert!(item.booked);
}

#[test]
fn test_decode_skips_blank_name_rows() {
    let values = grid(&[
        EN_HEADER,
        &["Hotel", "1", "1", "1", "Per Unit", "FALSE", "FALSE"],
        &["", "", "", "", "", "", ""],
        &["   ", "2", "5", "10", "Per Unit", "FALSE", "FALSE"],
        &["Taxi", "1", "2", "2", "Per Unit", "FALSE", "FALSE"],
    ]);
    let names: Vec<_> = decode_table(&values, Schema::English)
        .items
        .into_iter()
        .map(|i| i.name)
        .collect();
    assert_eq!(names, vec!["Hotel", "Taxi"]);
}

#[test]
fn test_decode_short_rows() {
    let values = grid(&[EN_HEADER, &["Visa", "1"]]);
    let item = &decode_table(&values, Schema::English).items[0];
    assert_eq!(item.quantity, 1);
    assert_eq!(item.unit_price, 0);
    assert!(!item.paid);
}

// ── encode ────────────────────────────────────────────────────

fn villa() -> BudgetItem {
    BudgetItem {
        name: "Villa".into(),
        quantity: 2,
        unit_price: 750_000,
        pricing_mode: PricingMode::PerUnit,
        paid: true,
        booked: false,
    }
}

#[test]
fn test_encode_item_english() {
    assert_eq!(
        encode_item(&villa(), Schema::English),
        vec!["Villa", "2", "750000", "1500000", "Per Unit", "TRUE", "FALSE"]
    );
}

#[test]
fn test_encode_item_indonesian_mode_label() {
    let mut item = villa();
    item.pricing_mode = PricingMode::LumpSum;
    let row = encode_item(&item, Schema::Indonesian);
    assert_eq!(row[3], "750000");
    assert_eq!(row[4], "Harga Total/Borongan");
}

#[test]
fn test_encode_table_has_header() {
    let rows = encode_table(&[villa(), villa()], Schema::English);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], Schema::English.headers());
}

#[test]
fn test_encode_decode_keeps_fields() {
    let items = vec![villa(), BudgetItem::new("Taxi".into(), 1, 90_000, PricingMode::LumpSum)];
    let table = decode_table(&encode_table(&items, Schema::Indonesian), Schema::Indonesian);
    assert_eq!(table.items, items);
}

#[test]
fn test_align_to_existing_header() {
    let header: Vec<String> = ["Item", "Notes", "Price", "Qty"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(
        align_to_header(&villa(), &header, Schema::English),
        vec!["Villa", "", "750000", "2"]
    );
}

#[test]
fn test_missing_columns() {
    let header: Vec<String> = ["Item", "Qty", "Price", "Total", "Type"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(missing_columns(&header), vec![Column::Paid, Column::Booked]);
    assert!(missing_columns(&Schema::Indonesian.headers()).is_empty());
}
