#![allow(clippy::unwrap_used)]

use std::time::Duration;

use super::*;
use crate::models::Schema;
use crate::sheet::{MemoryWorksheet, SheetError};
use crate::ui::app::InputMode;

const HEADER: &[&str] = &["Item", "Qty", "Price", "Total", "Type", "Paid", "Booked"];

fn book_with(rows: &[&[&str]]) -> BudgetBook {
    BudgetBook::new(
        Box::new(MemoryWorksheet::with_rows("Sheet1", rows)),
        Schema::English,
        Duration::from_secs(60),
    )
}

fn loaded(book: &mut BudgetBook) -> App {
    let mut app = App::new(book);
    app.reload(book, false);
    app
}

fn hotel_book() -> BudgetBook {
    book_with(&[
        HEADER,
        &["Hotel", "3", "500000", "1500000", "Per Unit", "FALSE", "FALSE"],
        &["Tour", "2", "800000", "800000", "Lump Sum", "TRUE", "TRUE"],
    ])
}

// ── :add parsing ─────────────────────────────────────────────

#[test]
fn test_parse_add_multi_word_name() {
    let item = parse_add_args("Villa in Ubud 3 500000").unwrap();
    assert_eq!(item.name, "Villa in Ubud");
    assert_eq!(item.quantity, 3);
    assert_eq!(item.unit_price, 500_000);
    assert_eq!(item.pricing_mode, PricingMode::PerUnit);
    assert_eq!(item.total(), 1_500_000);
}

#[test]
fn test_parse_add_lump_sum() {
    let item = parse_add_args("Tour 4 1,500,000 lump").unwrap();
    assert_eq!(item.pricing_mode, PricingMode::LumpSum);
    assert_eq!(item.total(), 1_500_000);
}

#[test]
fn test_parse_add_rejects_bad_input() {
    assert_eq!(parse_add_args("Hotel 3").unwrap_err(), ADD_USAGE);
    assert!(parse_add_args("Hotel x 500").unwrap_err().contains("quantity"));
    assert_eq!(
        parse_add_args("Hotel 0 500").unwrap_err(),
        "Quantity must be greater than 0"
    );
    assert_eq!(
        parse_add_args("Hotel 1 -5").unwrap_err(),
        "Price must not be negative"
    );
}

// ── dispatch ─────────────────────────────────────────────────

#[test]
fn test_levenshtein() {
    assert_eq!(levenshtein("save", "save"), 0);
    assert_eq!(levenshtein("sav", "save"), 1);
    assert_eq!(levenshtein("", "abc"), 3);
}

#[test]
fn test_unknown_command_suggests_closest() {
    let mut book = hotel_book();
    let mut app = loaded(&mut book);
    handle_command("exprt", &mut app, &mut book).unwrap();
    assert!(app.status_message.contains("Did you mean :export?"));
}

#[test]
fn test_add_appends_and_reloads() {
    let mut book = book_with(&[HEADER]);
    let mut app = loaded(&mut book);
    handle_command("add Hotel 3 500000", &mut app, &mut book).unwrap();

    assert_eq!(app.session.len(), 1);
    assert_eq!(app.summary().grand_total, 1_500_000);
    assert!(app.status_message.contains("Rp 1,500,000"));
    assert_eq!(book.load().unwrap().items[0].name, "Hotel");
}

#[test]
fn test_add_is_refused_with_pending_edits() {
    let mut book = hotel_book();
    let mut app = loaded(&mut book);
    handle_command("price 600000", &mut app, &mut book).unwrap();
    handle_command("add Taxi 1 100000", &mut app, &mut book).unwrap();

    assert_eq!(book.load().unwrap().len(), 2);
    assert!(app.status_message.contains("before adding"));
}

// ── editing and saving ───────────────────────────────────────

#[test]
fn test_price_edit_then_save() {
    let mut book = hotel_book();
    let mut app = loaded(&mut book);
    handle_command("price 600000", &mut app, &mut book).unwrap();
    assert!(app.is_dirty());
    assert_eq!(app.summary().grand_total, 2_600_000);

    handle_command("w", &mut app, &mut book).unwrap();
    assert_eq!(app.input_mode, InputMode::Confirm);
    assert_eq!(app.pending_action, Some(PendingAction::Save));

    app.save(&mut book);
    assert!(!app.is_dirty());
    let table = book.load().unwrap();
    assert_eq!(table.items[0].unit_price, 600_000);
    assert_eq!(table.items[0].total(), 1_800_000);
}

#[test]
fn test_invalid_edit_reports_and_keeps_value() {
    let mut book = hotel_book();
    let mut app = loaded(&mut book);
    handle_command("qty 0", &mut app, &mut book).unwrap();
    assert_eq!(app.status_message, "Quantity must be greater than 0");
    assert!(!app.is_dirty());

    handle_command("name   ", &mut app, &mut book).unwrap();
    assert_eq!(app.status_message, "Item name must not be empty");
}

#[test]
fn test_decimal_quantity_is_rejected() {
    let mut book = hotel_book();
    let mut app = loaded(&mut book);
    handle_command("qty 2.5", &mut app, &mut book).unwrap();
    assert!(app.status_message.starts_with("Usage: :qty"));
    assert_eq!(app.session.get(0).unwrap().item.quantity, 3);
    assert!(parse_add_args("Snorkel 2.5 100000").is_err());
}

#[test]
fn test_mode_command() {
    let mut book = hotel_book();
    let mut app = loaded(&mut book);
    handle_command("mode lump", &mut app, &mut book).unwrap();
    assert_eq!(app.session.get(0).unwrap().item.total(), 500_000);
    handle_command("mode sometimes", &mut app, &mut book).unwrap();
    assert!(app.status_message.starts_with("Usage"));
}

#[test]
fn test_quit_asks_when_dirty() {
    let mut book = hotel_book();
    let mut app = loaded(&mut book);
    handle_command("q", &mut app, &mut book).unwrap();
    assert!(!app.running);

    let mut app = loaded(&mut book);
    handle_command("qty 4", &mut app, &mut book).unwrap();
    handle_command("q", &mut app, &mut book).unwrap();
    assert!(app.running);
    assert_eq!(app.pending_action, Some(PendingAction::Quit));

    handle_command("q!", &mut app, &mut book).unwrap();
    assert!(!app.running);
}

#[test]
fn test_filter_moves_selection_to_visible_rows() {
    let mut book = hotel_book();
    let mut app = loaded(&mut book);
    handle_command("filter paid", &mut app, &mut book).unwrap();
    assert_eq!(app.visible(), vec![1]);
    assert_eq!(app.selected(), Some(1));

    handle_command("price 900000", &mut app, &mut book).unwrap();
    assert_eq!(app.session.get(1).unwrap().item.unit_price, 900_000);
    assert_eq!(app.session.get(0).unwrap().item.unit_price, 500_000);

    handle_command("filter maybe", &mut app, &mut book).unwrap();
    assert!(app.status_message.starts_with("Usage"));
}

// ── failures ─────────────────────────────────────────────────

#[test]
fn test_load_failure_disables_writes() {
    let mut sheet = MemoryWorksheet::new("Sheet1");
    sheet.fail_reads = Some(SheetError::Connection("offline".into()));
    let mut book = BudgetBook::new(Box::new(sheet), Schema::English, Duration::from_secs(60));
    let mut app = loaded(&mut book);

    assert!(!app.writable());
    assert!(app.load_error.as_deref().unwrap().starts_with("Data unavailable"));

    handle_command("add Hotel 1 100", &mut app, &mut book).unwrap();
    assert!(app.status_message.contains("Reload"));
    handle_command("w", &mut app, &mut book).unwrap();
    assert_eq!(app.pending_action, None);
}

#[test]
fn test_save_failure_keeps_edits() {
    let mut sheet = MemoryWorksheet::with_rows(
        "Sheet1",
        &[HEADER, &["Hotel", "3", "500000", "1500000", "Per Unit", "FALSE", "FALSE"]],
    );
    sheet.fail_writes = Some(SheetError::Write("quota exceeded".into()));
    let mut book = BudgetBook::new(Box::new(sheet), Schema::English, Duration::from_secs(60));
    let mut app = loaded(&mut book);

    handle_command("price 600000", &mut app, &mut book).unwrap();
    app.save(&mut book);
    assert!(app.is_dirty());
    assert!(app.status_message.starts_with("Save failed"));
    assert_eq!(app.session.get(0).unwrap().item.unit_price, 600_000);
}

#[test]
fn test_export_command_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trip.xlsx");
    let mut book = hotel_book();
    let mut app = loaded(&mut book);

    handle_command(
        &format!("export {}", path.display()),
        &mut app,
        &mut book,
    )
    .unwrap();
    assert!(app.status_message.starts_with("Exported 2 items"));
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn test_export_follows_filter_and_skips_deleted_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("paid.csv");
    let mut book = book_with(&[
        HEADER,
        &["Hotel", "3", "500000", "1500000", "Per Unit", "TRUE", "FALSE"],
        &["Taxi", "1", "50", "50", "Per Unit", "FALSE", "FALSE"],
        &["Tour", "2", "800000", "800000", "Lump Sum", "TRUE", "TRUE"],
    ]);
    let mut app = loaded(&mut book);

    handle_command("filter paid", &mut app, &mut book).unwrap();
    app.session.toggle_delete(2);
    handle_command(&format!("export csv {}", path.display()), &mut app, &mut book).unwrap();

    assert!(app.status_message.starts_with("Exported 1 paid items"));
    let csv = std::fs::read_to_string(&path).unwrap();
    assert!(csv.contains("Hotel"));
    assert!(!csv.contains("Taxi"));
    assert!(!csv.contains("Tour"));
}
