use anyhow::{Context, Result};

use crate::book::BudgetBook;
use crate::export::{self, ExportFormat};
use crate::format::{format_rupiah, parse_amount, parse_quantity};
use crate::models::{BudgetItem, Column, PricingMode, Schema};
use crate::session::{EditSession, ItemFilter};
use crate::ui::commands::is_mode_word;
use crate::summary::Summary;
use crate::ui::util::truncate;

pub(crate) fn as_cli(args: &[String], book: &mut BudgetBook) -> Result<()> {
    match args[1].as_str() {
        "add" | "a" => cli_add(&args[2..], book),
        "list" | "ls" => cli_list(&args[2..], book),
        "summary" | "s" => cli_summary(book),
        "set" => cli_set(&args[2..], book),
        "pay" => cli_flag(&args[2..], book, Flag::Paid, true),
        "unpay" => cli_flag(&args[2..], book, Flag::Paid, false),
        "book" => cli_flag(&args[2..], book, Flag::Booked, true),
        "unbook" => cli_flag(&args[2..], book, Flag::Booked, false),
        "delete" | "rm" => cli_delete(&args[2..], book),
        "export" => cli_export(&args[2..], book),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("tripbudget {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("TripBudget: plan a trip budget in Rupiah");
    println!();
    println!("Usage: tripbudget [command]");
    println!();
    println!("Commands:");
    println!("  (none)                            Launch interactive TUI");
    println!("  add <name>                        Add an item");
    println!("    --qty <n>                       Quantity (default: 1)");
    println!("    --price <rp>                    Price in whole Rupiah (default: 0)");
    println!("    --lump                          Price covers the whole line");
    println!("    --paid, --booked                Mark the new item");
    println!("  list [--paid|--unpaid|--booked|--unbooked]");
    println!("                                    List items with row numbers");
    println!("  summary                           Print budget totals");
    println!("  set <row> <name|qty|price|mode> <value>");
    println!("                                    Edit one field of an item");
    println!("  pay|unpay <row>                   Mark an item paid or unpaid");
    println!("  book|unbook <row>                 Mark an item booked or not");
    println!("  delete <row>                      Remove an item");
    println!("  export [path] [--xlsx] [--paid|--unpaid|--booked|--unbooked]");
    println!("                                    Export to CSV (or Excel)");
    println!("  --help, -h                        Show this help");
    println!("  --version, -V                     Show version");
    println!();
    println!("Environment: TRIPBUDGET_DB, TRIPBUDGET_WORKSHEET, TRIPBUDGET_SCHEMA (en|id),");
    println!("             TRIPBUDGET_CACHE_TTL (seconds), RUST_LOG");
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn parse_number(value: &str, what: &str) -> Result<i64> {
    parse_amount(value).with_context(|| format!("Invalid {what}: '{value}'"))
}

fn parse_count(value: &str) -> Result<i64> {
    parse_quantity(value).with_context(|| format!("Invalid quantity: '{value}' (whole number)"))
}

fn parse_mode(value: &str) -> Result<PricingMode> {
    let word = value.trim().to_lowercase();
    if !is_mode_word(&word) {
        anyhow::bail!("Invalid pricing mode: '{value}' (expected unit or lump)");
    }
    Ok(PricingMode::parse(&word))
}

fn filter_arg(args: &[String]) -> ItemFilter {
    args.iter()
        .filter_map(|a| a.strip_prefix("--"))
        .find_map(ItemFilter::parse)
        .unwrap_or_default()
}

/// `(paid, booked)` column widths, wide enough for the schema's headers.
fn flag_widths(schema: Schema) -> (usize, usize) {
    (
        schema.header(Column::Paid).chars().count().max(5),
        schema.header(Column::Booked).chars().count().max(6),
    )
}

fn list_header(schema: Schema) -> String {
    let (pw, bw) = flag_widths(schema);
    let h = |c| schema.header(c);
    format!(
        "{:>3}  {:<24} {:>5} {:>16} {:>16}  {:<12} {:<pw$} {:<bw$}",
        "#",
        h(Column::Name),
        h(Column::Quantity),
        h(Column::UnitPrice),
        h(Column::Total),
        h(Column::PricingMode),
        h(Column::Paid),
        h(Column::Booked),
    )
}

/// Turn a 1-based row argument into an index into `len` rows.
pub(crate) fn parse_row(arg: Option<&String>, len: usize) -> Result<usize> {
    let arg = arg.ok_or_else(|| anyhow::anyhow!("Missing row number"))?;
    let row: usize = arg
        .parse()
        .with_context(|| format!("Invalid row number: '{arg}'"))?;
    if row == 0 || row > len {
        anyhow::bail!("Row {row} out of range (1-{len})");
    }
    Ok(row - 1)
}

fn cli_add(args: &[String], book: &mut BudgetBook) -> Result<()> {
    let name = args
        .first()
        .filter(|a| !a.starts_with("--"))
        .ok_or_else(|| anyhow::anyhow!("Usage: tripbudget add <name> [--qty N] [--price P]"))?;

    let quantity = flag_value(args, "--qty")
        .map(parse_count)
        .transpose()?
        .unwrap_or(1);
    let price = flag_value(args, "--price")
        .map(|v| parse_number(v, "price"))
        .transpose()?
        .unwrap_or(0);
    let mode = if has_flag(args, "--lump") {
        PricingMode::LumpSum
    } else {
        PricingMode::PerUnit
    };

    let mut item = BudgetItem::from_form(name, quantity, price, mode)?;
    item.paid = has_flag(args, "--paid");
    item.booked = has_flag(args, "--booked");

    book.append(&item)?;
    println!(
        "Added '{}' ({})",
        item.name,
        format_rupiah(item.total())
    );
    Ok(())
}

fn cli_list(args: &[String], book: &mut BudgetBook) -> Result<()> {
    let filter = filter_arg(args);

    let table = book.load()?;
    let session = EditSession::from_table(&table);
    let visible = session.visible(filter);
    if visible.is_empty() {
        println!("No items");
        return Ok(());
    }

    let schema = book.schema();
    let (pw, bw) = flag_widths(schema);
    let header = list_header(schema);
    println!("{header}");
    println!("{}", "─".repeat(header.chars().count()));
    for idx in visible {
        let Some(row) = session.get(idx) else {
            continue;
        };
        let item = &row.item;
        println!(
            "{:>3}  {:<24} {:>5} {:>16} {:>16}  {:<12} {:<pw$} {:<bw$}",
            idx + 1,
            truncate(&item.name, 24),
            item.quantity,
            format_rupiah(item.unit_price),
            format_rupiah(item.total()),
            truncate(schema.mode_label(item.pricing_mode), 12),
            if item.paid { "yes" } else { "no" },
            if item.booked { "yes" } else { "no" },
        );
    }
    Ok(())
}

fn cli_summary(book: &mut BudgetBook) -> Result<()> {
    let table = book.load()?;
    let summary = Summary::from_items(&table.items);

    println!("TripBudget: {}", book.title());
    println!("{}", "─".repeat(40));
    println!("  Grand total:  {}", format_rupiah(summary.grand_total));
    println!("  Paid:         {}", format_rupiah(summary.paid_total));
    println!("  Remaining:    {}", format_rupiah(summary.remaining));
    println!("  Paid share:   {}%", summary.paid_percentage);
    println!("  Items:        {}", summary.item_count);
    println!("  Quantity:     {}", summary.total_quantity);
    println!("  Avg price:    {}", format_rupiah(summary.average_price));
    println!("  Booked:       {}/{}", summary.booked_count, summary.item_count);
    Ok(())
}

/// Load, apply one edit, and write the whole table back.
fn edit_and_save(
    book: &mut BudgetBook,
    edit: impl FnOnce(&mut EditSession) -> Result<String>,
) -> Result<()> {
    let table = book.load()?;
    let mut session = EditSession::from_table(&table);
    let message = edit(&mut session)?;
    book.save_all(&session.items_to_save())?;
    println!("{message}");
    Ok(())
}

fn cli_set(args: &[String], book: &mut BudgetBook) -> Result<()> {
    if args.len() < 3 {
        anyhow::bail!("Usage: tripbudget set <row> <name|qty|price|mode> <value>");
    }
    let field = args[1].to_lowercase();
    let value = args[2..].join(" ");

    edit_and_save(book, |session| {
        let idx = parse_row(args.first(), session.len())?;
        match field.as_str() {
            "name" => {
                session.set_name(idx, &value)?;
            }
            "qty" | "quantity" => {
                session.set_quantity(idx, parse_count(&value)?)?;
            }
            "price" => {
                session.set_unit_price(idx, parse_number(&value, "price")?)?;
            }
            "mode" | "type" => {
                session.set_pricing_mode(idx, parse_mode(&value)?);
            }
            other => anyhow::bail!("Unknown field: {other} (expected name, qty, price or mode)"),
        }
        let total = session
            .get(idx)
            .map(|r| r.item.total())
            .unwrap_or_default();
        Ok(format!("Row {} updated, total {}", idx + 1, format_rupiah(total)))
    })
}

#[derive(Debug, Clone, Copy)]
enum Flag {
    Paid,
    Booked,
}

fn cli_flag(args: &[String], book: &mut BudgetBook, flag: Flag, value: bool) -> Result<()> {
    edit_and_save(book, |session| {
        let idx = parse_row(args.first(), session.len())?;
        let current = session
            .get(idx)
            .map(|r| match flag {
                Flag::Paid => r.item.paid,
                Flag::Booked => r.item.booked,
            })
            .unwrap_or(value);
        if current != value {
            match flag {
                Flag::Paid => session.toggle_paid(idx),
                Flag::Booked => session.toggle_booked(idx),
            };
        }
        let name = session.get(idx).map(|r| r.item.name.clone()).unwrap_or_default();
        let state = match (flag, value) {
            (Flag::Paid, true) => "paid",
            (Flag::Paid, false) => "unpaid",
            (Flag::Booked, true) => "booked",
            (Flag::Booked, false) => "not booked",
        };
        Ok(format!("'{name}' marked {state}"))
    })
}

fn cli_delete(args: &[String], book: &mut BudgetBook) -> Result<()> {
    edit_and_save(book, |session| {
        let idx = parse_row(args.first(), session.len())?;
        session.toggle_delete(idx);
        let name = session.get(idx).map(|r| r.item.name.clone()).unwrap_or_default();
        Ok(format!("Deleted '{name}'"))
    })
}

fn cli_export(args: &[String], book: &mut BudgetBook) -> Result<()> {
    let path_arg = args.first().filter(|a| !a.starts_with('-'));
    let format = if has_flag(args, "--xlsx") {
        ExportFormat::Xlsx
    } else {
        path_arg
            .map(|p| ExportFormat::from_path(p))
            .unwrap_or(ExportFormat::Csv)
    };
    let output_path = path_arg.map(|a| shellexpand(a)).unwrap_or_else(|| {
        export::default_file_name(format, chrono::Local::now().naive_local())
    });

    let table = book.load()?;
    let items = EditSession::from_table(&table).shown_items(filter_arg(args));
    if items.is_empty() {
        println!("No items to export");
        return Ok(());
    }
    let count = export::export_to_file(&items, book.schema(), format, &output_path)?;
    println!("Exported {count} items to {output_path}");
    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
