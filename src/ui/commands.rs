use std::collections::HashMap;
use std::sync::LazyLock;

use super::app::{App, PendingAction, Screen};
use crate::book::BudgetBook;
use crate::export::{self, ExportFormat};
use crate::format::{format_rupiah, parse_amount, parse_quantity};
use crate::models::{BudgetItem, PricingMode};
use crate::session::ItemFilter;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut BudgetBook) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit TripBudget", cmd_quit, r);
    register_command!("quit", "Quit TripBudget", cmd_quit, r);
    register_command!("q!", "Quit without saving", cmd_force_quit, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "add",
        "Add item (e.g. :add Hotel 3 500000 unit)",
        cmd_add,
        r
    );
    register_command!("a", "Add item (e.g. :a Tour 1 800000 lump)", cmd_add, r);
    register_command!("name", "Rename selected item", cmd_name, r);
    register_command!("qty", "Set quantity of selected item", cmd_qty, r);
    register_command!(
        "price",
        "Set price of selected item (e.g. :price 600000)",
        cmd_price,
        r
    );
    register_command!(
        "mode",
        "Set pricing of selected item (unit or lump)",
        cmd_mode,
        r
    );
    register_command!("save", "Save all edits to the sheet", cmd_save, r);
    register_command!("w", "Save all edits to the sheet", cmd_save, r);
    register_command!("refresh", "Reload items from the sheet", cmd_refresh, r);
    register_command!(
        "filter",
        "Filter items (all, paid, unpaid, booked, unbooked)",
        cmd_filter,
        r
    );
    register_command!("f", "Filter items", cmd_filter, r);
    register_command!(
        "export",
        "Export items (e.g. :export xlsx ~/trip.xlsx)",
        cmd_export,
        r
    );
    register_command!("items", "Go to Items", cmd_items, r);
    register_command!("i", "Go to Items", cmd_items, r);
    register_command!("summary", "Go to Summary", cmd_summary, r);
    register_command!("s", "Go to Summary", cmd_summary, r);

    r
});

pub(crate) fn handle_command(
    input: &str,
    app: &mut App,
    book: &mut BudgetBook,
) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, book)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

const ADD_USAGE: &str = "Usage: :add <name> <qty> <price> [unit|lump]";

/// Parse `<name> <qty> <price> [unit|lump]` from the right, so names may
/// contain spaces.
pub(crate) fn parse_add_args(args: &str) -> Result<BudgetItem, String> {
    let mut words: Vec<&str> = args.split_whitespace().collect();

    let mode = match words.last().map(|w| w.to_lowercase()) {
        Some(w) if is_mode_word(&w) => {
            words.pop();
            PricingMode::parse(&w)
        }
        _ => PricingMode::PerUnit,
    };

    if words.len() < 3 {
        return Err(ADD_USAGE.to_string());
    }
    let price_word = words.pop().unwrap_or_default();
    let qty_word = words.pop().unwrap_or_default();
    let price = parse_amount(price_word).ok_or_else(|| format!("Invalid price: '{price_word}'"))?;
    let quantity =
        parse_quantity(qty_word).ok_or_else(|| format!("Invalid quantity: '{qty_word}'"))?;

    BudgetItem::from_form(&words.join(" "), quantity, price, mode).map_err(|e| e.to_string())
}

pub(crate) fn is_mode_word(word: &str) -> bool {
    matches!(
        word,
        "unit" | "per-unit" | "perunit" | "satuan" | "lump" | "lumpsum" | "lump-sum" | "total"
            | "borongan"
    )
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _book: &mut BudgetBook) -> anyhow::Result<()> {
    if app.is_dirty() {
        app.confirm(PendingAction::Quit, "Quit and discard unsaved edits?");
    } else {
        app.running = false;
    }
    Ok(())
}

fn cmd_force_quit(_args: &str, app: &mut App, _book: &mut BudgetBook) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _book: &mut BudgetBook) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_items(_args: &str, app: &mut App, _book: &mut BudgetBook) -> anyhow::Result<()> {
    app.screen = Screen::Items;
    Ok(())
}

fn cmd_summary(_args: &str, app: &mut App, _book: &mut BudgetBook) -> anyhow::Result<()> {
    app.screen = Screen::Summary;
    Ok(())
}

fn cmd_add(args: &str, app: &mut App, book: &mut BudgetBook) -> anyhow::Result<()> {
    if !app.writable() {
        app.set_status("Data unavailable. Reload with r before adding");
        return Ok(());
    }
    // Appending reloads the grid, which would throw away pending edits.
    if app.is_dirty() {
        app.set_status("Save (:w) or reload (r) pending edits before adding");
        return Ok(());
    }

    let item = match parse_add_args(args) {
        Ok(item) => item,
        Err(msg) => {
            app.set_status(msg);
            return Ok(());
        }
    };

    match book.append(&item) {
        Ok(()) => {
            app.reload(book, false);
            app.screen = Screen::Items;
            app.set_status(format!(
                "Added '{}' ({})",
                item.name,
                format_rupiah(item.total())
            ));
        }
        Err(e) => {
            app.set_status(format!(
                "Could not add '{}': {}",
                item.name,
                super::app::describe_error(&e)
            ));
        }
    }
    Ok(())
}

fn cmd_name(args: &str, app: &mut App, _book: &mut BudgetBook) -> anyhow::Result<()> {
    let name = args.to_string();
    app.edit_selected(|session, idx| {
        session.set_name(idx, &name)?;
        Ok(format!("Renamed to '{}'", name.trim()))
    });
    Ok(())
}

fn cmd_qty(args: &str, app: &mut App, _book: &mut BudgetBook) -> anyhow::Result<()> {
    let Some(quantity) = parse_quantity(args) else {
        app.set_status("Usage: :qty <whole number>");
        return Ok(());
    };
    app.edit_selected(|session, idx| {
        session.set_quantity(idx, quantity)?;
        Ok(format!("Quantity set to {quantity}"))
    });
    Ok(())
}

fn cmd_price(args: &str, app: &mut App, _book: &mut BudgetBook) -> anyhow::Result<()> {
    let Some(price) = parse_amount(args) else {
        app.set_status("Usage: :price <amount>");
        return Ok(());
    };
    app.edit_selected(|session, idx| {
        session.set_unit_price(idx, price)?;
        let total = session.get(idx).map(|r| r.item.total()).unwrap_or_default();
        Ok(format!("Price set, total now {}", format_rupiah(total)))
    });
    Ok(())
}

fn cmd_mode(args: &str, app: &mut App, _book: &mut BudgetBook) -> anyhow::Result<()> {
    let word = args.trim().to_lowercase();
    if !is_mode_word(&word) {
        let labels: Vec<&str> = PricingMode::all()
            .iter()
            .map(|m| app.schema.mode_label(*m))
            .collect();
        app.set_status(format!("Usage: :mode <unit|lump> ({})", labels.join(" or ")));
        return Ok(());
    }
    let mode = PricingMode::parse(&word);
    let label = app.schema.mode_label(mode);
    app.edit_selected(|session, idx| {
        session.set_pricing_mode(idx, mode);
        Ok(format!("Pricing set to {label}"))
    });
    Ok(())
}

fn cmd_save(_args: &str, app: &mut App, _book: &mut BudgetBook) -> anyhow::Result<()> {
    if !app.writable() {
        app.set_status("Data unavailable. Reload with r before saving");
        return Ok(());
    }
    let count = app.session.items_to_save().len();
    let deleted = app.session.deleted_count();
    let mut msg = format!("Overwrite '{}' with {count} items", app.sheet_title);
    if deleted > 0 {
        msg.push_str(&format!(" ({deleted} deleted)"));
    }
    msg.push('?');
    app.confirm(PendingAction::Save, msg);
    Ok(())
}

fn cmd_refresh(_args: &str, app: &mut App, book: &mut BudgetBook) -> anyhow::Result<()> {
    if app.is_dirty() {
        app.confirm(PendingAction::Reload, "Reload and discard unsaved edits?");
    } else {
        app.reload(book, true);
        if app.writable() {
            app.set_status(format!("Reloaded {} items", app.session.len()));
        }
    }
    Ok(())
}

fn cmd_filter(args: &str, app: &mut App, _book: &mut BudgetBook) -> anyhow::Result<()> {
    match ItemFilter::parse(args) {
        Some(filter) => {
            app.set_filter(filter);
            app.screen = Screen::Items;
            app.set_status(format!(
                "Filter: {filter} ({} items)",
                app.visible().len()
            ));
        }
        None => app.set_status("Usage: :filter <all|paid|unpaid|booked|unbooked>"),
    }
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, book: &mut BudgetBook) -> anyhow::Result<()> {
    let mut words = args.split_whitespace().peekable();
    let named = words.peek().and_then(|w| ExportFormat::parse(w));
    if named.is_some() {
        words.next();
    }
    let path = words.next().map(crate::run::shellexpand);
    let format = named
        .or_else(|| path.as_deref().map(ExportFormat::from_path))
        .unwrap_or(ExportFormat::Csv);
    let path = path.unwrap_or_else(|| {
        export::default_file_name(format, chrono::Local::now().naive_local())
    });

    let items = app.session.shown_items(app.filter);
    if items.is_empty() {
        app.set_status("No items to export");
        return Ok(());
    }
    match export::export_to_file(&items, book.schema(), format, &path) {
        Ok(count) if app.filter != ItemFilter::All => app.set_status(format!(
            "Exported {count} {} items to {path}",
            app.filter
        )),
        Ok(count) => app.set_status(format!("Exported {count} items to {path}")),
        Err(e) => app.set_status(format!("Export failed: {e:#}")),
    }
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
