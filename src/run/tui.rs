use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::book::BudgetBook;
use crate::ui::app::{App, InputMode, PendingAction, Screen};
use crate::ui::commands;

pub(crate) fn as_tui(book: &mut BudgetBook) -> Result<()> {
    let mut app = App::new(book);
    app.reload(book, false);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, book);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        log::error!("TUI exited with error: {e:#}");
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    book: &mut BudgetBook,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            // tab bar, status bar, command bar, table borders and header
            let content_height = f.area().height.saturating_sub(6) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, book)?,
                InputMode::Command => handle_command_input(key, app, book)?,
                InputMode::Confirm => handle_confirm_input(key, app, book),
            }
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(
    key: event::KeyEvent,
    app: &mut App,
    book: &mut BudgetBook,
) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            commands::handle_command("q", app, book)?;
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..app.visible_rows / 2 {
                app.move_down();
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..app.visible_rows / 2 {
                app.move_up();
            }
        }
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('g') | KeyCode::Home => app.goto_top(),
        KeyCode::Char('G') | KeyCode::End => app.goto_bottom(),
        KeyCode::Char('1') => app.screen = Screen::Items,
        KeyCode::Char('2') => app.screen = Screen::Summary,
        KeyCode::Tab | KeyCode::BackTab => {
            app.screen = match app.screen {
                Screen::Items => Screen::Summary,
                Screen::Summary => Screen::Items,
            };
        }
        KeyCode::Char('p') if app.screen == Screen::Items => {
            app.edit_selected(|session, idx| {
                let paid = session.toggle_paid(idx).unwrap_or_default();
                Ok(if paid { "Marked paid" } else { "Marked unpaid" }.to_string())
            });
        }
        KeyCode::Char('b') if app.screen == Screen::Items => {
            app.edit_selected(|session, idx| {
                let booked = session.toggle_booked(idx).unwrap_or_default();
                Ok(if booked { "Marked booked" } else { "Marked not booked" }.to_string())
            });
        }
        KeyCode::Char('x') if app.screen == Screen::Items => {
            app.edit_selected(|session, idx| {
                let delete = session.toggle_delete(idx).unwrap_or_default();
                Ok(if delete {
                    "Marked for deletion on save"
                } else {
                    "Deletion mark removed"
                }
                .to_string())
            });
        }
        KeyCode::Char('e') | KeyCode::Enter if app.screen == Screen::Items => {
            let name = app
                .selected()
                .and_then(|idx| app.session.get(idx))
                .map(|row| row.item.name.clone());
            if let Some(name) = name {
                app.command_input = format!("name {name}");
                app.input_mode = InputMode::Command;
            }
        }
        KeyCode::Char('w') => commands::handle_command("save", app, book)?,
        KeyCode::Char('r') => commands::handle_command("refresh", app, book)?,
        KeyCode::Char('f') => {
            let next = next_filter(app.filter);
            commands::handle_command(&format!("filter {next}"), app, book)?;
        }
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Esc => app.status_message.clear(),
        _ => {}
    }
    Ok(())
}

fn next_filter(current: crate::session::ItemFilter) -> crate::session::ItemFilter {
    use crate::session::ItemFilter;
    match current {
        ItemFilter::All => ItemFilter::Paid,
        ItemFilter::Paid => ItemFilter::Unpaid,
        ItemFilter::Unpaid => ItemFilter::Booked,
        ItemFilter::Booked => ItemFilter::Unbooked,
        ItemFilter::Unbooked => ItemFilter::All,
    }
}

fn handle_command_input(
    key: event::KeyEvent,
    app: &mut App,
    book: &mut BudgetBook,
) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, book)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_confirm_input(key: event::KeyEvent, app: &mut App, book: &mut BudgetBook) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
            if let Some(action) = app.pending_action.take() {
                match action {
                    PendingAction::Save => app.save(book),
                    PendingAction::Reload => {
                        app.reload(book, true);
                        if app.writable() {
                            app.set_status("Edits discarded, reloaded from the sheet");
                        }
                    }
                    PendingAction::Quit => app.running = false,
                }
            }
        }
        _ => {
            // Any other key = cancel
            app.pending_action = None;
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
            app.set_status("Cancelled");
        }
    }
}
