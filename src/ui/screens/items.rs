use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::format::format_rupiah;
use crate::models::Column;
use crate::session::ItemFilter;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::truncate;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if let Some(err) = &app.load_error {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Data unavailable",
                Style::default()
                    .fg(theme::RED)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(err.as_str(), theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled("Press r to retry", theme::dim_style())),
        ];
        f.render_widget(
            Paragraph::new(msg).centered().block(titled_block(" Items ")),
            area,
        );
        return;
    }

    let visible = app.visible();
    if visible.is_empty() {
        let hint = if app.filter == ItemFilter::All {
            "No items yet. Add one with :add <name> <qty> <price> [unit|lump]".to_string()
        } else {
            format!("No {} items. Show all with :filter all", app.filter)
        };
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled(hint, theme::dim_style())),
        ];
        f.render_widget(
            Paragraph::new(msg)
                .centered()
                .block(titled_block(" Items (0) ")),
            area,
        );
        return;
    }

    let header_cells = std::iter::once("#")
        .chain(Column::all().iter().map(|c| app.schema.header(*c)))
        .map(|h| Cell::from(h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = visible
        .iter()
        .enumerate()
        .skip(app.item_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .filter_map(|(pos, &idx)| app.session.get(idx).map(|row| (pos, idx, row)))
        .map(|(pos, idx, row)| {
            let item = &row.item;
            let is_cursor = pos == app.item_index;

            let style = if is_cursor {
                theme::selected_style()
            } else if row.delete {
                theme::deleted_style()
            } else if pos % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(format!("{}", idx + 1)),
                Cell::from(truncate(&item.name, 32)),
                Cell::from(item.quantity.to_string()),
                Cell::from(format_rupiah(item.unit_price)),
                Cell::from(format_rupiah(item.total())),
                Cell::from(app.schema.mode_label(item.pricing_mode)),
                flag_cell(item.paid, is_cursor),
                flag_cell(item.booked, is_cursor),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(16),
        Constraint::Length(5),
        Constraint::Length(16),
        Constraint::Length(16),
        Constraint::Length(20),
        flag_width(app, Column::Paid),
        flag_width(app, Column::Booked),
    ];

    let mut title = format!(" Items ({}) ", visible.len());
    if app.filter != ItemFilter::All {
        title.push_str(&format!("filter: {} ", app.filter));
    }
    let deleted = app.session.deleted_count();
    if deleted > 0 {
        title.push_str(&format!("[{deleted} to delete] "));
    }
    if app.is_dirty() {
        title.push_str("[modified] ");
    }

    let table = Table::new(rows, widths)
        .header(header)
        .block(titled_block(&title));
    f.render_widget(table, area);
}

fn flag_cell(value: bool, is_cursor: bool) -> Cell<'static> {
    let (text, style) = if value {
        ("Yes", theme::paid_style())
    } else {
        ("No", theme::dim_style())
    };
    if is_cursor {
        Cell::from(text)
    } else {
        Cell::from(Span::styled(text, style))
    }
}

fn flag_width(app: &App, column: Column) -> Constraint {
    Constraint::Length(app.schema.header(column).chars().count().max(3) as u16 + 1)
}

fn titled_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            title.to_string(),
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ))
}
