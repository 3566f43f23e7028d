use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Gauge, Paragraph},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;

use crate::format::format_rupiah;
use crate::summary::Summary;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::truncate;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let summary = app.summary();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Summary cards
            Constraint::Length(3), // Paid gauge
            Constraint::Min(8),    // Largest items
        ])
        .split(area);

    render_summary_cards(f, chunks[0], &summary);
    render_paid_gauge(f, chunks[1], &summary);
    render_items_chart(f, chunks[2], app);
}

fn render_summary_cards(f: &mut Frame, area: Rect, summary: &Summary) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    render_card(
        f,
        cards[0],
        "Grand Total",
        format_rupiah(summary.grand_total),
        theme::ACCENT,
        format!("{} pcs", summary.total_quantity),
    );
    render_card(
        f,
        cards[1],
        "Paid",
        format_rupiah(summary.paid_total),
        theme::GREEN,
        format!("{}%", summary.paid_percentage),
    );
    render_card(
        f,
        cards[2],
        "Remaining",
        format_rupiah(summary.remaining),
        if summary.remaining == 0 {
            theme::GREEN
        } else {
            theme::RED
        },
        String::new(),
    );
    render_card(
        f,
        cards[3],
        "Items",
        summary.item_count.to_string(),
        theme::TEXT,
        format!(
            "{} booked, avg {}",
            summary.booked_count,
            format_rupiah(summary.average_price)
        ),
    );
}

fn render_card(
    f: &mut Frame,
    area: Rect,
    title: &str,
    value: String,
    color: ratatui::style::Color,
    subtitle: String,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ));

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle, theme::dim_style())),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

fn render_paid_gauge(f: &mut Frame, area: Rect, summary: &Summary) {
    let percent = summary.paid_percentage.to_f64().unwrap_or(0.0);
    let ratio = (percent / 100.0).clamp(0.0, 1.0);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::OVERLAY))
                .title(Span::styled(
                    " Payment Progress ",
                    Style::default()
                        .fg(theme::TEXT_DIM)
                        .add_modifier(Modifier::BOLD),
                )),
        )
        .gauge_style(Style::default().fg(theme::GREEN).bg(theme::SURFACE))
        .ratio(ratio)
        .label(format!("{}% paid", summary.paid_percentage));

    f.render_widget(gauge, area);
}

fn render_items_chart(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            " Largest Items ",
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ));

    let mut items = app.session.items_to_save();
    if items.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "Nothing budgeted yet. Add items with :add",
            theme::dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }
    items.sort_by_key(|i| std::cmp::Reverse(i.total()));

    let bars: Vec<Bar> = items
        .iter()
        .take(12)
        .map(|item| {
            let color = if item.paid { theme::GREEN } else { theme::YELLOW };
            Bar::default()
                .value(item.total())
                .text_value(format_rupiah(item.total()))
                .label(Line::from(truncate(&item.name, 12)))
                .style(Style::default().fg(color))
                .value_style(
                    Style::default()
                        .fg(theme::HEADER_BG)
                        .bg(color)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(12)
        .bar_gap(1)
        .bar_style(Style::default().fg(theme::ACCENT))
        .value_style(Style::default().fg(theme::TEXT));

    f.render_widget(chart, area);
}
