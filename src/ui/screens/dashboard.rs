use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Wrap},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, ratio, truncate};
use crate::validate::DATE_FORMAT;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Summary cards
            Constraint::Min(10),   // Series chart + category totals
            Constraint::Length(8), // Recent transactions + insights
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);
    render_series_chart(f, middle[0], app);
    render_category_totals(f, middle[1], app);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[2]);
    render_recent(f, bottom[0], app);
    render_insights(f, bottom[1], app);
}

fn panel(title: impl Into<String>) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(format!(" {} ", title.into()), theme::title_style()))
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    let summary = &app.summary;
    render_card(
        f,
        cards[0],
        "Total Expenses",
        format_amount(summary.total_expenses),
        theme::PEACH,
        summary.month.long_label(),
    );

    let top_amount = if summary.top_category.is_some() {
        format_amount(summary.top_category_amount)
    } else {
        String::new()
    };
    render_card(
        f,
        cards[1],
        "Top Category",
        summary.top_category_label().to_string(),
        theme::ACCENT,
        top_amount,
    );

    let (budget_text, budget_color) = if app.budget_total > Decimal::ZERO {
        let used = ratio(summary.total_expenses, app.budget_total);
        let over = summary.total_expenses > app.budget_total;
        (
            format!(
                "{} of {}",
                format_amount(summary.total_expenses),
                format_amount(app.budget_total)
            ),
            theme::budget_color(used, over),
        )
    } else {
        ("No budgets".to_string(), theme::TEXT_DIM)
    };
    render_card(
        f,
        cards[2],
        "Monthly Budget",
        budget_text,
        budget_color,
        format!("{} transactions", app.transaction_count),
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
    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle, theme::dim_style())),
    ])
    .centered()
    .block(panel(title));

    f.render_widget(text, area);
}

fn render_series_chart(f: &mut Frame, area: Rect, app: &App) {
    let bars: Vec<Bar> = app
        .series
        .iter()
        .map(|point| {
            let whole = point
                .total
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
            Bar::default()
                .value(whole.to_u64().unwrap_or(0))
                .text_value(format!("${whole}"))
                .label(Line::from(point.label.clone()))
                .style(Style::default().fg(theme::ACCENT))
                .value_style(
                    Style::default()
                        .fg(theme::HEADER_BG)
                        .bg(theme::ACCENT)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let bar_width = if app.series.is_empty() {
        8
    } else {
        let inner = area.width.saturating_sub(2) / app.series.len() as u16;
        inner.saturating_sub(1).clamp(3, 12)
    };

    let chart = BarChart::default()
        .block(panel("Monthly Expenses"))
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(Style::default().fg(theme::ACCENT))
        .value_style(Style::default().fg(theme::TEXT));

    f.render_widget(chart, area);
}

fn render_category_totals(f: &mut Frame, area: Rect, app: &App) {
    let block = panel("Spending by Category");
    if app.category_totals.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No transactions yet. Add one with :add",
            theme::dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let max = app
        .category_totals
        .first()
        .map(|row| row.total)
        .unwrap_or_default();
    let name_width = 18;
    let amount_width = 12;
    let bar_width = (area.width as usize).saturating_sub(name_width + amount_width + 5);

    let lines: Vec<Line> = app
        .category_totals
        .iter()
        .take(area.height.saturating_sub(2) as usize)
        .map(|row| {
            let cells = (ratio(row.total, max) * bar_width as f64).round() as usize;
            Line::from(vec![
                Span::styled(
                    format!("{:<name_width$}", truncate(row.category.as_str(), name_width)),
                    theme::normal_style(),
                ),
                Span::styled(
                    format!("{:>amount_width$} ", format_amount(row.total)),
                    theme::expense_style(),
                ),
                Span::styled("▇".repeat(cells.max(1)), Style::default().fg(theme::ACCENT)),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_recent(f: &mut Frame, area: Rect, app: &App) {
    let block = panel("Recent Transactions");
    let recent = &app.summary.recent_transactions;
    if recent.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No transactions yet",
            theme::dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let desc_width = (area.width as usize).saturating_sub(28).max(8);
    let lines: Vec<Line> = recent
        .iter()
        .map(|txn| {
            Line::from(vec![
                Span::styled(
                    format!("{} ", txn.date.format(DATE_FORMAT)),
                    theme::dim_style(),
                ),
                Span::styled(
                    format!("{:<desc_width$}", truncate(&txn.description, desc_width)),
                    theme::normal_style(),
                ),
                Span::styled(
                    format!("{:>12}", format_amount(txn.amount)),
                    theme::expense_style(),
                ),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_insights(f: &mut Frame, area: Rect, app: &App) {
    let lines: Vec<Line> = app
        .insights
        .iter()
        .map(|insight| {
            Line::from(vec![
                Span::styled("• ", Style::default().fg(theme::YELLOW)),
                Span::styled(insight.as_str(), theme::normal_style()),
            ])
        })
        .collect();

    let text = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(panel("Insights"));
    f.render_widget(text, area);
}
