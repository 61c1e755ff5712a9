use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, progress_bar, ratio, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.budget_rows.is_empty() {
        render_empty(f, area);
        return;
    }

    let items: Vec<ListItem> = app
        .budget_rows
        .iter()
        .enumerate()
        .skip(app.budget_scroll)
        .take(area.height.saturating_sub(2) as usize)
        .map(|(i, row)| {
            let used = ratio(row.spent, row.budget);
            let color = theme::budget_color(used, row.is_over());

            let style = if i == app.budget_index {
                theme::selected_style()
            } else if i % 2 == 0 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            let detail = if row.is_over() {
                format!(" {} over", format_amount(row.overspent))
            } else {
                format!(" {} left", format_amount(row.remaining))
            };

            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<18}", truncate(row.category.as_str(), 17)),
                    style,
                ),
                Span::styled(
                    format!(
                        "{:>11} / {:<11} ",
                        format_amount(row.spent),
                        format_amount(row.budget)
                    ),
                    Style::default().fg(color),
                ),
                Span::styled(progress_bar(used, 20), Style::default().fg(color)),
                Span::styled(
                    detail,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                format!(
                    " Budgets for {} | total {} ",
                    app.month().long_label(),
                    format_amount(app.budget_total)
                ),
                theme::title_style(),
            )),
    );
    f.render_widget(list, area);
}

fn render_empty(f: &mut Frame, area: Rect) {
    let msg = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("No budgets set", theme::dim_style())),
        Line::from(""),
        Line::from(Span::styled(
            "Use :budget <category> <amount> to set a monthly spending limit",
            theme::dim_style(),
        )),
    ])
    .centered()
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(" Budgets ", theme::title_style())),
    );
    f.render_widget(msg, area);
}
