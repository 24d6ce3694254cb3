pub mod components;
pub mod keymap;

mod terminal;
mod theme;

use chrono::{Local, NaiveDate};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use engine::stats;

use crate::app::{AppState, FormField, Mode};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let theme = Theme::default();
    let today = Local::now().date_naive();
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // info bar
            Constraint::Length(5), // monthly summary
            Constraint::Min(0),    // list + weekly charts
            Constraint::Length(1), // mascot
            Constraint::Length(1), // key hints
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    render_summary(frame, layout[1], state, today, &theme);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(layout[2]);

    render_expense_list(frame, columns[0], state, &theme);
    render_weekly(frame, columns[1], state, today, &theme);

    render_mascot(frame, layout[3], state, &theme);
    render_bottom_bar(frame, layout[4], state, &theme);

    if state.mode == Mode::Add {
        render_form(frame, area, state, &theme);
    }
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let month = if state.month_filter == stats::ALL {
        "所有月份".to_string()
    } else {
        stats::format_month_label(&state.month_filter)
    };
    let category = if state.category_filter == stats::ALL {
        "所有分類".to_string()
    } else {
        state.category_filter.clone()
    };

    let mut parts = vec![
        Span::styled("Server", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}  ", state.base_url)),
        Span::styled("月份", Style::default().fg(theme.dim)),
        Span::raw(format!(": {month}  ")),
        Span::styled("分類", Style::default().fg(theme.dim)),
        Span::raw(format!(": {category}  ")),
    ];
    if let Some(status) = &state.status {
        parts.push(Span::styled(
            status.clone(),
            Style::default().fg(theme.error),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

fn render_summary(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState,
    today: NaiveDate,
    theme: &Theme,
) {
    let month = if state.month_filter == stats::ALL {
        None
    } else {
        Some(state.month_filter.as_str())
    };
    let summary = stats::monthly_summary(&state.expenses, month, today);

    let block = Block::default()
        .title(" 本月合計 ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.panel));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let label = if summary.by_category.is_empty() {
        "目前沒有當月資料".to_string()
    } else {
        stats::format_month_label(&summary.month)
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(label, Style::default().fg(theme.dim)),
        Span::raw("  "),
        Span::styled(
            stats::format_amount(summary.total),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
    ])];

    if summary.by_category.is_empty() {
        lines.push(Line::from(Span::styled(
            "各分類合計會顯示在這裡。",
            Style::default().fg(theme.dim),
        )));
    } else {
        let mut chips: Vec<Span<'_>> = Vec::new();
        for (category, amount) in &summary.by_category {
            if !chips.is_empty() {
                chips.push(Span::raw("  "));
            }
            chips.push(Span::styled(
                format!("{category}：{}", stats::format_amount(*amount)),
                Style::default().fg(theme.text),
            ));
        }
        lines.push(Line::from(chips));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_expense_list(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let block = Block::default()
        .title(" 支出紀錄 ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.panel));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let visible = state.visible();
    if visible.is_empty() {
        frame.render_widget(
            Paragraph::new("目前沒有資料，先新增一筆支出吧！")
                .style(Style::default().fg(theme.dim)),
            inner,
        );
        return;
    }

    let items: Vec<ListItem<'_>> = visible
        .iter()
        .map(|expense| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<10}", expense.date),
                    Style::default().fg(theme.dim),
                ),
                Span::styled(
                    format!(" {:<14}", expense.category),
                    Style::default().fg(theme.accent),
                ),
                Span::raw(expense.title.clone()),
                Span::raw("  "),
                Span::styled(
                    stats::format_amount(expense.amount),
                    Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .highlight_style(Style::default().bg(theme.panel).add_modifier(Modifier::BOLD))
        .highlight_symbol("› ");
    let mut list_state = ListState::default();
    list_state.select(Some(state.selected));
    frame.render_stateful_widget(list, inner, &mut list_state);
}

fn render_weekly(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState,
    today: NaiveDate,
    theme: &Theme,
) {
    let buckets = stats::weekly_buckets(&state.expenses, today);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let data: Vec<(&str, u64)> = buckets
        .labels
        .iter()
        .zip(buckets.daily.iter())
        .map(|(label, amount)| (label.as_str(), u64::try_from(*amount).unwrap_or(0)))
        .collect();
    components::charts::render_bar_chart(frame, rows[0], " 本週每日消費 ", &data, theme);

    let block = Block::default()
        .title(" 本週分類 ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.panel));
    let inner = block.inner(rows[1]);
    frame.render_widget(block, rows[1]);

    if buckets.by_category.is_empty() {
        frame.render_widget(
            Paragraph::new("本週還沒有支出。").style(Style::default().fg(theme.dim)),
            inner,
        );
        return;
    }

    let max = buckets
        .by_category
        .iter()
        .map(|(_, amount)| *amount)
        .max()
        .unwrap_or(0);
    let lines: Vec<Line<'_>> = buckets
        .by_category
        .iter()
        .map(|(category, amount)| {
            Line::from(vec![
                Span::styled(format!("{category:<12}"), Style::default().fg(theme.accent)),
                Span::styled(
                    components::charts::ascii_bar(
                        u64::try_from(*amount).unwrap_or(0),
                        u64::try_from(max).unwrap_or(0),
                        12,
                    ),
                    Style::default().fg(theme.accent),
                ),
                Span::raw(" "),
                Span::styled(
                    stats::format_amount(*amount),
                    Style::default().fg(theme.text),
                ),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_mascot(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let Some(message) = &state.mascot else {
        return;
    };
    frame.render_widget(
        Paragraph::new(message.as_str()).style(Style::default().fg(theme.text)),
        area,
    );
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let accent = Style::default().fg(theme.accent);
    let parts: Vec<Span<'_>> = match state.mode {
        Mode::Browse => vec![
            Span::styled("a", accent),
            Span::raw(" 新增  "),
            Span::styled("d", accent),
            Span::raw(" 刪除  "),
            Span::styled("m", accent),
            Span::raw(" 月份  "),
            Span::styled("c", accent),
            Span::raw(" 分類  "),
            Span::styled("r", accent),
            Span::raw(" 重新整理  "),
            Span::styled("j/k", accent),
            Span::raw(" 選擇  "),
            Span::styled("q", accent),
            Span::raw(" 離開"),
        ],
        Mode::Add => vec![
            Span::styled("Tab", accent),
            Span::raw(" 下一欄  "),
            Span::styled("Enter", accent),
            Span::raw(" 儲存  "),
            Span::styled("Esc", accent),
            Span::raw(" 取消"),
        ],
        Mode::ConfirmDelete => vec![
            Span::styled("確定要刪除這筆支出嗎？", Style::default().fg(theme.error)),
            Span::raw("  "),
            Span::styled("y", accent),
            Span::raw(" 確認  "),
            Span::styled("n", accent),
            Span::raw(" 取消"),
        ],
    };

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

fn render_form(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let popup = centered_rect(46, 9, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(" 新增支出 ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let fields = [
        (FormField::Title, &state.form.title),
        (FormField::Amount, &state.form.amount),
        (FormField::Date, &state.form.date),
        (FormField::Category, &state.form.category),
    ];

    let mut lines: Vec<Line<'_>> = fields
        .iter()
        .map(|(field, value)| {
            let focused = *field == state.form.focus;
            let marker = if focused { "▌" } else { " " };
            let label_style = if focused {
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.dim)
            };
            Line::from(vec![
                Span::styled(format!("{} {}: ", marker, field.label()), label_style),
                Span::styled((*value).clone(), Style::default().fg(theme.text)),
            ])
        })
        .collect();

    if let Some(message) = &state.form.message {
        lines.push(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(theme.error),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
