//! News screen: health alerts, category filter, article list

use crossterm::event::KeyCode;
use medcheck_core::{sanitize, Component, EventKind};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::spinner;
use crate::action::Action;
use crate::api::AlertSeverity;
use crate::state::{AppState, NEWS_CATEGORIES};

#[derive(Default)]
pub struct NewsFeed;

pub struct NewsFeedProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

impl NewsFeed {
    pub fn new() -> Self {
        Self
    }
}

impl Component<Action> for NewsFeed {
    type Props<'a> = NewsFeedProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }

        let news = &props.state.news;
        let EventKind::Key(key) = event else {
            return None;
        };

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                let last = news.items.len().saturating_sub(1);
                (news.item_cursor < last).then(|| Action::NewsMoveItem(news.item_cursor + 1))
            }
            KeyCode::Char('k') | KeyCode::Up => {
                (news.item_cursor > 0).then(|| Action::NewsMoveItem(news.item_cursor - 1))
            }
            KeyCode::Char('h') | KeyCode::Left => (news.category_cursor > 0)
                .then(|| Action::NewsSelectCategory(news.category_cursor - 1)),
            KeyCode::Char('l') | KeyCode::Right => {
                (news.category_cursor + 1 < NEWS_CATEGORIES.len())
                    .then(|| Action::NewsSelectCategory(news.category_cursor + 1))
            }
            KeyCode::Char('m') => Some(Action::NewsLoadMore),
            KeyCode::Char('r') => Some(Action::NewsRefresh),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let news = &props.state.news;

        // Alerts take one banner line each, capped so articles keep room
        let alert_rows = (news.alerts.len() as u16).min(4);
        let rows = Layout::vertical([
            Constraint::Length(alert_rows),
            Constraint::Length(1), // category strip
            Constraint::Min(4),    // articles
        ])
        .split(area);

        render_alerts(frame, rows[0], props.state);
        render_categories(frame, rows[1], props.state);
        render_articles(frame, rows[2], props.state);
    }
}

fn severity_decoration(severity: AlertSeverity) -> (&'static str, Style) {
    match severity {
        AlertSeverity::Danger => ("!!", Style::default().fg(Color::Red).bold()),
        AlertSeverity::Warning => ("! ", Style::default().fg(Color::Yellow)),
        AlertSeverity::Info => ("i ", Style::default().fg(Color::Blue)),
    }
}

fn render_alerts(frame: &mut Frame, area: Rect, state: &AppState) {
    if area.height == 0 {
        return;
    }
    let mut lines = Vec::new();
    for alert in state.news.alerts.iter().take(area.height as usize) {
        let (icon, style) = severity_decoration(alert.severity);
        let mut spans = vec![
            Span::styled(format!(" {} ", icon), style),
            Span::styled(sanitize(&alert.title).into_owned(), style.bold()),
            Span::raw(format!(" {}", sanitize(&alert.message))),
        ];
        if let Some(area_name) = &alert.area {
            spans.push(Span::styled(
                format!(" 対象地域: {}", sanitize(area_name)),
                Style::default().fg(Color::DarkGray),
            ));
        }
        if let Some(valid) = &alert.valid_until {
            spans.push(Span::styled(
                format!(" ({}まで)", sanitize(valid)),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(Line::from(spans));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_categories(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = vec![Span::raw(" ")];
    for (i, category) in NEWS_CATEGORIES.iter().enumerate() {
        let style = if i == state.news.category_cursor {
            Style::default().fg(Color::Black).bg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {} ", category), style));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_articles(frame: &mut Frame, area: Rect, state: &AppState) {
    let news = &state.news;
    let block = Block::default().borders(Borders::ALL).title("健康ニュース");

    if news.loading && news.items.is_empty() {
        let loading = Paragraph::new(
            Line::from(vec![
                Span::styled(
                    format!("{} ", spinner(state.tick_count)),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw("読み込み中..."),
            ])
            .centered(),
        )
        .block(block);
        frame.render_widget(loading, area);
        return;
    }

    if let Some(error) = &news.error {
        let message = Paragraph::new(
            Line::styled(
                format!("エラーが発生しました: {}", sanitize(error)),
                Style::default().fg(Color::Red),
            )
            .centered(),
        )
        .block(block);
        frame.render_widget(message, area);
        return;
    }

    if news.items.is_empty() {
        let empty = Paragraph::new(
            Line::styled(
                "該当するニュースが見つかりませんでした",
                Style::default().fg(Color::DarkGray),
            )
            .centered(),
        )
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let mut lines = Vec::new();
    for (i, item) in news.items.iter().enumerate() {
        let selected = i == news.item_cursor;
        let marker = if selected { "▶ " } else { "  " };
        let title_style = if selected {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().bold()
        };

        let mut header = vec![
            Span::raw(marker),
            Span::styled(
                format!("[{}]", sanitize(&item.category)),
                Style::default().fg(Color::Green),
            ),
        ];
        match item.priority.as_deref() {
            Some("high") => header.push(Span::styled(" 重要", Style::default().fg(Color::Red).bold())),
            Some("medium") => header.push(Span::styled(" 注意", Style::default().fg(Color::Yellow))),
            _ => {}
        }
        header.push(Span::raw(" "));
        header.push(Span::styled(sanitize(&item.title).into_owned(), title_style));
        if let Some(published) = &item.published_at {
            header.push(Span::styled(
                format!(" ({})", sanitize(published)),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(Line::from(header));

        if selected {
            lines.push(Line::styled(
                format!("    {}", sanitize(&item.content)),
                Style::default().fg(Color::Gray),
            ));
            if let Some(hospital) = &item.hospital_name {
                lines.push(Line::styled(
                    format!("    情報提供: {}", sanitize(hospital)),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            if let Some(tags) = &item.tags {
                if !tags.is_empty() {
                    let joined = tags
                        .iter()
                        .map(|t| format!("#{}", sanitize(t)))
                        .collect::<Vec<_>>()
                        .join(" ");
                    lines.push(Line::styled(
                        format!("    {}", joined),
                        Style::default().fg(Color::Magenta),
                    ));
                }
            }
        }
    }

    if news.can_load_more {
        lines.push(Line::raw(""));
        let more = if news.loading {
            Line::from(vec![
                Span::styled(
                    format!("  {} ", spinner(state.tick_count)),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw("読み込み中..."),
            ])
        } else {
            Line::styled("  m: もっと読み込む", Style::default().fg(Color::Cyan))
        };
        lines.push(more);
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }).block(block), area);
}
