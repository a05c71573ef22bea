//! Admin screen: statistics cards, scrape controls, results log

use crossterm::event::KeyCode;
use medcheck_core::{sanitize, Component, EventKind};
use medcheck_components::{centered_rect, render_modal, ModalStyle, SelectList, SelectListProps};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::spinner;
use crate::action::Action;
use crate::api::JobStatus;
use crate::state::{AppState, ScrapeJob, PREFECTURES};

pub struct AdminPanel {
    pref_list: SelectList,
}

pub struct AdminPanelProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

impl Default for AdminPanel {
    fn default() -> Self {
        Self {
            pref_list: SelectList::new(),
        }
    }
}

impl AdminPanel {
    pub fn new() -> Self {
        Self::default()
    }

    fn prefecture_items() -> Vec<String> {
        PREFECTURES.iter().map(|p| p.to_string()).collect()
    }
}

impl Component<Action> for AdminPanel {
    type Props<'a> = AdminPanelProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }

        let EventKind::Key(key) = event else {
            return Vec::new();
        };

        // Confirmation modal swallows everything else
        if props.state.admin.confirm_all {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Enter => vec![Action::ScrapeStart(ScrapeJob::All)],
                KeyCode::Char('n') | KeyCode::Esc => vec![Action::ScrapeAllCancel],
                _ => Vec::new(),
            };
        }

        match key.code {
            KeyCode::Char('t') => {
                vec![Action::ScrapeStart(ScrapeJob::Hospitals { immediate: true })]
            }
            KeyCode::Char('H') => {
                vec![Action::ScrapeStart(ScrapeJob::Hospitals { immediate: false })]
            }
            KeyCode::Char('n') => vec![Action::ScrapeStart(ScrapeJob::News { immediate: true })],
            KeyCode::Char('N') => vec![Action::ScrapeStart(ScrapeJob::News { immediate: false })],
            KeyCode::Char('A') => vec![Action::ScrapeAllRequest],
            KeyCode::Char('r') => vec![Action::StatsFetch],
            _ => {
                let items = Self::prefecture_items();
                let list_props = SelectListProps {
                    items: &items,
                    selected: props.state.admin.pref_cursor,
                    checked: Some(&props.state.admin.selected_prefs),
                    title: None,
                    is_focused: true,
                    on_select: Action::AdminMovePref,
                    on_toggle: Some(Action::AdminTogglePref),
                };
                self.pref_list
                    .handle_event(event, list_props)
                    .into_iter()
                    .collect()
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let admin = &props.state.admin;

        let rows = Layout::vertical([
            Constraint::Length(5), // statistics cards
            Constraint::Min(8),    // prefecture list + controls
            Constraint::Length(8), // results log
        ])
        .split(area);

        render_stats(frame, rows[0], props.state);

        let middle = Layout::horizontal([Constraint::Length(24), Constraint::Min(20)])
            .split(rows[1]);

        let items = Self::prefecture_items();
        self.pref_list.render(
            frame,
            middle[0],
            SelectListProps {
                items: &items,
                selected: admin.pref_cursor,
                checked: Some(&admin.selected_prefs),
                title: Some("都道府県"),
                is_focused: props.is_focused && !admin.confirm_all,
                on_select: Action::AdminMovePref,
                on_toggle: Some(Action::AdminTogglePref),
            },
        );

        render_controls(frame, middle[1], props.state);
        render_results(frame, rows[2], props.state);

        if admin.confirm_all {
            let modal_area = centered_rect(50, 7, area);
            render_modal(frame, modal_area, &ModalStyle::with_bg(Color::Rgb(30, 30, 40)));
            let dialog = Paragraph::new(vec![
                Line::raw(""),
                Line::raw("全データのスクレイピングを実行しますか？").centered(),
                Line::raw("この処理には時間がかかります。").centered(),
                Line::raw(""),
                Line::from(vec![
                    Span::styled("y", Style::default().fg(Color::Green).bold()),
                    Span::raw(" 実行   "),
                    Span::styled("n", Style::default().fg(Color::Red).bold()),
                    Span::raw(" キャンセル"),
                ])
                .centered(),
            ])
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow))
                    .title("確認"),
            );
            frame.render_widget(dialog, modal_area);
        }
    }
}

fn render_stats(frame: &mut Frame, area: Rect, state: &AppState) {
    let admin = &state.admin;
    let cards = Layout::horizontal([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .split(area);

    let (hospitals, hospitals_updated, news, news_updated, alerts) = match &admin.stats {
        Some(stats) => (
            stats.hospitals.total.to_string(),
            stats.hospitals.last_updated.clone(),
            stats.news.total.to_string(),
            stats.news.last_updated.clone(),
            stats.alerts.total.to_string(),
        ),
        None => ("-".to_string(), None, "-".to_string(), None, "-".to_string()),
    };

    let updated_line = |updated: Option<String>| match updated {
        Some(updated) => format!("最終更新: {}", sanitize(&updated)),
        None => "未更新".to_string(),
    };

    render_stat_card(
        frame,
        cards[0],
        "登録病院数",
        &hospitals,
        &updated_line(hospitals_updated),
        Color::Blue,
    );
    render_stat_card(
        frame,
        cards[1],
        "ニュース記事数",
        &news,
        &updated_line(news_updated),
        Color::Green,
    );
    render_stat_card(
        frame,
        cards[2],
        "アクティブアラート数",
        &alerts,
        "リアルタイム",
        Color::Red,
    );

    if let Some(error) = &admin.stats_error {
        let line = Line::styled(
            format!(" 統計取得エラー: {}", sanitize(error)),
            Style::default().fg(Color::Red),
        );
        // Overlay on the bottom edge of the cards row
        let error_area = Rect {
            y: area.y + area.height.saturating_sub(1),
            height: 1,
            ..area
        };
        frame.render_widget(Paragraph::new(line), error_area);
    }
}

fn render_stat_card(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    total: &str,
    detail: &str,
    color: Color,
) {
    let card = Paragraph::new(vec![
        Line::styled(total.to_string(), Style::default().fg(color).bold()).centered(),
        Line::raw(label.to_string()).centered(),
        Line::styled(detail.to_string(), Style::default().fg(Color::DarkGray)).centered(),
    ])
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(card, area);
}

fn render_controls(frame: &mut Frame, area: Rect, state: &AppState) {
    let admin = &state.admin;

    let control_line = |key: &str, label: &str, job: ScrapeJob| -> Line<'static> {
        if admin.jobs_in_flight.contains(&job) {
            let running = match job {
                ScrapeJob::Hospitals { immediate: true } | ScrapeJob::News { immediate: true } => {
                    "スクレイピング中..."
                }
                _ => "バックグラウンド実行中...",
            };
            Line::from(vec![
                Span::styled(
                    format!(" {} ", spinner(state.tick_count)),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(running.to_string(), Style::default().fg(Color::DarkGray)),
            ])
        } else {
            Line::from(vec![
                Span::styled(format!(" {} ", key), Style::default().fg(Color::Cyan).bold()),
                Span::raw(label.to_string()),
            ])
        }
    };

    let mut lines = vec![
        control_line(
            "t",
            "テストスクレイピング（少量）",
            ScrapeJob::Hospitals { immediate: true },
        ),
        control_line(
            "H",
            "本格スクレイピング（バックグラウンド）",
            ScrapeJob::Hospitals { immediate: false },
        ),
        control_line("n", "ニューステストスクレイピング", ScrapeJob::News { immediate: true }),
        control_line(
            "N",
            "ニュース本格スクレイピング（バックグラウンド）",
            ScrapeJob::News { immediate: false },
        ),
        control_line("A", "全データスクレイピング実行", ScrapeJob::All),
    ];

    if let Some(validation) = &admin.validation {
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            format!(" {}", validation),
            Style::default().fg(Color::Yellow).bold(),
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title("スクレイピング管理");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_results(frame: &mut Frame, area: Rect, state: &AppState) {
    let admin = &state.admin;
    let block = Block::default()
        .borders(Borders::ALL)
        .title("実行結果")
        .title_alignment(Alignment::Left);

    if admin.results.is_empty() {
        let empty = Paragraph::new(
            Line::styled("まだ実行結果はありません", Style::default().fg(Color::DarkGray))
                .centered(),
        )
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let mut lines = Vec::new();
    for outcome in &admin.results {
        let (icon, style) = match outcome.envelope.status {
            JobStatus::Completed => ("✔", Style::default().fg(Color::Green)),
            JobStatus::Started => ("…", Style::default().fg(Color::Blue)),
            _ => ("✘", Style::default().fg(Color::Red)),
        };
        let timestamp = outcome
            .envelope
            .timestamp
            .as_deref()
            .map(|t| format!(" [{}]", sanitize(t)))
            .unwrap_or_default();
        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", icon), style),
            Span::styled(outcome.job.label().to_string(), style.bold()),
            Span::raw(format!(": {}{}", sanitize(&outcome.envelope.message), timestamp)),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AlertStats, DatasetStats, JobEnvelope, ScrapingStatus};
    use crate::state::JobOutcome;
    use medcheck_core::assert_emitted;
    use medcheck_core::testing::{key, RenderHarness};

    fn stats() -> ScrapingStatus {
        ScrapingStatus {
            hospitals: DatasetStats {
                total: 120,
                last_updated: Some("2026-08-01T10:00:00".into()),
            },
            news: DatasetStats {
                total: 58,
                last_updated: None,
            },
            alerts: AlertStats { total: 3 },
        }
    }

    #[test]
    fn test_scrape_keys() {
        let mut panel = AdminPanel::new();
        let state = AppState::new();

        let actions: Vec<_> = panel
            .handle_event(
                &EventKind::Key(key("t")),
                AdminPanelProps {
                    state: &state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        assert_eq!(
            actions,
            vec![Action::ScrapeStart(ScrapeJob::Hospitals { immediate: true })]
        );

        let actions: Vec<_> = panel
            .handle_event(
                &EventKind::Key(key("A")),
                AdminPanelProps {
                    state: &state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        assert_emitted!(actions, Action::ScrapeAllRequest);
    }

    #[test]
    fn test_confirm_modal_keys() {
        let mut panel = AdminPanel::new();
        let mut state = AppState::new();
        state.admin.confirm_all = true;

        let actions: Vec<_> = panel
            .handle_event(
                &EventKind::Key(key("y")),
                AdminPanelProps {
                    state: &state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        assert_eq!(actions, vec![Action::ScrapeStart(ScrapeJob::All)]);

        let actions: Vec<_> = panel
            .handle_event(
                &EventKind::Key(key("esc")),
                AdminPanelProps {
                    state: &state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        assert_eq!(actions, vec![Action::ScrapeAllCancel]);

        // Scrape keys are inert while the modal is open
        let actions: Vec<_> = panel
            .handle_event(
                &EventKind::Key(key("t")),
                AdminPanelProps {
                    state: &state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        assert!(actions.is_empty());
    }

    #[test]
    fn test_prefecture_toggle() {
        let mut panel = AdminPanel::new();
        let state = AppState::new();

        let actions: Vec<_> = panel
            .handle_event(
                &EventKind::Key(key("space")),
                AdminPanelProps {
                    state: &state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        assert_eq!(actions, vec![Action::AdminTogglePref(0)]);
    }

    #[test]
    fn test_render_stats_and_placeholder() {
        let mut render = RenderHarness::new(100, 24);
        let mut panel = AdminPanel::new();

        let mut state = AppState::new();
        state.admin.stats = Some(stats());

        let output = render.render_to_string_plain(|frame| {
            panel.render(
                frame,
                frame.area(),
                AdminPanelProps {
                    state: &state,
                    is_focused: true,
                },
            );
        });

        assert!(output.contains("120"));
        assert!(output.contains("登録病院数"));
        assert!(output.contains("まだ実行結果はありません"));
    }

    #[test]
    fn test_render_validation_message() {
        let mut render = RenderHarness::new(100, 24);
        let mut panel = AdminPanel::new();

        let mut state = AppState::new();
        state.admin.validation = Some("都道府県を選択してください".into());

        let output = render.render_to_string_plain(|frame| {
            panel.render(
                frame,
                frame.area(),
                AdminPanelProps {
                    state: &state,
                    is_focused: true,
                },
            );
        });

        assert!(output.contains("都道府県を選択してください"));
    }

    #[test]
    fn test_render_results_newest_first_order_is_preserved() {
        let mut render = RenderHarness::new(100, 26);
        let mut panel = AdminPanel::new();

        let mut state = AppState::new();
        state.admin.results = vec![
            JobOutcome {
                job: ScrapeJob::All,
                envelope: JobEnvelope {
                    status: JobStatus::Started,
                    message: "バックグラウンドで開始しました".into(),
                    data: None,
                    timestamp: None,
                },
            },
            JobOutcome {
                job: ScrapeJob::News { immediate: true },
                envelope: JobEnvelope {
                    status: JobStatus::Completed,
                    message: "5件取得しました".into(),
                    data: None,
                    timestamp: None,
                },
            },
        ];

        let output = render.render_to_string_plain(|frame| {
            panel.render(
                frame,
                frame.area(),
                AdminPanelProps {
                    state: &state,
                    is_focused: true,
                },
            );
        });

        let all_pos = output.find("全データスクレイピング").unwrap();
        let news_pos = output.find("健康ニュースクレイピング").unwrap();
        assert!(all_pos < news_pos);
    }

    #[test]
    fn test_render_confirm_modal() {
        let mut render = RenderHarness::new(100, 24);
        let mut panel = AdminPanel::new();

        let mut state = AppState::new();
        state.admin.confirm_all = true;

        let output = render.render_to_string_plain(|frame| {
            panel.render(
                frame,
                frame.area(),
                AdminPanelProps {
                    state: &state,
                    is_focused: true,
                },
            );
        });

        assert!(output.contains("全データのスクレイピングを実行しますか？"));
    }
}
