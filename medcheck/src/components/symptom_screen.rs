//! Symptom check screen: two-stage parse and diagnosis pipeline
//!
//! Stage 1 sends the symptom text off for parsing, stage 2 feeds the parsed
//! symptom into the diagnosis endpoint. The free-text and category input
//! methods both end up as plain text for stage 1.

use crossterm::event::{KeyCode, KeyModifiers};
use medcheck_core::{sanitize, Component, EventKind};
use medcheck_components::{SelectList, SelectListProps, TextInput, TextInputProps};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::spinner;
use crate::action::Action;
use crate::api::UrgencyLevel;
use crate::state::{
    AppState, InputMethod, SymptomFocus, SymptomPhase, SYMPTOM_CATEGORIES,
};

const AGE_STEP: u32 = 1;
const AGE_MAX: u32 = 120;
const AGE_DEFAULT: u32 = 30;

/// Style for an urgency level; the three levels must read differently
pub fn urgency_style(level: UrgencyLevel) -> Style {
    match level {
        UrgencyLevel::High => Style::default().fg(Color::Red).bold(),
        UrgencyLevel::Medium => Style::default().fg(Color::Yellow),
        UrgencyLevel::Low => Style::default().fg(Color::Green),
    }
}

fn urgency_label(level: UrgencyLevel) -> &'static str {
    match level {
        UrgencyLevel::High => "高",
        UrgencyLevel::Medium => "中",
        UrgencyLevel::Low => "低",
    }
}

pub struct SymptomScreen {
    input: TextInput,
    category_list: SelectList,
    suggestion_list: SelectList,
}

pub struct SymptomScreenProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

impl Default for SymptomScreen {
    fn default() -> Self {
        Self {
            input: TextInput::new(),
            category_list: SelectList::new(),
            suggestion_list: SelectList::new(),
        }
    }
}

impl SymptomScreen {
    pub fn new() -> Self {
        Self::default()
    }

    fn category_items() -> Vec<String> {
        SYMPTOM_CATEGORIES.iter().map(|c| c.to_string()).collect()
    }

    fn suggestion_items(state: &AppState) -> Vec<String> {
        state
            .symptom
            .suggestions
            .iter()
            .map(|s| {
                if s.common {
                    format!("★ {}", s.text)
                } else {
                    s.text.clone()
                }
            })
            .collect()
    }
}

impl Component<Action> for SymptomScreen {
    type Props<'a> = SymptomScreenProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }

        let symptom = &props.state.symptom;
        let EventKind::Key(key) = event else {
            return Vec::new();
        };

        // Ctrl shortcuts work in both input methods. Plain letters stay
        // available for typing in the free-text field.
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('t') => {
                    let next = match symptom.input_method {
                        InputMethod::FreeText => InputMethod::Category,
                        InputMethod::Category => InputMethod::FreeText,
                    };
                    return vec![Action::SymptomSetMethod(next)];
                }
                KeyCode::Char('s') => return vec![Action::SymptomSubmit],
                KeyCode::Char('g') => return vec![Action::SymptomCycleGender],
                KeyCode::Up => {
                    let age = match symptom.age {
                        None => AGE_DEFAULT,
                        Some(age) => age.saturating_add(AGE_STEP).min(AGE_MAX),
                    };
                    return vec![Action::SymptomSetAge(Some(age))];
                }
                KeyCode::Down => {
                    let age = match symptom.age {
                        None => AGE_DEFAULT,
                        Some(0) => 0,
                        Some(age) => age - AGE_STEP,
                    };
                    return vec![Action::SymptomSetAge(Some(age))];
                }
                _ => {}
            }
        }

        match symptom.input_method {
            InputMethod::FreeText => self
                .input
                .handle_event(
                    event,
                    TextInputProps {
                        value: &symptom.text,
                        placeholder: "例: 3日前から頭痛がひどい",
                        title: Some("症状を入力"),
                        is_focused: true,
                        on_change: Action::SymptomTextChange,
                        on_submit: |_| Action::SymptomSubmit,
                    },
                )
                .into_iter()
                .collect::<Vec<_>>(),
            InputMethod::Category => match symptom.focus {
                SymptomFocus::Categories | SymptomFocus::Text => match key.code {
                    KeyCode::Char('l') | KeyCode::Right => {
                        if symptom.suggestions.is_empty() {
                            Vec::new()
                        } else {
                            vec![Action::SymptomSetFocus(SymptomFocus::Suggestions)]
                        }
                    }
                    KeyCode::Enter => vec![Action::SymptomSubmit],
                    _ => {
                        let items = Self::category_items();
                        self.category_list
                            .handle_event(
                                event,
                                SelectListProps {
                                    items: &items,
                                    selected: symptom.category_cursor,
                                    checked: None,
                                    title: None,
                                    is_focused: true,
                                    on_select: Action::SymptomSelectCategory,
                                    on_toggle: None,
                                },
                            )
                            .into_iter()
                            .collect()
                    }
                },
                SymptomFocus::Suggestions => match key.code {
                    KeyCode::Char('h') | KeyCode::Left => {
                        vec![Action::SymptomSetFocus(SymptomFocus::Categories)]
                    }
                    KeyCode::Enter => vec![Action::SymptomSubmit],
                    _ => {
                        let items = Self::suggestion_items(props.state);
                        self.suggestion_list
                            .handle_event(
                                event,
                                SelectListProps {
                                    items: &items,
                                    selected: symptom.suggestion_cursor,
                                    checked: Some(&symptom.checked_suggestions),
                                    title: None,
                                    is_focused: true,
                                    on_select: Action::SymptomMoveSuggestion,
                                    on_toggle: Some(Action::SymptomToggleSuggestion),
                                },
                            )
                            .into_iter()
                            .collect()
                    }
                },
            },
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let rows = Layout::vertical([
            Constraint::Length(1), // method toggle
            Constraint::Length(8), // input area
            Constraint::Length(1), // patient row
            Constraint::Length(1), // validation / error / phase
            Constraint::Min(6),    // parsed symptom + diagnosis
        ])
        .split(area);

        render_method_toggle(frame, rows[0], props.state);
        self.render_input(frame, rows[1], props.state, props.is_focused);
        render_patient_row(frame, rows[2], props.state);
        render_status_line(frame, rows[3], props.state);
        render_outcome(frame, rows[4], props.state);
    }
}

impl SymptomScreen {
    fn render_input(&mut self, frame: &mut Frame, area: Rect, state: &AppState, is_focused: bool) {
        let symptom = &state.symptom;
        match symptom.input_method {
            InputMethod::FreeText => {
                self.input.render(
                    frame,
                    area,
                    TextInputProps {
                        value: &symptom.text,
                        placeholder: "例: 3日前から頭痛がひどい",
                        title: Some("症状を入力"),
                        is_focused,
                        on_change: Action::SymptomTextChange,
                        on_submit: |_| Action::SymptomSubmit,
                    },
                );
            }
            InputMethod::Category => {
                let cols =
                    Layout::horizontal([Constraint::Length(16), Constraint::Min(20)]).split(area);

                let categories = Self::category_items();
                self.category_list.render(
                    frame,
                    cols[0],
                    SelectListProps {
                        items: &categories,
                        selected: symptom.category_cursor,
                        checked: None,
                        title: Some("部位"),
                        is_focused: is_focused && symptom.focus != SymptomFocus::Suggestions,
                        on_select: Action::SymptomSelectCategory,
                        on_toggle: None,
                    },
                );

                let suggestions = Self::suggestion_items(state);
                self.suggestion_list.render(
                    frame,
                    cols[1],
                    SelectListProps {
                        items: &suggestions,
                        selected: symptom.suggestion_cursor,
                        checked: Some(&symptom.checked_suggestions),
                        title: Some("症状の候補"),
                        is_focused: is_focused && symptom.focus == SymptomFocus::Suggestions,
                        on_select: Action::SymptomMoveSuggestion,
                        on_toggle: Some(Action::SymptomToggleSuggestion),
                    },
                );
            }
        }
    }
}

fn render_method_toggle(frame: &mut Frame, area: Rect, state: &AppState) {
    let method = state.symptom.input_method;
    let tab = |label: &str, active: bool| -> Span<'static> {
        if active {
            Span::styled(
                format!(" {} ", label),
                Style::default().fg(Color::Black).bg(Color::Cyan).bold(),
            )
        } else {
            Span::styled(format!(" {} ", label), Style::default().fg(Color::DarkGray))
        }
    };
    let line = Line::from(vec![
        Span::raw(" 入力方法: "),
        tab("フリー入力", method == InputMethod::FreeText),
        Span::raw(" "),
        tab("カテゴリ選択", method == InputMethod::Category),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_patient_row(frame: &mut Frame, area: Rect, state: &AppState) {
    let symptom = &state.symptom;
    let age = match symptom.age {
        Some(age) => format!("{}歳", age),
        None => "未設定".to_string(),
    };
    let gender = match symptom.gender {
        Some(gender) => gender.label(),
        None => "未設定",
    };
    let line = Line::from(vec![
        Span::raw(" 年齢: "),
        Span::styled(age, Style::default().fg(Color::Cyan)),
        Span::raw("  性別: "),
        Span::styled(gender.to_string(), Style::default().fg(Color::Cyan)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_status_line(frame: &mut Frame, area: Rect, state: &AppState) {
    let symptom = &state.symptom;

    let line = if let Some(validation) = &symptom.validation {
        Line::styled(
            format!(" {}", validation),
            Style::default().fg(Color::Yellow).bold(),
        )
    } else if let Some(error) = &symptom.error {
        Line::styled(
            format!(" エラーが発生しました: {}", sanitize(error)),
            Style::default().fg(Color::Red),
        )
    } else {
        match symptom.phase {
            SymptomPhase::Parsing => Line::from(vec![
                Span::styled(
                    format!(" {} ", spinner(state.tick_count)),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw("症状を解析しています..."),
            ]),
            SymptomPhase::Analyzing => Line::from(vec![
                Span::styled(
                    format!(" {} ", spinner(state.tick_count)),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw("診断結果を作成しています..."),
            ]),
            SymptomPhase::Idle => Line::raw(""),
        }
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_outcome(frame: &mut Frame, area: Rect, state: &AppState) {
    let symptom = &state.symptom;
    let cols = Layout::horizontal([Constraint::Ratio(1, 3), Constraint::Ratio(2, 3)]).split(area);

    // Parsed symptom card
    let parsed_block = Block::default().borders(Borders::ALL).title("解析結果");
    match &symptom.parsed {
        Some(parsed) => {
            let mut lines = vec![
                Line::from(vec![
                    Span::raw("症状: "),
                    Span::styled(sanitize(&parsed.text).into_owned(), Style::default().bold()),
                ]),
                Line::raw(format!("カテゴリ: {}", sanitize(&parsed.category))),
            ];
            if let Some(severity) = parsed.severity {
                lines.push(Line::raw(format!("重症度: {}／5", severity)));
            }
            if let Some(duration) = &parsed.duration {
                lines.push(Line::raw(format!("期間: {}", sanitize(duration))));
            }
            if let Some(location) = &parsed.location {
                lines.push(Line::raw(format!("部位: {}", sanitize(location))));
            }
            if !parsed.keywords.is_empty() {
                let joined = parsed
                    .keywords
                    .iter()
                    .map(|k| sanitize(k).into_owned())
                    .collect::<Vec<_>>()
                    .join("、");
                lines.push(Line::styled(
                    format!("キーワード: {}", joined),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            frame.render_widget(
                Paragraph::new(lines).wrap(Wrap { trim: false }).block(parsed_block),
                cols[0],
            );
        }
        None => {
            frame.render_widget(
                Paragraph::new(Line::styled(
                    "まだ解析結果はありません",
                    Style::default().fg(Color::DarkGray),
                ))
                .block(parsed_block),
                cols[0],
            );
        }
    }

    // Diagnosis card
    let diagnosis_block = Block::default().borders(Borders::ALL).title("診断結果");
    match &symptom.diagnosis {
        Some(diagnosis) => {
            let mut lines = Vec::new();
            if !diagnosis.possible_conditions.is_empty() {
                lines.push(Line::styled(
                    "考えられる症状・疾患",
                    Style::default().bold(),
                ));
                for condition in &diagnosis.possible_conditions {
                    lines.push(Line::raw(format!("  ・{}", sanitize(condition))));
                }
            }
            if !diagnosis.recommended_specialties.is_empty() {
                lines.push(Line::styled("推奨される診療科", Style::default().bold()));
                for specialty in &diagnosis.recommended_specialties {
                    let mut spans = vec![Span::raw(format!(
                        "  ・{}",
                        sanitize(&specialty.name)
                    ))];
                    if !specialty.description.is_empty() {
                        spans.push(Span::styled(
                            format!(" ({})", sanitize(&specialty.description)),
                            Style::default().fg(Color::DarkGray),
                        ));
                    }
                    lines.push(Line::from(spans));
                }
            }
            lines.push(Line::from(vec![
                Span::raw("緊急度: "),
                Span::styled(
                    urgency_label(diagnosis.urgency_level),
                    urgency_style(diagnosis.urgency_level),
                ),
                Span::raw(format!(
                    "  信頼度: {}%",
                    (diagnosis.confidence * 100.0).round() as i64
                )),
            ]));
            lines.push(Line::raw(format!("アドバイス: {}", sanitize(&diagnosis.advice))));
            frame.render_widget(
                Paragraph::new(lines)
                    .wrap(Wrap { trim: false })
                    .block(diagnosis_block),
                cols[1],
            );
        }
        None => {
            frame.render_widget(
                Paragraph::new(Line::styled(
                    "まだ診断結果はありません",
                    Style::default().fg(Color::DarkGray),
                ))
                .block(diagnosis_block),
                cols[1],
            );
        }
    }
}
