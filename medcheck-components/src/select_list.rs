//! Scrollable selection list component with optional multi-select marks

use std::collections::HashSet;

use crossterm::event::KeyCode;
use medcheck_core::{Component, EventKind};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Props for SelectList component
pub struct SelectListProps<'a, A> {
    /// Items to display
    pub items: &'a [String],
    /// Index of the cursor row
    pub selected: usize,
    /// Checked indices for multi-select lists (None = single-select)
    pub checked: Option<&'a HashSet<usize>>,
    /// Optional border title
    pub title: Option<&'a str>,
    /// Whether this component has focus
    pub is_focused: bool,
    /// Callback when the cursor moves or Enter confirms the cursor row
    pub on_select: fn(usize) -> A,
    /// Callback when Space toggles the cursor row (multi-select only)
    pub on_toggle: Option<fn(usize) -> A>,
}

/// A scrollable list with keyboard navigation
///
/// Handles j/k/up/down for navigation, enter for selection, and space for
/// toggling when `checked` marks are in use. Renders a `[x]` prefix per row
/// in multi-select mode.
#[derive(Default)]
pub struct SelectList {
    /// Scroll offset for viewport
    scroll_offset: usize,
}

impl SelectList {
    /// Create a new SelectList
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure the cursor row is visible within the viewport
    fn ensure_visible(&mut self, selected: usize, viewport_height: usize) {
        if viewport_height == 0 {
            return;
        }

        if selected < self.scroll_offset {
            self.scroll_offset = selected;
        } else if selected >= self.scroll_offset + viewport_height {
            self.scroll_offset = selected.saturating_sub(viewport_height - 1);
        }
    }
}

impl<A> Component<A> for SelectList {
    type Props<'a> = SelectListProps<'a, A>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = A> {
        if !props.is_focused || props.items.is_empty() {
            return None;
        }

        let len = props.items.len();

        match event {
            EventKind::Key(key) => match key.code {
                // Navigate down
                KeyCode::Char('j') | KeyCode::Down => {
                    let new_idx = (props.selected + 1).min(len.saturating_sub(1));
                    (new_idx != props.selected).then(|| (props.on_select)(new_idx))
                }
                // Navigate up
                KeyCode::Char('k') | KeyCode::Up => {
                    let new_idx = props.selected.saturating_sub(1);
                    (new_idx != props.selected).then(|| (props.on_select)(new_idx))
                }
                // Jump to top
                KeyCode::Char('g') | KeyCode::Home => {
                    (props.selected != 0).then(|| (props.on_select)(0))
                }
                // Jump to bottom
                KeyCode::Char('G') | KeyCode::End => {
                    let last = len.saturating_sub(1);
                    (props.selected != last).then(|| (props.on_select)(last))
                }
                // Toggle the cursor row in multi-select mode
                KeyCode::Char(' ') => props.on_toggle.map(|f| f(props.selected)),
                // Confirm the cursor row
                KeyCode::Enter => Some((props.on_select)(props.selected)),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let viewport_height = area.height.saturating_sub(2) as usize;
        self.ensure_visible(props.selected, viewport_height);

        let items: Vec<ListItem> = props
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let style = if i == props.selected {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::White)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                let line = match props.checked {
                    Some(checked) if checked.contains(&i) => {
                        Line::raw(format!("[x] {}", item))
                    }
                    Some(_) => Line::raw(format!("[ ] {}", item)),
                    None => Line::raw(item.as_str()),
                };
                ListItem::new(line).style(style)
            })
            .collect();

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(if props.is_focused {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            });
        if let Some(title) = props.title {
            block = block.title(title);
        }

        let list = List::new(items).block(block).highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

        let mut state = ListState::default().with_selected(Some(props.selected));
        *state.offset_mut() = self.scroll_offset;

        frame.render_stateful_widget(list, area, &mut state);
    }
}
