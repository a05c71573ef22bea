//! Single-line text input component

use crossterm::event::{KeyCode, KeyModifiers};
use medcheck_core::{Component, EventKind};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Props for TextInput component
pub struct TextInputProps<'a, A> {
    /// Current input value
    pub value: &'a str,
    /// Placeholder text when empty
    pub placeholder: &'a str,
    /// Optional border title
    pub title: Option<&'a str>,
    /// Whether this component has focus
    pub is_focused: bool,
    /// Callback when value changes
    pub on_change: fn(String) -> A,
    /// Callback when user submits (Enter)
    pub on_submit: fn(String) -> A,
}

/// A single-line text input with cursor
///
/// Handles typing, backspace, delete, and cursor movement.
/// Emits on_change for each edit and on_submit for Enter.
#[derive(Default)]
pub struct TextInput {
    /// Cursor position (byte index)
    cursor: usize,
}

impl TextInput {
    /// Create a new TextInput
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamp cursor to valid range for the given value
    ///
    /// The value can change between events (cleared or recomposed by the
    /// reducer), so the saved byte index may land inside a multi-byte
    /// character. Snap back to the previous char boundary.
    fn clamp_cursor(&mut self, value: &str) {
        self.cursor = self.cursor.min(value.len());
        while self.cursor > 0 && !value.is_char_boundary(self.cursor) {
            self.cursor -= 1;
        }
    }

    /// Move cursor left by one character
    fn move_cursor_left(&mut self, value: &str) {
        if self.cursor > 0 {
            let mut new_pos = self.cursor - 1;
            while new_pos > 0 && !value.is_char_boundary(new_pos) {
                new_pos -= 1;
            }
            self.cursor = new_pos;
        }
    }

    /// Move cursor right by one character
    fn move_cursor_right(&mut self, value: &str) {
        if self.cursor < value.len() {
            let mut new_pos = self.cursor + 1;
            while new_pos < value.len() && !value.is_char_boundary(new_pos) {
                new_pos += 1;
            }
            self.cursor = new_pos;
        }
    }

    /// Insert character at cursor position
    fn insert_char(&mut self, value: &str, c: char) -> String {
        let mut new_value = String::with_capacity(value.len() + c.len_utf8());
        new_value.push_str(&value[..self.cursor]);
        new_value.push(c);
        new_value.push_str(&value[self.cursor..]);
        self.cursor += c.len_utf8();
        new_value
    }

    /// Delete character before cursor (backspace)
    fn delete_char_before(&mut self, value: &str) -> Option<String> {
        if self.cursor == 0 {
            return None;
        }

        let before_cursor = &value[..self.cursor];
        let char_start = before_cursor
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0);

        let mut new_value = String::with_capacity(value.len());
        new_value.push_str(&value[..char_start]);
        new_value.push_str(&value[self.cursor..]);
        self.cursor = char_start;
        Some(new_value)
    }

    /// Delete character at cursor (delete key)
    fn delete_char_at(&self, value: &str) -> Option<String> {
        if self.cursor >= value.len() {
            return None;
        }

        let mut new_value = String::with_capacity(value.len());
        new_value.push_str(&value[..self.cursor]);

        let after_cursor = &value[self.cursor..];
        if let Some((_, c)) = after_cursor.char_indices().next() {
            new_value.push_str(&value[self.cursor + c.len_utf8()..]);
        }

        Some(new_value)
    }

    /// Delete the word before the cursor (Ctrl+W)
    fn delete_word_before(&mut self, value: &str) -> Option<String> {
        if self.cursor == 0 {
            return None;
        }

        let before = &value[..self.cursor];
        let trimmed = before.trim_end();
        // Whitespace can be multi-byte (U+3000 in Japanese text), so step
        // past it by its encoded length, not one byte.
        let word_start = trimmed
            .char_indices()
            .rfind(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);

        let mut new_value = String::with_capacity(value.len());
        new_value.push_str(&value[..word_start]);
        new_value.push_str(&value[self.cursor..]);
        self.cursor = word_start;
        Some(new_value)
    }
}

impl<A> Component<A> for TextInput {
    type Props<'a> = TextInputProps<'a, A>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = A> {
        if !props.is_focused {
            return None;
        }

        // Ensure cursor is valid for current value
        self.clamp_cursor(props.value);

        match event {
            EventKind::Key(key) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    return match key.code {
                        // Ctrl+A: move to start
                        KeyCode::Char('a') => {
                            self.cursor = 0;
                            None
                        }
                        // Ctrl+E: move to end
                        KeyCode::Char('e') => {
                            self.cursor = props.value.len();
                            None
                        }
                        // Ctrl+U: clear line
                        KeyCode::Char('u') => {
                            self.cursor = 0;
                            Some((props.on_change)(String::new()))
                        }
                        // Ctrl+W: delete word back
                        KeyCode::Char('w') => self
                            .delete_word_before(props.value)
                            .map(|v| (props.on_change)(v)),
                        _ => None,
                    };
                }

                match key.code {
                    KeyCode::Char(c) => {
                        let new_value = self.insert_char(props.value, c);
                        Some((props.on_change)(new_value))
                    }
                    KeyCode::Backspace => self
                        .delete_char_before(props.value)
                        .map(|v| (props.on_change)(v)),
                    KeyCode::Delete => self
                        .delete_char_at(props.value)
                        .map(|v| (props.on_change)(v)),
                    KeyCode::Left => {
                        self.move_cursor_left(props.value);
                        None
                    }
                    KeyCode::Right => {
                        self.move_cursor_right(props.value);
                        None
                    }
                    KeyCode::Home => {
                        self.cursor = 0;
                        None
                    }
                    KeyCode::End => {
                        self.cursor = props.value.len();
                        None
                    }
                    KeyCode::Enter => Some((props.on_submit)(props.value.to_string())),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        self.clamp_cursor(props.value);

        let display_text = if props.value.is_empty() {
            props.placeholder
        } else {
            props.value
        };

        let style = if props.value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

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

        frame.render_widget(Paragraph::new(display_text).style(style).block(block), area);

        // Show cursor if focused, clipped to the inner area. Cursor is a
        // byte index, so convert to a display column (CJK chars are two
        // columns wide).
        if props.is_focused {
            let column = props.value[..self.cursor].width() as u16;
            let cursor_x = area.x + 1 + column;
            let cursor_y = area.y + 1;
            if cursor_x < area.x + area.width.saturating_sub(1) {
                frame.set_cursor_position((cursor_x, cursor_y));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medcheck_core::testing::{key, RenderHarness};
    use ratatui::layout::Position;

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Change(String),
        Submit(String),
    }

    fn props(value: &str, focused: bool) -> TextInputProps<'_, TestAction> {
        TextInputProps {
            value,
            placeholder: "",
            title: None,
            is_focused: focused,
            on_change: TestAction::Change,
            on_submit: TestAction::Submit,
        }
    }

    #[test]
    fn test_typing() {
        let mut input = TextInput::new();

        let actions: Vec<_> = input
            .handle_event(&EventKind::Key(key("a")), props("", true))
            .into_iter()
            .collect();

        assert_eq!(actions, vec![TestAction::Change("a".into())]);
    }

    #[test]
    fn test_typing_appends() {
        let mut input = TextInput::new();
        input.cursor = 5; // At end of "fever"

        let actions: Vec<_> = input
            .handle_event(&EventKind::Key(key("!")), props("fever", true))
            .into_iter()
            .collect();

        assert_eq!(actions, vec![TestAction::Change("fever!".into())]);
    }

    #[test]
    fn test_backspace() {
        let mut input = TextInput::new();
        input.cursor = 5;

        let actions: Vec<_> = input
            .handle_event(&EventKind::Key(key("backspace")), props("fever", true))
            .into_iter()
            .collect();

        assert_eq!(actions, vec![TestAction::Change("feve".into())]);
        assert_eq!(input.cursor, 4);
    }

    #[test]
    fn test_backspace_at_start() {
        let mut input = TextInput::new();
        input.cursor = 0;

        let actions: Vec<_> = input
            .handle_event(&EventKind::Key(key("backspace")), props("fever", true))
            .into_iter()
            .collect();

        assert!(actions.is_empty());
    }

    #[test]
    fn test_ctrl_w_deletes_word() {
        let mut input = TextInput::new();
        input.cursor = 10; // end of "sore throa"

        let actions: Vec<_> = input
            .handle_event(&EventKind::Key(key("ctrl+w")), props("sore throa", true))
            .into_iter()
            .collect();

        assert_eq!(actions, vec![TestAction::Change("sore ".into())]);
        assert_eq!(input.cursor, 5);
    }

    #[test]
    fn test_typing_after_value_swapped_to_multibyte() {
        let mut input = TextInput::new();

        // Type "ab" so the saved cursor sits at byte 2
        let _: Vec<_> = input
            .handle_event(&EventKind::Key(key("a")), props("", true))
            .into_iter()
            .collect();
        let _: Vec<_> = input
            .handle_event(&EventKind::Key(key("b")), props("a", true))
            .into_iter()
            .collect();
        assert_eq!(input.cursor, 2);

        // The value was replaced behind the component's back and byte 2
        // now falls inside '頭'. Typing must not slice mid-character.
        let actions: Vec<_> = input
            .handle_event(&EventKind::Key(key("x")), props("頭部の症状", true))
            .into_iter()
            .collect();

        assert_eq!(actions, vec![TestAction::Change("x頭部の症状".into())]);
        assert_eq!(input.cursor, 1);
    }

    #[test]
    fn test_ctrl_w_after_ideographic_space() {
        let mut input = TextInput::new();
        let value = "頭痛　あ"; // U+3000 between the words
        input.cursor = value.len();

        let actions: Vec<_> = input
            .handle_event(&EventKind::Key(key("ctrl+w")), props(value, true))
            .into_iter()
            .collect();

        assert_eq!(actions, vec![TestAction::Change("頭痛　".into())]);
        assert_eq!(input.cursor, "頭痛　".len());
    }

    #[test]
    fn test_submit() {
        let mut input = TextInput::new();

        let actions: Vec<_> = input
            .handle_event(&EventKind::Key(key("enter")), props("headache", true))
            .into_iter()
            .collect();

        assert_eq!(actions, vec![TestAction::Submit("headache".into())]);
    }

    #[test]
    fn test_unfocused_ignores() {
        let mut input = TextInput::new();

        let actions: Vec<_> = input
            .handle_event(&EventKind::Key(key("a")), props("", false))
            .into_iter()
            .collect();

        assert!(actions.is_empty());
    }

    #[test]
    fn test_render_with_value() {
        let mut render = RenderHarness::new(30, 3);
        let mut input = TextInput::new();

        let output = render.render_to_string_plain(|frame| {
            let props = TextInputProps {
                value: "headache",
                placeholder: "Describe symptoms...",
                title: Some("Symptoms"),
                is_focused: true,
                on_change: |_| (),
                on_submit: |_| (),
            };
            input.render(frame, frame.area(), props);
        });

        assert!(output.contains("headache"));
        assert!(output.contains("Symptoms"));
    }

    #[test]
    fn test_render_placeholder() {
        let mut render = RenderHarness::new(30, 3);
        let mut input = TextInput::new();

        let output = render.render_to_string_plain(|frame| {
            let props = TextInputProps {
                value: "",
                placeholder: "Describe symptoms...",
                title: None,
                is_focused: true,
                on_change: |_| (),
                on_submit: |_| (),
            };
            input.render(frame, frame.area(), props);
        });

        assert!(output.contains("Describe symptoms..."));
    }

    #[test]
    fn test_cursor_column_uses_display_width() {
        let mut render = RenderHarness::new(30, 3);
        let mut input = TextInput::new();
        input.cursor = "頭痛".len(); // byte 6, after two double-width chars

        render.render_to_string_plain(|frame| {
            input.render(frame, frame.area(), props("頭痛が続く", true));
        });

        // Two CJK characters take four columns, plus one for the border.
        assert_eq!(render.cursor_position(), Position::new(5, 1));
    }
}
