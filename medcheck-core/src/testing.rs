//! Test utilities for medcheck crates
//!
//! - [`key`]: build a `KeyEvent` from a string (e.g. `key("ctrl+p")`)
//! - [`TestHarness`]: action channel + state for handler tests
//! - [`RenderHarness`]: render into a `TestBackend` and inspect the text
//! - [`ActionAssertions`]: fluent assertions over emitted action vecs
//! - `assert_emitted!` / `assert_not_emitted!` / `count_emitted!` macros

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Position;
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;

use crate::action::Action;

fn key_with(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

/// Parse a key string such as `"q"`, `"enter"`, `"ctrl+p"`, `"shift+tab"`.
///
/// # Panics
///
/// Panics on an unrecognized key string, making it suitable for tests.
pub fn key(s: &str) -> KeyEvent {
    let mut modifiers = KeyModifiers::empty();
    let mut code = None;

    for part in s.split('+') {
        match part.to_ascii_lowercase().as_str() {
            "ctrl" => modifiers |= KeyModifiers::CONTROL,
            "alt" => modifiers |= KeyModifiers::ALT,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            "enter" => code = Some(KeyCode::Enter),
            "esc" => code = Some(KeyCode::Esc),
            "tab" => code = Some(KeyCode::Tab),
            "backspace" => code = Some(KeyCode::Backspace),
            "delete" => code = Some(KeyCode::Delete),
            "space" => code = Some(KeyCode::Char(' ')),
            "up" => code = Some(KeyCode::Up),
            "down" => code = Some(KeyCode::Down),
            "left" => code = Some(KeyCode::Left),
            "right" => code = Some(KeyCode::Right),
            "home" => code = Some(KeyCode::Home),
            "end" => code = Some(KeyCode::End),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    // Single characters keep their original case, as crossterm
                    // reports shifted letters ("A" -> Char('A')).
                    (Some(_), None) => {
                        code = part.chars().next().map(KeyCode::Char);
                    }
                    (Some('f'), Some(_)) => {
                        if let Ok(n) = other[1..].parse::<u8>() {
                            code = Some(KeyCode::F(n));
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    // shift+tab arrives as BackTab from crossterm
    if code == Some(KeyCode::Tab) && modifiers.contains(KeyModifiers::SHIFT) {
        code = Some(KeyCode::BackTab);
        modifiers.remove(KeyModifiers::SHIFT);
    }

    let code = code.unwrap_or_else(|| panic!("Invalid key string: {:?}", s));
    key_with(code, modifiers)
}

/// A `KeyEvent` for a character with no modifiers.
pub fn char_key(c: char) -> KeyEvent {
    key_with(KeyCode::Char(c), KeyModifiers::empty())
}

/// A `KeyEvent` for a character with Ctrl held.
pub fn ctrl_key(c: char) -> KeyEvent {
    key_with(KeyCode::Char(c), KeyModifiers::CONTROL)
}

/// Generic test harness: state plus an action channel for capturing what
/// handlers emit.
pub struct TestHarness<S, A: Action> {
    /// The application state under test
    pub state: S,
    tx: mpsc::UnboundedSender<A>,
    rx: mpsc::UnboundedReceiver<A>,
}

impl<S, A: Action> TestHarness<S, A> {
    /// Create a new test harness with the given initial state.
    pub fn new(state: S) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { state, tx, rx }
    }

    /// Get a clone of the action sender for passing to handlers.
    pub fn sender(&self) -> mpsc::UnboundedSender<A> {
        self.tx.clone()
    }

    /// Emit an action (simulates what a handler would do).
    pub fn emit(&self, action: A) {
        let _ = self.tx.send(action);
    }

    /// Drain all emitted actions from the channel.
    pub fn drain_emitted(&mut self) -> Vec<A> {
        let mut actions = Vec::new();
        while let Ok(action) = self.rx.try_recv() {
            actions.push(action);
        }
        actions
    }

    /// Check if any actions were emitted.
    pub fn has_emitted(&mut self) -> bool {
        !self.drain_emitted().is_empty()
    }
}

impl<S: Default, A: Action> Default for TestHarness<S, A> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

/// Render components into an in-memory terminal for snapshot-style asserts.
pub struct RenderHarness {
    terminal: Terminal<TestBackend>,
}

impl RenderHarness {
    /// Create a harness with the given terminal dimensions.
    pub fn new(width: u16, height: u16) -> Self {
        let backend = TestBackend::new(width, height);
        let terminal = Terminal::new(backend).expect("test terminal");
        Self { terminal }
    }

    /// Run a render closure and return the resulting buffer as plain text
    /// (styles dropped, rows joined with newlines).
    pub fn render_to_string_plain<F>(&mut self, render: F) -> String
    where
        F: FnOnce(&mut Frame),
    {
        // Read the completed frame rather than the backend buffer: the
        // backend is updated via `Buffer::diff`, which skips the cells
        // behind wide (e.g. CJK) glyphs and leaves stale content there
        // when the harness is reused across frames.
        let completed = self.terminal.draw(render).expect("draw");
        buffer_to_string_plain(completed.buffer)
    }

    /// Terminal cursor position after the last render, for components that
    /// place the cursor with [`Frame::set_cursor_position`].
    pub fn cursor_position(&mut self) -> Position {
        self.terminal.get_cursor_position().expect("cursor position")
    }
}

/// Flatten a buffer into plain text, one line per terminal row.
///
/// Cells hidden behind a multi-width symbol (e.g. CJK characters) are
/// skipped, matching how ratatui's `TestBackend` renders its view.
pub fn buffer_to_string_plain(buffer: &Buffer) -> String {
    use unicode_width::UnicodeWidthStr;

    let area = buffer.area;
    let mut out = String::with_capacity((area.width as usize + 1) * area.height as usize);
    for y in area.top()..area.bottom() {
        let mut skip: usize = 0;
        for x in area.left()..area.right() {
            if let Some(cell) = buffer.cell((x, y)) {
                if skip == 0 {
                    out.push_str(cell.symbol());
                }
                skip = skip.max(cell.symbol().width()).saturating_sub(1);
            }
        }
        out.push('\n');
    }
    out
}

/// Fluent assertions over the `Vec<A>` a component's `handle_event` returns.
pub trait ActionAssertions<A> {
    /// Assert no actions were emitted.
    fn assert_empty(&self);
    /// Assert exactly `n` actions were emitted.
    fn assert_count(&self, n: usize);
    /// Assert the first emitted action equals `expected`.
    fn assert_first(&self, expected: A);
}

impl<A: PartialEq + std::fmt::Debug> ActionAssertions<A> for Vec<A> {
    fn assert_empty(&self) {
        assert!(self.is_empty(), "expected no actions, got: {:?}", self);
    }

    fn assert_count(&self, n: usize) {
        assert_eq!(
            self.len(),
            n,
            "expected {} actions, got {}: {:?}",
            n,
            self.len(),
            self
        );
    }

    fn assert_first(&self, expected: A) {
        match self.first() {
            Some(first) => assert_eq!(first, &expected),
            None => panic!("expected first action {:?}, got none", expected),
        }
    }
}

/// Assert that an action matching a pattern was emitted.
#[macro_export]
macro_rules! assert_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            $actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected action matching `{}` to be emitted, but got: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// Assert that no action matching a pattern was emitted.
#[macro_export]
macro_rules! assert_not_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            !$actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected action matching `{}` NOT to be emitted, but it was: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// Count actions matching a pattern.
#[macro_export]
macro_rules! count_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        $actions.iter().filter(|a| matches!(a, $pattern $(if $guard)?)).count()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_simple() {
        let k = key("q");
        assert_eq!(k.code, KeyCode::Char('q'));
        assert_eq!(k.modifiers, KeyModifiers::empty());
    }

    #[test]
    fn key_with_ctrl() {
        let k = key("ctrl+p");
        assert_eq!(k.code, KeyCode::Char('p'));
        assert!(k.modifiers.contains(KeyModifiers::CONTROL));
    }

    #[test]
    fn key_special() {
        assert_eq!(key("esc").code, KeyCode::Esc);
        assert_eq!(key("enter").code, KeyCode::Enter);
        assert_eq!(key("space").code, KeyCode::Char(' '));
        assert_eq!(key("shift+tab").code, KeyCode::BackTab);
        assert_eq!(key("f5").code, KeyCode::F(5));
    }

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        Foo,
        Bar(i32),
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            match self {
                TestAction::Foo => "Foo",
                TestAction::Bar(_) => "Bar",
            }
        }
    }

    #[test]
    fn harness_emit_and_drain() {
        let mut harness = TestHarness::<(), TestAction>::new(());

        harness.emit(TestAction::Foo);
        harness.emit(TestAction::Bar(42));

        let actions = harness.drain_emitted();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0], TestAction::Foo);

        assert!(harness.drain_emitted().is_empty());
    }

    #[test]
    fn assert_macros() {
        let actions = vec![TestAction::Foo, TestAction::Bar(42)];

        assert_emitted!(actions, TestAction::Foo);
        assert_emitted!(actions, TestAction::Bar(_));
        assert_not_emitted!(actions, TestAction::Bar(99));
        assert_eq!(count_emitted!(actions, TestAction::Bar(_)), 1);
    }

    #[test]
    fn action_assertions() {
        let actions = vec![TestAction::Foo];
        actions.assert_count(1);
        actions.assert_first(TestAction::Foo);

        let none: Vec<TestAction> = vec![];
        none.assert_empty();
    }

    #[test]
    fn render_harness_plain_text() {
        let mut render = RenderHarness::new(10, 2);
        let output = render.render_to_string_plain(|frame| {
            frame.render_widget(ratatui::widgets::Paragraph::new("hello"), frame.area());
        });
        assert!(output.contains("hello"));
    }
}
