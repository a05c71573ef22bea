//! Per-screen keybinding hints

use medcheck_core::Component;
use ratatui::{
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::action::Action;
use crate::state::Screen;

pub struct HelpBar;

pub struct HelpBarProps {
    pub screen: Screen,
}

impl Component<Action> for HelpBar {
    type Props<'a> = HelpBarProps;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let hints: &[(&str, &str)] = match props.screen {
            Screen::Admin => &[
                ("j/k", "移動"),
                ("space", "選択"),
                ("t/H", "病院"),
                ("n/N", "ニュース"),
                ("A", "全データ"),
                ("r", "統計更新"),
                ("tab", "画面"),
                ("q", "終了"),
            ],
            Screen::News => &[
                ("j/k", "記事"),
                ("h/l", "カテゴリ"),
                ("m", "もっと読む"),
                ("r", "更新"),
                ("tab", "画面"),
                ("q", "終了"),
            ],
            Screen::Symptoms => &[
                ("^t", "入力方法"),
                ("^s", "診断"),
                ("^g", "性別"),
                ("^↑/^↓", "年齢"),
                ("tab", "画面"),
                ("^c", "終了"),
            ],
        };

        let mut spans = Vec::with_capacity(hints.len() * 2);
        for (key, label) in hints {
            spans.push(Span::styled(
                format!(" {}", key),
                Style::default().fg(Color::Cyan).bold(),
            ));
            spans.push(Span::styled(
                format!(" {} ", label),
                Style::default().fg(Color::DarkGray),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans).centered()), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medcheck_core::testing::RenderHarness;

    #[test]
    fn admin_hints() {
        let mut render = RenderHarness::new(100, 1);
        let mut bar = HelpBar;

        let output = render.render_to_string_plain(|frame| {
            bar.render(frame, frame.area(), HelpBarProps { screen: Screen::Admin });
        });

        assert!(output.contains("全データ"));
        assert!(output.contains("終了"));
    }
}
