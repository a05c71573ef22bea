//! Screen tab bar

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

pub struct TabBar;

pub struct TabBarProps {
    pub active: Screen,
}

impl Component<Action> for TabBar {
    type Props<'a> = TabBarProps;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let mut spans = vec![Span::styled(
            " medcheck ",
            Style::default().fg(Color::Cyan).bold(),
        )];
        for screen in [Screen::Admin, Screen::News, Screen::Symptoms] {
            let style = if screen == props.active {
                Style::default().fg(Color::Black).bg(Color::Cyan).bold()
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled(format!(" {} ", screen.title()), style));
            spans.push(Span::raw(" "));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medcheck_core::testing::RenderHarness;

    #[test]
    fn shows_all_screen_titles() {
        let mut render = RenderHarness::new(60, 1);
        let mut bar = TabBar;

        let output = render.render_to_string_plain(|frame| {
            bar.render(frame, frame.area(), TabBarProps { active: Screen::News });
        });

        assert!(output.contains("管理"));
        assert!(output.contains("ニュース"));
        assert!(output.contains("症状チェック"));
    }
}
