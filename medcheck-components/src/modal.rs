//! Modal overlay helpers
//!
//! Dims everything rendered so far and paints a solid backdrop for the modal
//! area. Call after the background content has been rendered.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier},
    widgets::Widget,
    Frame,
};

/// Configuration for modal appearance
pub struct ModalStyle {
    /// Whether to dim the background behind the modal
    pub dim_background: bool,
    /// Background color for the modal area (None = keep whatever is there)
    pub bg_color: Option<Color>,
}

impl Default for ModalStyle {
    fn default() -> Self {
        Self {
            dim_background: true,
            bg_color: None,
        }
    }
}

impl ModalStyle {
    /// Create a style with a background color
    pub fn with_bg(bg_color: Color) -> Self {
        Self {
            bg_color: Some(bg_color),
            ..Default::default()
        }
    }
}

/// Render a modal overlay with dimmed background
///
/// Call this AFTER rendering background content. The background is dimmed
/// fresh each frame, so it keeps updating behind the modal.
pub fn render_modal(frame: &mut Frame, area: Rect, style: &ModalStyle) {
    if style.dim_background {
        dim_buffer(frame.buffer_mut());
    }

    if let Some(bg) = style.bg_color {
        frame.render_widget(BgFill(bg), area);
    }
}

/// Push every cell towards the background using the DIM attribute
fn dim_buffer(buffer: &mut Buffer) {
    for cell in buffer.content.iter_mut() {
        cell.modifier.insert(Modifier::DIM);
        cell.modifier.remove(Modifier::BOLD);
    }
}

/// Simple widget that fills an area with a background color
struct BgFill(Color);

impl Widget for BgFill {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for y in area.y..area.y.saturating_add(area.height) {
            for x in area.x..area.x.saturating_add(area.width) {
                buf[(x, y)].set_bg(self.0);
                buf[(x, y)].set_symbol(" ");
                buf[(x, y)].modifier = Modifier::empty();
            }
        }
    }
}

/// Calculate a centered rectangle within an area
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use medcheck_core::testing::RenderHarness;
    use ratatui::widgets::Paragraph;

    #[test]
    fn test_modal_renders_content() {
        let mut harness = RenderHarness::new(80, 24);

        let output = harness.render_to_string_plain(|frame| {
            frame.render_widget(Paragraph::new("Background content"), frame.area());

            let area = centered_rect(40, 10, frame.area());
            render_modal(frame, area, &ModalStyle::with_bg(Color::Rgb(30, 30, 40)));
            frame.render_widget(Paragraph::new("Confirm full scrape?"), area);
        });

        assert!(output.contains("Confirm full scrape?"));
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 80, 24);
        let centered = centered_rect(40, 10, area);

        assert_eq!(centered.width, 40);
        assert_eq!(centered.height, 10);
        assert_eq!(centered.x, 20);
        assert_eq!(centered.y, 7);
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 30, 10);
        let centered = centered_rect(100, 50, area);

        assert!(centered.width <= 28);
        assert!(centered.height <= 8);
    }
}
