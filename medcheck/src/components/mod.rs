pub mod admin_panel;
pub mod help_bar;
pub mod news_feed;
pub mod symptom_screen;
pub mod tab_bar;

// Re-export core Component trait
pub use medcheck_core::Component;

pub use admin_panel::{AdminPanel, AdminPanelProps};
pub use help_bar::{HelpBar, HelpBarProps};
pub use news_feed::{NewsFeed, NewsFeedProps};
pub use symptom_screen::{urgency_style, SymptomScreen, SymptomScreenProps};
pub use tab_bar::{TabBar, TabBarProps};

/// Spinner frames for in-progress markers
pub const SPINNERS: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Pick a spinner frame from the tick counter
pub fn spinner(tick_count: u32) -> &'static str {
    SPINNERS[(tick_count as usize / 2) % SPINNERS.len()]
}
