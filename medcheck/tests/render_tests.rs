//! Render snapshot tests for the three screens
//!
//! State is driven through the reducer where it matters, then rendered
//! into a test buffer and checked as plain text.

use medcheck::action::Action;
use medcheck::api::{
    AlertSeverity, AlertStats, ApiError, DatasetStats, HealthAlert, NewsItem, ScrapingStatus,
};
use medcheck::components::{
    AdminPanel, AdminPanelProps, Component, HelpBar, HelpBarProps, NewsFeed, NewsFeedProps,
    SymptomScreen, SymptomScreenProps, TabBar, TabBarProps,
};
use medcheck::reducer::reducer;
use medcheck::state::{AppState, Screen, PAGE_SIZE};
use medcheck_core::testing::RenderHarness;

fn article(n: usize) -> NewsItem {
    NewsItem {
        id: Some(format!("news-{}", n)),
        title: format!("記事{}", n),
        content: "本文".into(),
        category: "予防".into(),
        priority: None,
        published_at: None,
        hospital_name: None,
        tags: None,
    }
}

#[test]
fn test_render_admin_stats_after_load() {
    let mut render = RenderHarness::new(110, 28);
    let mut panel = AdminPanel::new();

    let mut state = AppState::new();
    reducer(
        &mut state,
        Action::StatsDidLoad(ScrapingStatus {
            hospitals: DatasetStats {
                total: 245,
                last_updated: Some("2026-08-29T09:30:00".into()),
            },
            news: DatasetStats {
                total: 87,
                last_updated: Some("2026-08-29T09:31:00".into()),
            },
            alerts: AlertStats { total: 2 },
        }),
    );

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

    assert!(output.contains("245"), "hospital total should show");
    assert!(output.contains("登録病院数"));
    assert!(output.contains("ニュース記事数"));
    assert!(output.contains("アクティブアラート数"));
    assert!(output.contains("リアルタイム"));
}

#[test]
fn test_render_admin_validation_after_blocked_scrape() {
    let mut render = RenderHarness::new(110, 28);
    let mut panel = AdminPanel::new();

    let mut state = AppState::new();
    // No prefecture selected, the reducer blocks and sets a message
    reducer(
        &mut state,
        Action::ScrapeStart(medcheck::state::ScrapeJob::Hospitals { immediate: true }),
    );

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
fn test_render_news_load_more_after_full_page() {
    let mut render = RenderHarness::new(90, 30);
    let mut feed = NewsFeed::new();

    let mut state = AppState::new();
    reducer(
        &mut state,
        Action::NewsDidLoad {
            items: (0..PAGE_SIZE).map(article).collect(),
            append: false,
        },
    );

    let output = render.render_to_string_plain(|frame| {
        feed.render(
            frame,
            frame.area(),
            NewsFeedProps {
                state: &state,
                is_focused: true,
            },
        );
    });

    assert!(output.contains("記事0"));
    assert!(output.contains("m: もっと読み込む"), "full page shows the marker");
}

#[test]
fn test_render_news_error_state() {
    let mut render = RenderHarness::new(90, 24);
    let mut feed = NewsFeed::new();

    let mut state = AppState::new();
    reducer(&mut state, Action::NewsFetch { append: false });
    reducer(
        &mut state,
        Action::NewsDidError(ApiError::Transport("connection refused".into())),
    );

    let output = render.render_to_string_plain(|frame| {
        feed.render(
            frame,
            frame.area(),
            NewsFeedProps {
                state: &state,
                is_focused: true,
            },
        );
    });

    assert!(output.contains("エラーが発生しました"));
}

#[test]
fn test_render_alert_banner() {
    let mut render = RenderHarness::new(100, 24);
    let mut feed = NewsFeed::new();

    let mut state = AppState::new();
    reducer(
        &mut state,
        Action::AlertsDidLoad(vec![HealthAlert {
            title: "インフルエンザ流行警報".into(),
            message: "手洗いうがいを徹底してください".into(),
            severity: AlertSeverity::Warning,
            area: Some("関東地方".into()),
            valid_until: Some("2026-09-15".into()),
        }]),
    );

    let output = render.render_to_string_plain(|frame| {
        feed.render(
            frame,
            frame.area(),
            NewsFeedProps {
                state: &state,
                is_focused: true,
            },
        );
    });

    assert!(output.contains("インフルエンザ流行警報"));
    assert!(output.contains("対象地域: 関東地方"));
    assert!(output.contains("2026-09-15まで"));
}

#[test]
fn test_render_symptom_validation_after_empty_submit() {
    let mut render = RenderHarness::new(100, 30);
    let mut screen = SymptomScreen::new();

    let mut state = AppState::new();
    reducer(&mut state, Action::SymptomSubmit);

    let output = render.render_to_string_plain(|frame| {
        screen.render(
            frame,
            frame.area(),
            SymptomScreenProps {
                state: &state,
                is_focused: true,
            },
        );
    });

    assert!(output.contains("症状を入力してください"));
}

#[test]
fn test_render_symptom_parsing_phase() {
    let mut render = RenderHarness::new(100, 30);
    let mut screen = SymptomScreen::new();

    let mut state = AppState::new();
    reducer(&mut state, Action::SymptomTextChange("頭が痛い".into()));
    reducer(&mut state, Action::SymptomSubmit);

    let output = render.render_to_string_plain(|frame| {
        screen.render(
            frame,
            frame.area(),
            SymptomScreenProps {
                state: &state,
                is_focused: true,
            },
        );
    });

    assert!(output.contains("症状を解析しています"));
}

#[test]
fn test_render_tab_bar_marks_active_screen() {
    let mut render = RenderHarness::new(80, 3);
    let mut tab_bar = TabBar;

    let output = render.render_to_string_plain(|frame| {
        tab_bar.render(
            frame,
            frame.area(),
            TabBarProps {
                active: Screen::News,
            },
        );
    });

    assert!(output.contains("管理"));
    assert!(output.contains("ニュース"));
    assert!(output.contains("症状チェック"));
}

#[test]
fn test_render_help_bar_per_screen() {
    let mut render = RenderHarness::new(120, 1);
    let mut help_bar = HelpBar;

    let admin = render.render_to_string_plain(|frame| {
        help_bar.render(
            frame,
            frame.area(),
            HelpBarProps {
                screen: Screen::Admin,
            },
        );
    });
    assert!(admin.contains("統計更新"));

    let news = render.render_to_string_plain(|frame| {
        help_bar.render(
            frame,
            frame.area(),
            HelpBarProps {
                screen: Screen::News,
            },
        );
    });
    assert!(news.contains("もっと読む"));

    let symptoms = render.render_to_string_plain(|frame| {
        help_bar.render(
            frame,
            frame.area(),
            HelpBarProps {
                screen: Screen::Symptoms,
            },
        );
    });
    assert!(symptoms.contains("診断"));
}
