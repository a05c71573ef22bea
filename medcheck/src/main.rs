//! medcheck - terminal client for the symptom-check backend
//!
//! 1. Keyboard event -> active screen component -> Actions
//! 2. Actions dispatched to the EffectStore
//! 3. Reducer updates state and returns effects
//! 4. Effects become keyed requests against the backend API
//! 5. Completions come back as actions; changed state re-renders
//!
//! # Usage
//!
//! ```sh
//! # Default backend (http://localhost:8000)
//! medcheck
//!
//! # Custom backend and a log file
//! medcheck --api-base http://medcheck.example:8000 --log-file medcheck.log
//! ```

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    Frame, Terminal,
};

use medcheck::action::Action;
use medcheck::api::ApiClient;
use medcheck::components::{
    AdminPanel, AdminPanelProps, Component, HelpBar, HelpBarProps, NewsFeed, NewsFeedProps,
    SymptomScreen, SymptomScreenProps, TabBar, TabBarProps,
};
use medcheck::effect::Effect;
use medcheck::reducer::reducer;
use medcheck::state::{AppState, ScrapeJob, Screen};
use medcheck_core::{
    EffectContext, EffectStoreWithMiddleware, EventKind, EventOutcome, LoggingMiddleware, Runtime,
};

/// Spinner animation period
const TICK_MS: u64 = 200;

/// Terminal client for the symptom-check and hospital-finder backend
#[derive(Parser, Debug)]
#[command(name = "medcheck")]
#[command(about = "TUI for hospital scraping admin, health news, and symptom checks")]
struct Args {
    /// Backend API base URL
    #[arg(long, env = "MEDCHECK_API_BASE", default_value = "http://localhost:8000")]
    api_base: String,

    /// Statistics poll interval in seconds
    #[arg(long, short, default_value = "30")]
    refresh_interval: u64,

    /// Append tracing output to this file (the terminal itself is the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        medcheck::logging::init(path)?;
    }

    let client = ApiClient::new(args.api_base.clone());
    tracing::info!(api_base = %args.api_base, "starting medcheck");

    // ===== Terminal setup =====
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, client, args.refresh_interval).await;

    // ===== Cleanup =====
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

struct MedcheckUi {
    tab_bar: TabBar,
    help_bar: HelpBar,
    admin: AdminPanel,
    news: NewsFeed,
    symptom: SymptomScreen,
}

impl MedcheckUi {
    fn new() -> Self {
        Self {
            tab_bar: TabBar,
            help_bar: HelpBar,
            admin: AdminPanel::new(),
            news: NewsFeed::new(),
            symptom: SymptomScreen::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let rows = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(area);

        self.tab_bar
            .render(frame, rows[0], TabBarProps { active: state.screen });

        match state.screen {
            Screen::Admin => self.admin.render(
                frame,
                rows[1],
                AdminPanelProps {
                    state,
                    is_focused: true,
                },
            ),
            Screen::News => self.news.render(
                frame,
                rows[1],
                NewsFeedProps {
                    state,
                    is_focused: true,
                },
            ),
            Screen::Symptoms => self.symptom.render(
                frame,
                rows[1],
                SymptomScreenProps {
                    state,
                    is_focused: true,
                },
            ),
        }

        self.help_bar
            .render(frame, rows[2], HelpBarProps { screen: state.screen });
    }

    fn map_event(&mut self, event: &EventKind, state: &AppState) -> EventOutcome<Action> {
        if let EventKind::Resize(width, height) = event {
            return EventOutcome::action(Action::TerminalResize(*width, *height)).with_render();
        }

        if let EventKind::Key(key) = event {
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return EventOutcome::action(Action::Quit);
            }
            match key.code {
                KeyCode::Tab => return EventOutcome::action(Action::TabNext),
                KeyCode::BackTab => return EventOutcome::action(Action::TabPrev),
                // 'q' quits except where free text needs the letter
                KeyCode::Char('q')
                    if state.screen != Screen::Symptoms && !state.admin.confirm_all =>
                {
                    return EventOutcome::action(Action::Quit);
                }
                _ => {}
            }
        }

        match state.screen {
            Screen::Admin => EventOutcome::from_actions(self.admin.handle_event(
                event,
                AdminPanelProps {
                    state,
                    is_focused: true,
                },
            )),
            Screen::News => EventOutcome::from_actions(self.news.handle_event(
                event,
                NewsFeedProps {
                    state,
                    is_focused: true,
                },
            )),
            Screen::Symptoms => EventOutcome::from_actions(self.symptom.handle_event(
                event,
                SymptomScreenProps {
                    state,
                    is_focused: true,
                },
            )),
        }
    }
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    client: ApiClient,
    refresh_interval: u64,
) -> io::Result<()> {
    let store =
        EffectStoreWithMiddleware::new(AppState::new(), reducer, LoggingMiddleware::new());
    let mut runtime = Runtime::from_store(store);

    // Spinner animation timer
    runtime
        .schedules()
        .every("tick", Duration::from_millis(TICK_MS), || Action::Tick);

    // Statistics poll
    runtime.schedules().every(
        "stats-poll",
        Duration::from_secs(refresh_interval),
        || Action::StatsFetch,
    );

    // Initial data load
    runtime.enqueue(Action::StatsFetch);
    runtime.enqueue(Action::AlertsFetch);
    runtime.enqueue(Action::NewsFetch { append: false });

    let ui = RefCell::new(MedcheckUi::new());

    runtime
        .run(
            terminal,
            |frame, area, state| {
                ui.borrow_mut().render(frame, area, state);
            },
            |event, state| ui.borrow_mut().map_event(event, state),
            |action| matches!(action, Action::Quit),
            |effect, ctx| handle_effect(effect, ctx, &client),
        )
        .await
}

/// Turn effects into keyed requests. Requests with the same key abort
/// their in-flight predecessor, so stale completions never land.
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, client: &ApiClient) {
    match effect {
        Effect::FetchStats => {
            let client = client.clone();
            ctx.requests().spawn("stats", async move {
                match client.scraping_status().await {
                    Ok(stats) => Action::StatsDidLoad(stats),
                    Err(e) => Action::StatsDidError(e),
                }
            });
        }
        Effect::RunScrape { job, prefectures } => {
            let client = client.clone();
            ctx.requests().spawn(job.request_key(), async move {
                let result = match job {
                    ScrapeJob::Hospitals { immediate } => {
                        client.scrape_hospitals(prefectures, immediate).await
                    }
                    ScrapeJob::News { immediate } => client.scrape_news(immediate).await,
                    ScrapeJob::All => client.scrape_all().await,
                };
                Action::ScrapeDidFinish { job, result }
            });
        }
        Effect::FetchAlerts => {
            let client = client.clone();
            ctx.requests().spawn("alerts", async move {
                match client.health_alerts().await {
                    Ok(alerts) => Action::AlertsDidLoad(alerts),
                    Err(e) => Action::AlertsDidError(e),
                }
            });
        }
        Effect::FetchNews {
            category,
            limit,
            append,
        } => {
            let client = client.clone();
            ctx.requests().spawn("news", async move {
                match client.health_news(category, limit).await {
                    Ok(items) => Action::NewsDidLoad { items, append },
                    Err(e) => Action::NewsDidError(e),
                }
            });
        }
        Effect::FetchSuggestions { category } => {
            let client = client.clone();
            // Debounced: moving through categories only fetches for the
            // row the cursor settles on
            ctx.requests()
                .debounce("suggestions", Duration::from_millis(250), async move {
                    match client.symptom_suggestions(category).await {
                        Ok(suggestions) => Action::SuggestionsDidLoad(suggestions),
                        Err(e) => Action::SuggestionsDidError(e),
                    }
                });
        }
        Effect::ParseSymptom { text } => {
            let client = client.clone();
            ctx.requests().spawn("symptom-parse", async move {
                match client.submit_symptom(text).await {
                    Ok(parsed) => Action::SymptomDidParse(parsed),
                    Err(e) => Action::SymptomDidError(e),
                }
            });
        }
        Effect::Analyze(request) => {
            let client = client.clone();
            ctx.requests().spawn("diagnosis", async move {
                match client.analyze(request).await {
                    Ok(diagnosis) => Action::DiagnosisDidLoad(diagnosis),
                    Err(e) => Action::DiagnosisDidError(e),
                }
            });
        }
    }
}
