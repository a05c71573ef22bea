//! Application state - single source of truth
//!
//! One explicit state object per screen, all hanging off `AppState`.
//! Components receive `&AppState` (or a slice of it) as props; only the
//! reducer mutates it.

use std::collections::HashSet;

use crate::api::{
    Diagnosis, HealthAlert, JobEnvelope, NewsItem, ParsedSymptom, ScrapingStatus, Suggestion,
};

/// Articles fetched per news page
pub const PAGE_SIZE: usize = 10;

/// Prefectures offered for hospital scraping
pub const PREFECTURES: &[&str] = &[
    "東京都",
    "神奈川県",
    "埼玉県",
    "千葉県",
    "茨城県",
    "栃木県",
    "群馬県",
    "大阪府",
    "京都府",
    "愛知県",
];

/// News categories; index 0 means "all" (no filter)
pub const NEWS_CATEGORIES: &[&str] = &[
    "すべて",
    "予防",
    "感染症",
    "栄養",
    "運動",
    "医療技術",
    "メンタルヘルス",
];

/// Body-area categories for suggestion lookup
pub const SYMPTOM_CATEGORIES: &[&str] =
    &["頭部", "呼吸器", "消化器", "全身", "皮膚", "目", "耳", "その他"];

/// Which screen is showing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Admin,
    News,
    Symptoms,
}

impl Screen {
    pub fn next(self) -> Self {
        match self {
            Screen::Admin => Screen::News,
            Screen::News => Screen::Symptoms,
            Screen::Symptoms => Screen::Admin,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Screen::Admin => Screen::Symptoms,
            Screen::News => Screen::Admin,
            Screen::Symptoms => Screen::News,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Screen::Admin => "管理",
            Screen::News => "ニュース",
            Screen::Symptoms => "症状チェック",
        }
    }
}

/// A scrape trigger; doubles as the in-flight job key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScrapeJob {
    Hospitals { immediate: bool },
    News { immediate: bool },
    All,
}

impl ScrapeJob {
    /// Label shown in the results log and on the button row
    pub fn label(self) -> &'static str {
        match self {
            ScrapeJob::Hospitals { .. } => "病院データスクレイピング",
            ScrapeJob::News { .. } => "健康ニュースクレイピング",
            ScrapeJob::All => "全データスクレイピング",
        }
    }

    /// Unique request key for the runtime
    pub fn request_key(self) -> &'static str {
        match self {
            ScrapeJob::Hospitals { immediate: true } => "scrape-hospitals-test",
            ScrapeJob::Hospitals { immediate: false } => "scrape-hospitals-full",
            ScrapeJob::News { immediate: true } => "scrape-news-test",
            ScrapeJob::News { immediate: false } => "scrape-news-full",
            ScrapeJob::All => "scrape-all",
        }
    }
}

/// One entry in the admin results log
#[derive(Clone, Debug, PartialEq)]
pub struct JobOutcome {
    pub job: ScrapeJob,
    pub envelope: JobEnvelope,
}

/// Admin screen: statistics, scrape controls, results log
#[derive(Clone, Debug, Default)]
pub struct AdminState {
    /// Latest statistics (None until first load)
    pub stats: Option<ScrapingStatus>,
    pub stats_error: Option<String>,
    /// Cursor into [`PREFECTURES`]
    pub pref_cursor: usize,
    /// Checked prefecture indices
    pub selected_prefs: HashSet<usize>,
    /// Jobs currently outstanding; a job's control is disabled iff present
    pub jobs_in_flight: HashSet<ScrapeJob>,
    /// Completed job outcomes, newest first
    pub results: Vec<JobOutcome>,
    /// Validation message (e.g. no prefecture selected)
    pub validation: Option<String>,
    /// Full-scrape confirmation modal open
    pub confirm_all: bool,
}

impl AdminState {
    pub fn selected_prefecture_names(&self) -> Vec<String> {
        PREFECTURES
            .iter()
            .enumerate()
            .filter(|(i, _)| self.selected_prefs.contains(i))
            .map(|(_, name)| name.to_string())
            .collect()
    }
}

/// News screen: alerts, category filter, paged article list
#[derive(Clone, Debug)]
pub struct NewsState {
    /// Cursor into [`NEWS_CATEGORIES`]; 0 selects all
    pub category_cursor: usize,
    pub items: Vec<NewsItem>,
    pub alerts: Vec<HealthAlert>,
    /// Load-more marker visible; set iff the last page was full
    pub can_load_more: bool,
    pub loading: bool,
    pub error: Option<String>,
    /// Cursor into `items` for scrolling
    pub item_cursor: usize,
}

impl Default for NewsState {
    fn default() -> Self {
        Self {
            category_cursor: 0,
            items: Vec::new(),
            alerts: Vec::new(),
            can_load_more: false,
            loading: false,
            error: None,
            item_cursor: 0,
        }
    }
}

impl NewsState {
    /// The category filter to send, if any
    pub fn category_filter(&self) -> Option<&'static str> {
        if self.category_cursor == 0 {
            None
        } else {
            NEWS_CATEGORIES.get(self.category_cursor).copied()
        }
    }
}

/// How the user is entering symptoms
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum InputMethod {
    #[default]
    FreeText,
    Category,
}

/// Patient gender for the diagnosis request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_wire(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "男性",
            Gender::Female => "女性",
        }
    }
}

/// Where the two-stage symptom pipeline currently is
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SymptomPhase {
    #[default]
    Idle,
    /// Stage 1: the symptom text is being parsed
    Parsing,
    /// Stage 2: the diagnosis is being inferred
    Analyzing,
}

impl SymptomPhase {
    /// Controls are disabled while a stage is running
    pub fn is_busy(self) -> bool {
        self != SymptomPhase::Idle
    }
}

/// Which part of the symptom screen has keyboard focus
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SymptomFocus {
    #[default]
    Text,
    Categories,
    Suggestions,
}

/// Symptom screen: input, parsed result, diagnosis
#[derive(Clone, Debug, Default)]
pub struct SymptomState {
    pub input_method: InputMethod,
    pub focus: SymptomFocus,
    /// Free (or composed) symptom text
    pub text: String,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    /// Cursor into [`SYMPTOM_CATEGORIES`]
    pub category_cursor: usize,
    pub suggestions: Vec<Suggestion>,
    pub suggestion_cursor: usize,
    pub checked_suggestions: HashSet<usize>,
    pub parsed: Option<ParsedSymptom>,
    pub diagnosis: Option<Diagnosis>,
    pub phase: SymptomPhase,
    pub validation: Option<String>,
    pub error: Option<String>,
}

impl SymptomState {
    /// Compose the symptom text from checked suggestions, mirroring the
    /// category input mode: checked items joined, or the bare category.
    pub fn composed_text(&self) -> String {
        let checked: Vec<&str> = self
            .suggestions
            .iter()
            .enumerate()
            .filter(|(i, _)| self.checked_suggestions.contains(i))
            .map(|(_, s)| s.text.as_str())
            .collect();

        if checked.is_empty() {
            let category = SYMPTOM_CATEGORIES
                .get(self.category_cursor)
                .copied()
                .unwrap_or("");
            format!("{}の症状", category)
        } else {
            format!("{}の症状があります", checked.join("、"))
        }
    }
}

/// Everything the UI needs to render
#[derive(Clone, Debug)]
pub struct AppState {
    pub screen: Screen,
    pub admin: AdminState,
    pub news: NewsState,
    pub symptom: SymptomState,
    /// Animation frame counter for spinners
    pub tick_count: u32,
    pub terminal_size: (u16, u16),
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::default(),
            admin: AdminState::default(),
            news: NewsState::default(),
            symptom: SymptomState::default(),
            tick_count: 0,
            terminal_size: (80, 24),
        }
    }

    /// True while any request that animates a spinner is outstanding
    pub fn is_loading(&self) -> bool {
        self.news.loading
            || self.symptom.phase.is_busy()
            || !self.admin.jobs_in_flight.is_empty()
    }
}
