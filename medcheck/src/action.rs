//! Actions: user intents and async results
//!
//! Naming convention: `XFetch`/`XSubmit` intents trigger effects, `XDidLoad`
//! and `XDidError` carry the async outcome back. The `Did*` suffix marks
//! results.

use medcheck_core::Action as ActionTrait;

use crate::api::{
    ApiError, Diagnosis, HealthAlert, JobEnvelope, NewsItem, ParsedSymptom, ScrapingStatus,
    Suggestion,
};
use crate::state::{InputMethod, ScrapeJob, SymptomFocus};

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    // ===== Admin: statistics =====
    /// Intent: load (or refresh) the scraping statistics
    StatsFetch,
    StatsDidLoad(ScrapingStatus),
    StatsDidError(ApiError),

    // ===== Admin: prefecture selection and scrape triggers =====
    AdminMovePref(usize),
    AdminTogglePref(usize),
    /// Intent: trigger a scrape; the reducer validates first
    ScrapeStart(ScrapeJob),
    /// Full scrape asks for confirmation before running
    ScrapeAllRequest,
    ScrapeAllCancel,
    /// Result: the scrape endpoint answered (or the connection failed)
    ScrapeDidFinish {
        job: ScrapeJob,
        result: Result<JobEnvelope, ApiError>,
    },

    // ===== News =====
    /// Intent: fetch the news list; append=true keeps existing items
    NewsFetch {
        append: bool,
    },
    NewsDidLoad {
        items: Vec<NewsItem>,
        append: bool,
    },
    NewsDidError(ApiError),
    AlertsFetch,
    AlertsDidLoad(Vec<HealthAlert>),
    AlertsDidError(ApiError),
    /// Move the category cursor and reload from the first page
    NewsSelectCategory(usize),
    NewsMoveItem(usize),
    NewsLoadMore,
    NewsRefresh,

    // ===== Symptom check =====
    SymptomSetMethod(InputMethod),
    SymptomSetFocus(SymptomFocus),
    SymptomTextChange(String),
    SymptomSetAge(Option<u32>),
    SymptomCycleGender,
    /// Move the category cursor; fetches suggestions for the new category
    SymptomSelectCategory(usize),
    SuggestionsDidLoad(Vec<Suggestion>),
    SuggestionsDidError(ApiError),
    SymptomMoveSuggestion(usize),
    SymptomToggleSuggestion(usize),
    /// Intent: submit the symptom text (stage 1 of the pipeline)
    SymptomSubmit,
    /// Stage 1 result; success chains into stage 2 automatically
    SymptomDidParse(ParsedSymptom),
    SymptomDidError(ApiError),
    /// Stage 2 result
    DiagnosisDidLoad(Diagnosis),
    DiagnosisDidError(ApiError),

    // ===== Global =====
    TabNext,
    TabPrev,
    Tick,
    TerminalResize(u16, u16),
    Quit,
}

impl ActionTrait for Action {
    fn name(&self) -> &'static str {
        match self {
            Action::StatsFetch => "StatsFetch",
            Action::StatsDidLoad(_) => "StatsDidLoad",
            Action::StatsDidError(_) => "StatsDidError",
            Action::AdminMovePref(_) => "AdminMovePref",
            Action::AdminTogglePref(_) => "AdminTogglePref",
            Action::ScrapeStart(_) => "ScrapeStart",
            Action::ScrapeAllRequest => "ScrapeAllRequest",
            Action::ScrapeAllCancel => "ScrapeAllCancel",
            Action::ScrapeDidFinish { .. } => "ScrapeDidFinish",
            Action::NewsFetch { .. } => "NewsFetch",
            Action::NewsDidLoad { .. } => "NewsDidLoad",
            Action::NewsDidError(_) => "NewsDidError",
            Action::AlertsFetch => "AlertsFetch",
            Action::AlertsDidLoad(_) => "AlertsDidLoad",
            Action::AlertsDidError(_) => "AlertsDidError",
            Action::NewsSelectCategory(_) => "NewsSelectCategory",
            Action::NewsMoveItem(_) => "NewsMoveItem",
            Action::NewsLoadMore => "NewsLoadMore",
            Action::NewsRefresh => "NewsRefresh",
            Action::SymptomSetMethod(_) => "SymptomSetMethod",
            Action::SymptomSetFocus(_) => "SymptomSetFocus",
            Action::SymptomTextChange(_) => "SymptomTextChange",
            Action::SymptomSetAge(_) => "SymptomSetAge",
            Action::SymptomCycleGender => "SymptomCycleGender",
            Action::SymptomSelectCategory(_) => "SymptomSelectCategory",
            Action::SuggestionsDidLoad(_) => "SuggestionsDidLoad",
            Action::SuggestionsDidError(_) => "SuggestionsDidError",
            Action::SymptomMoveSuggestion(_) => "SymptomMoveSuggestion",
            Action::SymptomToggleSuggestion(_) => "SymptomToggleSuggestion",
            Action::SymptomSubmit => "SymptomSubmit",
            Action::SymptomDidParse(_) => "SymptomDidParse",
            Action::SymptomDidError(_) => "SymptomDidError",
            Action::DiagnosisDidLoad(_) => "DiagnosisDidLoad",
            Action::DiagnosisDidError(_) => "DiagnosisDidError",
            Action::TabNext => "TabNext",
            Action::TabPrev => "TabPrev",
            Action::Tick => "Tick",
            Action::TerminalResize(_, _) => "TerminalResize",
            Action::Quit => "Quit",
        }
    }
}
