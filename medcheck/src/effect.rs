//! Effects - side work declared by the reducer
//!
//! The reducer returns these instead of doing I/O. The effect handler in
//! main.rs turns each one into a keyed request, so a re-triggered fetch
//! aborts its stale predecessor.

use crate::api::DiagnosisRequest;
use crate::state::ScrapeJob;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// GET the scraping statistics
    FetchStats,
    /// Run a scrape trigger endpoint
    RunScrape {
        job: ScrapeJob,
        prefectures: Vec<String>,
    },
    /// GET the health alerts
    FetchAlerts,
    /// GET a page of news, optionally filtered
    FetchNews {
        category: Option<&'static str>,
        limit: usize,
        append: bool,
    },
    /// GET suggestions for a body-area category
    FetchSuggestions { category: &'static str },
    /// POST the symptom text for parsing (pipeline stage 1)
    ParseSymptom { text: String },
    /// POST the diagnosis request (pipeline stage 2)
    Analyze(DiagnosisRequest),
}
