//! Reducer - all state transitions, no side effects
//!
//! Returns a `DispatchResult`: whether the UI needs a re-render, plus the
//! effects the runtime should run. Validation happens here, before any
//! effect is emitted, so invalid input never produces a request.

use medcheck_core::DispatchResult;

use crate::action::Action;
use crate::api::DiagnosisRequest;
use crate::effect::Effect;
use crate::state::{
    AppState, Gender, InputMethod, JobOutcome, ScrapeJob, SymptomFocus, SymptomPhase,
    PAGE_SIZE, SYMPTOM_CATEGORIES,
};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Admin: statistics =====
        Action::StatsFetch => DispatchResult::effect(Effect::FetchStats),

        Action::StatsDidLoad(stats) => {
            state.admin.stats = Some(stats);
            state.admin.stats_error = None;
            DispatchResult::changed()
        }

        Action::StatsDidError(e) => {
            state.admin.stats_error = Some(e.to_string());
            DispatchResult::changed()
        }

        // ===== Admin: prefecture selection =====
        Action::AdminMovePref(i) => {
            state.admin.pref_cursor = i;
            DispatchResult::changed()
        }

        Action::AdminTogglePref(i) => {
            if !state.admin.selected_prefs.remove(&i) {
                state.admin.selected_prefs.insert(i);
            }
            state.admin.validation = None;
            DispatchResult::changed()
        }

        // ===== Admin: scrape triggers =====
        Action::ScrapeAllRequest => {
            if state.admin.jobs_in_flight.contains(&ScrapeJob::All) {
                return DispatchResult::unchanged();
            }
            state.admin.confirm_all = true;
            DispatchResult::changed()
        }

        Action::ScrapeAllCancel => {
            state.admin.confirm_all = false;
            DispatchResult::changed()
        }

        Action::ScrapeStart(job) => {
            // The triggering control is disabled while its job is in flight
            if state.admin.jobs_in_flight.contains(&job) {
                return DispatchResult::unchanged();
            }

            let prefectures = match job {
                ScrapeJob::Hospitals { .. } => {
                    let selected = state.admin.selected_prefecture_names();
                    if selected.is_empty() {
                        // Validation failure: message, no request
                        state.admin.validation =
                            Some("都道府県を選択してください".to_string());
                        return DispatchResult::changed();
                    }
                    selected
                }
                ScrapeJob::News { .. } | ScrapeJob::All => Vec::new(),
            };

            state.admin.confirm_all = false;
            state.admin.validation = None;
            state.admin.jobs_in_flight.insert(job);
            DispatchResult::changed_with(Effect::RunScrape { job, prefectures })
        }

        Action::ScrapeDidFinish { job, result } => {
            // Cleanup is unconditional; the flag is set iff a request is out
            state.admin.jobs_in_flight.remove(&job);

            let refresh_stats = result.is_ok()
                && matches!(
                    job,
                    ScrapeJob::Hospitals { immediate: true } | ScrapeJob::News { immediate: true }
                );

            let envelope = match result {
                Ok(envelope) => envelope,
                Err(e) => crate::api::JobEnvelope::transport_failure(&e),
            };
            // Newest outcome first
            state.admin.results.insert(0, JobOutcome { job, envelope });

            if refresh_stats {
                DispatchResult::changed_with(Effect::FetchStats)
            } else {
                DispatchResult::changed()
            }
        }

        // ===== News =====
        Action::NewsFetch { append } => {
            state.news.loading = true;
            state.news.error = None;
            DispatchResult::changed_with(Effect::FetchNews {
                category: state.news.category_filter(),
                limit: PAGE_SIZE,
                append,
            })
        }

        Action::NewsDidLoad { items, append } => {
            state.news.loading = false;
            state.news.error = None;
            // Marker visible iff the page came back full
            state.news.can_load_more = items.len() == PAGE_SIZE;
            if append {
                state.news.items.extend(items);
            } else {
                state.news.items = items;
                state.news.item_cursor = 0;
            }
            DispatchResult::changed()
        }

        Action::NewsDidError(e) => {
            state.news.loading = false;
            state.news.error = Some(e.to_string());
            DispatchResult::changed()
        }

        Action::AlertsFetch => DispatchResult::effect(Effect::FetchAlerts),

        Action::AlertsDidLoad(alerts) => {
            state.news.alerts = alerts;
            DispatchResult::changed()
        }

        // Stale alerts stay on screen when a refresh fails
        Action::AlertsDidError(_) => DispatchResult::unchanged(),

        Action::NewsSelectCategory(i) => {
            if state.news.category_cursor == i {
                return DispatchResult::unchanged();
            }
            state.news.category_cursor = i;
            state.news.loading = true;
            state.news.error = None;
            DispatchResult::changed_with(Effect::FetchNews {
                category: state.news.category_filter(),
                limit: PAGE_SIZE,
                append: false,
            })
        }

        Action::NewsMoveItem(i) => {
            state.news.item_cursor = i;
            DispatchResult::changed()
        }

        Action::NewsLoadMore => {
            if !state.news.can_load_more || state.news.loading {
                return DispatchResult::unchanged();
            }
            state.news.loading = true;
            DispatchResult::changed_with(Effect::FetchNews {
                category: state.news.category_filter(),
                limit: PAGE_SIZE,
                append: true,
            })
        }

        Action::NewsRefresh => {
            state.news.loading = true;
            state.news.error = None;
            DispatchResult::changed_with_many(vec![
                Effect::FetchNews {
                    category: state.news.category_filter(),
                    limit: PAGE_SIZE,
                    append: false,
                },
                Effect::FetchAlerts,
            ])
        }

        // ===== Symptom check =====
        Action::SymptomSetMethod(method) => {
            state.symptom.input_method = method;
            state.symptom.focus = match method {
                InputMethod::FreeText => SymptomFocus::Text,
                InputMethod::Category => SymptomFocus::Categories,
            };
            DispatchResult::changed()
        }

        Action::SymptomSetFocus(focus) => {
            state.symptom.focus = focus;
            DispatchResult::changed()
        }

        Action::SymptomTextChange(text) => {
            state.symptom.text = text;
            state.symptom.validation = None;
            DispatchResult::changed()
        }

        Action::SymptomSetAge(age) => {
            state.symptom.age = age;
            DispatchResult::changed()
        }

        Action::SymptomCycleGender => {
            state.symptom.gender = match state.symptom.gender {
                None => Some(Gender::Male),
                Some(Gender::Male) => Some(Gender::Female),
                Some(Gender::Female) => None,
            };
            DispatchResult::changed()
        }

        Action::SymptomSelectCategory(i) => {
            let Some(category) = SYMPTOM_CATEGORIES.get(i).copied() else {
                return DispatchResult::unchanged();
            };
            state.symptom.category_cursor = i;
            state.symptom.checked_suggestions.clear();
            state.symptom.suggestion_cursor = 0;
            state.symptom.text = state.symptom.composed_text();
            DispatchResult::changed_with(Effect::FetchSuggestions { category })
        }

        Action::SuggestionsDidLoad(suggestions) => {
            state.symptom.suggestions = suggestions;
            state.symptom.checked_suggestions.clear();
            state.symptom.suggestion_cursor = 0;
            DispatchResult::changed()
        }

        // Suggestion lookup failures leave the previous list alone
        Action::SuggestionsDidError(_) => DispatchResult::unchanged(),

        Action::SymptomMoveSuggestion(i) => {
            state.symptom.suggestion_cursor = i;
            DispatchResult::changed()
        }

        Action::SymptomToggleSuggestion(i) => {
            if !state.symptom.checked_suggestions.remove(&i) {
                state.symptom.checked_suggestions.insert(i);
            }
            state.symptom.text = state.symptom.composed_text();
            DispatchResult::changed()
        }

        Action::SymptomSubmit => {
            if state.symptom.phase.is_busy() {
                return DispatchResult::unchanged();
            }
            let text = state.symptom.text.trim().to_string();
            if text.is_empty() {
                // Validation failure: message, no request
                state.symptom.validation = Some("症状を入力してください".to_string());
                return DispatchResult::changed();
            }
            state.symptom.phase = SymptomPhase::Parsing;
            state.symptom.validation = None;
            state.symptom.error = None;
            state.symptom.parsed = None;
            state.symptom.diagnosis = None;
            DispatchResult::changed_with(Effect::ParseSymptom { text })
        }

        Action::SymptomDidParse(parsed) => {
            // Stage 1 succeeded: store the result and chain into stage 2
            let request = DiagnosisRequest {
                symptoms: vec![parsed.text.clone()],
                patient_age: state.symptom.age,
                patient_gender: state.symptom.gender.map(|g| g.as_wire().to_string()),
                duration: parsed.duration.clone(),
                severity: parsed.severity,
            };
            state.symptom.parsed = Some(parsed);
            state.symptom.phase = SymptomPhase::Analyzing;
            DispatchResult::changed_with(Effect::Analyze(request))
        }

        Action::SymptomDidError(e) => {
            // Stage 1 failed: stage 2 never runs
            state.symptom.phase = SymptomPhase::Idle;
            state.symptom.error = Some(e.to_string());
            DispatchResult::changed()
        }

        Action::DiagnosisDidLoad(diagnosis) => {
            state.symptom.diagnosis = Some(diagnosis);
            state.symptom.phase = SymptomPhase::Idle;
            DispatchResult::changed()
        }

        Action::DiagnosisDidError(e) => {
            state.symptom.phase = SymptomPhase::Idle;
            state.symptom.error = Some(e.to_string());
            DispatchResult::changed()
        }

        // ===== Global =====
        Action::TabNext => {
            state.screen = state.screen.next();
            DispatchResult::changed()
        }

        Action::TabPrev => {
            state.screen = state.screen.prev();
            DispatchResult::changed()
        }

        Action::Tick => {
            state.tick_count = state.tick_count.wrapping_add(1);
            // Only animate spinners while something is loading
            if state.is_loading() {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::TerminalResize(width, height) => {
            if state.terminal_size != (width, height) {
                state.terminal_size = (width, height);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        // Quit is handled in the main loop, not here
        Action::Quit => DispatchResult::unchanged(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, JobEnvelope, JobStatus, NewsItem, ParsedSymptom};

    fn news_item(title: &str) -> NewsItem {
        NewsItem {
            id: None,
            title: title.to_string(),
            content: "内容".to_string(),
            category: "予防".to_string(),
            priority: None,
            published_at: None,
            hospital_name: None,
            tags: None,
        }
    }

    fn completed_envelope() -> JobEnvelope {
        JobEnvelope {
            status: JobStatus::Completed,
            message: "done".into(),
            data: None,
            timestamp: None,
        }
    }

    #[test]
    fn scrape_hospitals_without_selection_emits_no_effect() {
        let mut state = AppState::new();

        let result = reducer(
            &mut state,
            Action::ScrapeStart(ScrapeJob::Hospitals { immediate: true }),
        );

        assert!(result.changed);
        assert!(result.effects.is_empty());
        assert!(state.admin.validation.is_some());
        assert!(state.admin.jobs_in_flight.is_empty());
    }

    #[test]
    fn scrape_hospitals_with_selection_marks_in_flight() {
        let mut state = AppState::new();
        state.admin.selected_prefs.insert(0);

        let job = ScrapeJob::Hospitals { immediate: true };
        let result = reducer(&mut state, Action::ScrapeStart(job));

        assert!(result.changed);
        assert_eq!(result.effects.len(), 1);
        assert!(state.admin.jobs_in_flight.contains(&job));
        assert!(state.admin.validation.is_none());

        // Re-trigger while in flight is a no-op
        let result = reducer(&mut state, Action::ScrapeStart(job));
        assert!(!result.changed);
        assert!(result.effects.is_empty());
    }

    #[test]
    fn scrape_finish_clears_in_flight_on_success_and_failure() {
        for result_value in [
            Ok(completed_envelope()),
            Err(ApiError::Transport("connection refused".into())),
        ] {
            let mut state = AppState::new();
            let job = ScrapeJob::News { immediate: false };
            state.admin.jobs_in_flight.insert(job);

            reducer(
                &mut state,
                Action::ScrapeDidFinish {
                    job,
                    result: result_value,
                },
            );

            assert!(state.admin.jobs_in_flight.is_empty());
            assert_eq!(state.admin.results.len(), 1);
        }
    }

    #[test]
    fn scrape_results_are_newest_first() {
        let mut state = AppState::new();
        let first = ScrapeJob::News { immediate: true };
        let second = ScrapeJob::All;

        reducer(
            &mut state,
            Action::ScrapeDidFinish {
                job: first,
                result: Ok(completed_envelope()),
            },
        );
        reducer(
            &mut state,
            Action::ScrapeDidFinish {
                job: second,
                result: Ok(completed_envelope()),
            },
        );

        assert_eq!(state.admin.results[0].job, second);
        assert_eq!(state.admin.results[1].job, first);
    }

    #[test]
    fn immediate_scrape_success_refreshes_stats() {
        let mut state = AppState::new();

        let result = reducer(
            &mut state,
            Action::ScrapeDidFinish {
                job: ScrapeJob::Hospitals { immediate: true },
                result: Ok(completed_envelope()),
            },
        );
        assert_eq!(result.effects, vec![Effect::FetchStats]);

        // Background jobs and failures do not
        let result = reducer(
            &mut state,
            Action::ScrapeDidFinish {
                job: ScrapeJob::Hospitals { immediate: false },
                result: Ok(completed_envelope()),
            },
        );
        assert!(result.effects.is_empty());

        let result = reducer(
            &mut state,
            Action::ScrapeDidFinish {
                job: ScrapeJob::News { immediate: true },
                result: Err(ApiError::Transport("down".into())),
            },
        );
        assert!(result.effects.is_empty());
    }

    #[test]
    fn news_replace_resets_and_append_concatenates() {
        let mut state = AppState::new();
        state.news.items = vec![news_item("old")];
        state.news.item_cursor = 3;

        reducer(
            &mut state,
            Action::NewsDidLoad {
                items: vec![news_item("a"), news_item("b")],
                append: false,
            },
        );
        assert_eq!(state.news.items.len(), 2);
        assert_eq!(state.news.item_cursor, 0);

        reducer(
            &mut state,
            Action::NewsDidLoad {
                items: vec![news_item("c")],
                append: true,
            },
        );
        assert_eq!(state.news.items.len(), 3);
        assert_eq!(state.news.items[2].title, "c");
    }

    #[test]
    fn load_more_visible_iff_page_is_full() {
        let mut state = AppState::new();

        let full_page: Vec<NewsItem> = (0..PAGE_SIZE).map(|i| news_item(&i.to_string())).collect();
        reducer(
            &mut state,
            Action::NewsDidLoad {
                items: full_page,
                append: false,
            },
        );
        assert!(state.news.can_load_more);

        let short_page: Vec<NewsItem> = (0..PAGE_SIZE - 1)
            .map(|i| news_item(&i.to_string()))
            .collect();
        reducer(
            &mut state,
            Action::NewsDidLoad {
                items: short_page,
                append: true,
            },
        );
        assert!(!state.news.can_load_more);
    }

    #[test]
    fn load_more_ignored_without_marker() {
        let mut state = AppState::new();
        state.news.can_load_more = false;

        let result = reducer(&mut state, Action::NewsLoadMore);
        assert!(!result.changed);
        assert!(result.effects.is_empty());
    }

    #[test]
    fn news_loading_flag_true_iff_outstanding() {
        let mut state = AppState::new();

        let result = reducer(&mut state, Action::NewsFetch { append: false });
        assert!(state.news.loading);
        assert_eq!(result.effects.len(), 1);

        reducer(
            &mut state,
            Action::NewsDidLoad {
                items: vec![],
                append: false,
            },
        );
        assert!(!state.news.loading);

        reducer(&mut state, Action::NewsFetch { append: false });
        assert!(state.news.loading);
        reducer(
            &mut state,
            Action::NewsDidError(ApiError::Transport("down".into())),
        );
        assert!(!state.news.loading);
    }

    #[test]
    fn empty_symptom_text_blocks_submission() {
        let mut state = AppState::new();
        state.symptom.text = "   ".to_string();

        let result = reducer(&mut state, Action::SymptomSubmit);

        assert!(result.changed);
        assert!(result.effects.is_empty());
        assert!(state.symptom.validation.is_some());
        assert_eq!(state.symptom.phase, SymptomPhase::Idle);
    }

    #[test]
    fn symptom_submit_starts_stage_one() {
        let mut state = AppState::new();
        state.symptom.text = "頭痛がする".to_string();

        let result = reducer(&mut state, Action::SymptomSubmit);

        assert_eq!(state.symptom.phase, SymptomPhase::Parsing);
        assert_eq!(
            result.effects,
            vec![Effect::ParseSymptom {
                text: "頭痛がする".to_string()
            }]
        );

        // Submitting again while busy is a no-op
        let result = reducer(&mut state, Action::SymptomSubmit);
        assert!(result.effects.is_empty());
    }

    #[test]
    fn parse_success_chains_into_analysis() {
        let mut state = AppState::new();
        state.symptom.phase = SymptomPhase::Parsing;
        state.symptom.age = Some(35);
        state.symptom.gender = Some(Gender::Female);

        let parsed = ParsedSymptom {
            id: None,
            text: "頭痛".to_string(),
            category: "頭部".to_string(),
            severity: Some(3),
            duration: Some("3日".to_string()),
            location: None,
            keywords: vec!["頭痛".to_string()],
        };
        let result = reducer(&mut state, Action::SymptomDidParse(parsed));

        assert_eq!(state.symptom.phase, SymptomPhase::Analyzing);
        match &result.effects[..] {
            [Effect::Analyze(request)] => {
                assert_eq!(request.symptoms, vec!["頭痛".to_string()]);
                assert_eq!(request.patient_age, Some(35));
                assert_eq!(request.patient_gender, Some("female".to_string()));
                assert_eq!(request.severity, Some(3));
                assert_eq!(request.duration, Some("3日".to_string()));
            }
            other => panic!("expected a single Analyze effect, got {:?}", other),
        }
    }

    #[test]
    fn parse_error_never_reaches_stage_two() {
        let mut state = AppState::new();
        state.symptom.phase = SymptomPhase::Parsing;

        let result = reducer(
            &mut state,
            Action::SymptomDidError(ApiError::Backend("解析できませんでした".into())),
        );

        assert!(result.effects.is_empty());
        assert_eq!(state.symptom.phase, SymptomPhase::Idle);
        assert_eq!(
            state.symptom.error.as_deref(),
            Some("解析できませんでした")
        );
        assert!(state.symptom.diagnosis.is_none());
    }

    #[test]
    fn toggling_suggestions_recomposes_text() {
        let mut state = AppState::new();
        state.symptom.suggestions = vec![
            crate::api::Suggestion {
                text: "頭痛".into(),
                category: None,
                common: true,
            },
            crate::api::Suggestion {
                text: "めまい".into(),
                category: None,
                common: false,
            },
        ];

        reducer(&mut state, Action::SymptomToggleSuggestion(0));
        assert_eq!(state.symptom.text, "頭痛の症状があります");

        reducer(&mut state, Action::SymptomToggleSuggestion(1));
        assert_eq!(state.symptom.text, "頭痛、めまいの症状があります");

        reducer(&mut state, Action::SymptomToggleSuggestion(0));
        assert_eq!(state.symptom.text, "めまいの症状があります");
    }

    #[test]
    fn tick_only_rerenders_while_loading() {
        let mut state = AppState::new();

        assert!(!reducer(&mut state, Action::Tick).changed);

        state.news.loading = true;
        assert!(reducer(&mut state, Action::Tick).changed);
    }

    #[test]
    fn scrape_all_requires_confirmation() {
        let mut state = AppState::new();

        let result = reducer(&mut state, Action::ScrapeAllRequest);
        assert!(result.effects.is_empty());
        assert!(state.admin.confirm_all);

        let result = reducer(&mut state, Action::ScrapeStart(ScrapeJob::All));
        assert!(!state.admin.confirm_all);
        assert_eq!(result.effects.len(), 1);
        assert!(state.admin.jobs_in_flight.contains(&ScrapeJob::All));
    }
}
