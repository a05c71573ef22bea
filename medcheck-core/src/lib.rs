//! Core pipeline for the medcheck TUI.
//!
//! Every screen in medcheck follows the same request/response cycle: a user
//! event (or a timer) produces an action, the reducer updates state and
//! declares effects, effects spawn keyed HTTP requests, and request
//! completions come back as result actions that trigger a re-render. This
//! crate holds the pieces that cycle is built from:
//!
//! - **Action**: a described intent or async result
//! - **EffectStore**: state container whose reducer emits effects
//! - **Component**: pure render function over props, emitting actions
//! - **Requests**: keyed async tasks; a new request for a target aborts
//!   the in-flight one, so stale responses are never rendered
//! - **Schedules**: cancellable interval timers for polling
//! - **Runtime**: the select loop tying events, actions, and effects together
//!
//! # Async convention
//!
//! Intent actions (`StatsFetch`) trigger effects; result actions
//! (`StatsDidLoad`, `StatsDidError`) carry the outcome back over the action
//! channel. The `Did*` prefix marks results.

pub mod action;
pub mod component;
pub mod event;
pub mod requests;
pub mod runtime;
pub mod schedules;
pub mod store;
pub mod testing;
pub mod text;

pub use action::Action;
pub use component::Component;
pub use event::{process_raw_event, spawn_event_poller, EventKind, RawEvent};
pub use requests::{RequestKey, Requests};
pub use runtime::{EffectContext, EventOutcome, PollerConfig, Runtime};
pub use schedules::{ScheduleKey, Schedules};
pub use store::{
    DispatchResult, EffectReducer, EffectStore, EffectStoreWithMiddleware, LoggingMiddleware,
    Middleware, NoopMiddleware,
};
pub use testing::{
    char_key, ctrl_key, key, ActionAssertions, RenderHarness, TestHarness,
};
pub use text::sanitize;

// Re-export ratatui types used in every component signature
pub use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    Frame,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::Action;
    pub use crate::component::Component;
    pub use crate::event::{process_raw_event, spawn_event_poller, EventKind, RawEvent};
    pub use crate::requests::{RequestKey, Requests};
    pub use crate::runtime::{EffectContext, EventOutcome, PollerConfig, Runtime};
    pub use crate::schedules::{ScheduleKey, Schedules};
    pub use crate::store::{
        DispatchResult, EffectReducer, EffectStore, EffectStoreWithMiddleware, LoggingMiddleware,
        Middleware, NoopMiddleware,
    };
    pub use crate::text::sanitize;

    pub use ratatui::{
        layout::Rect,
        style::{Color, Modifier, Style},
        text::{Line, Span, Text},
        Frame,
    };
}
