//! Terminal client for a symptom-check and hospital-finder backend
//!
//! Three screens over one [`state::AppState`]:
//! - admin: scraping statistics and scrape triggers
//! - news: health alerts and a paged news feed
//! - symptom check: two-stage parse-then-diagnose pipeline
//!
//! All state transitions go through [`reducer::reducer`]; all I/O is
//! declared as [`effect::Effect`] values and executed by the binary's
//! effect handler.

pub mod action;
pub mod api;
pub mod components;
pub mod effect;
pub mod logging;
pub mod reducer;
pub mod state;
