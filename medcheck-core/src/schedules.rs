//! Cancellable interval timers
//!
//! Polling loops (the admin statistics refresh, the spinner tick) are
//! registered here instead of as fire-and-forget timers, so they are tied
//! to the runtime's lifecycle and stopped explicitly on teardown.
//!
//! # Example
//!
//! ```ignore
//! schedules.every("stats-poll", Duration::from_secs(30), || Action::StatsFetch);
//! schedules.cancel(&ScheduleKey::new("stats-poll"));
//! ```

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::action::Action;

/// Identifies a schedule for cancellation.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ScheduleKey(String);

impl ScheduleKey {
    /// Create a new schedule key.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the key name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for ScheduleKey {
    fn from(s: &'static str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ScheduleKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Manages interval timers that emit actions for the lifetime of a page.
pub struct Schedules<A> {
    timers: HashMap<ScheduleKey, JoinHandle<()>>,
    action_tx: mpsc::UnboundedSender<A>,
}

impl<A> Schedules<A>
where
    A: Action,
{
    /// Create a new schedule manager.
    pub fn new(action_tx: mpsc::UnboundedSender<A>) -> Self {
        Self {
            timers: HashMap::new(),
            action_tx,
        }
    }

    /// Emit an action at a fixed interval, skipping the immediate first tick.
    ///
    /// A schedule registered under an existing key replaces it.
    pub fn every<F>(
        &mut self,
        key: impl Into<ScheduleKey>,
        period: Duration,
        action_fn: F,
    ) -> &mut Self
    where
        F: Fn() -> A + Send + 'static,
    {
        let key = key.into();
        self.cancel(&key);

        let tx = self.action_tx.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick of tokio's interval completes immediately
            interval.tick().await;

            loop {
                interval.tick().await;
                if tx.send(action_fn()).is_err() {
                    break;
                }
            }
        });

        self.timers.insert(key, handle);
        self
    }

    /// Cancel a schedule by key; no-op if absent.
    pub fn cancel(&mut self, key: &ScheduleKey) {
        if let Some(handle) = self.timers.remove(key) {
            handle.abort();
        }
    }

    /// Cancel every schedule. Called by the runtime on teardown.
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
    }

    /// Whether a schedule with the given key is active.
    pub fn is_active(&self, key: &ScheduleKey) -> bool {
        self.timers.contains_key(key)
    }

    /// Number of active schedules.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Whether no schedules are active.
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

impl<A> Drop for Schedules<A> {
    fn drop(&mut self) {
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    enum TestAction {
        Poll,
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            "Poll"
        }
    }

    #[tokio::test]
    async fn interval_emits_repeatedly() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut schedules = Schedules::new(tx);

        schedules.every("poll", Duration::from_millis(20), || TestAction::Poll);

        for _ in 0..2 {
            let action = tokio::time::timeout(Duration::from_millis(100), rx.recv())
                .await
                .expect("timeout")
                .expect("channel closed");
            assert!(matches!(action, TestAction::Poll));
        }
    }

    #[tokio::test]
    async fn cancel_stops_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut schedules = Schedules::new(tx);

        schedules.every("poll", Duration::from_millis(10), || TestAction::Poll);
        assert!(schedules.is_active(&ScheduleKey::new("poll")));

        let _ = tokio::time::timeout(Duration::from_millis(50), rx.recv()).await;
        schedules.cancel(&ScheduleKey::new("poll"));
        assert!(!schedules.is_active(&ScheduleKey::new("poll")));

        while rx.try_recv().is_ok() {}

        let result = tokio::time::timeout(Duration::from_millis(50), rx.recv()).await;
        assert!(result.is_err(), "no ticks after cancel");
    }

    #[tokio::test]
    async fn same_key_replaces() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut schedules = Schedules::new(tx);

        schedules.every("poll", Duration::from_secs(10), || TestAction::Poll);
        schedules.every("poll", Duration::from_secs(10), || TestAction::Poll);

        assert_eq!(schedules.len(), 1);
        schedules.cancel_all();
        assert!(schedules.is_empty());
    }
}
