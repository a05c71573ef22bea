//! Keyed async requests with stale-response suppression
//!
//! Each render target that issues backend requests owns a [`RequestKey`].
//! Spawning a request for a key aborts the in-flight request with the same
//! key first, so when a timer-driven refresh and a user-triggered refresh
//! race for the same region, only the most recently triggered request can
//! ever deliver a result action. This replaces last-response-wins with
//! last-triggered-wins without sequence-number bookkeeping: the stale
//! task is cancelled before its completion action is sent.
//!
//! # Example
//!
//! ```ignore
//! requests.spawn("admin-stats", async move {
//!     match client.scraping_status().await {
//!         Ok(stats) => Action::StatsDidLoad(stats),
//!         Err(e) => Action::StatsDidError(e.to_string()),
//!     }
//! });
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::{AbortHandle, JoinHandle};

use crate::action::Action;

/// Identifies a render target's outstanding request.
///
/// Requests with the same key are mutually exclusive.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct RequestKey(String);

impl RequestKey {
    /// Create a new request key.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the key name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for RequestKey {
    fn from(s: &'static str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RequestKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Manages in-flight request tasks, keyed by render target.
///
/// Completions are delivered as actions over the runtime's channel. If a
/// task is aborted before completion, no action is sent.
pub struct Requests<A> {
    in_flight: HashMap<RequestKey, AbortHandle>,
    action_tx: mpsc::UnboundedSender<A>,
}

impl<A> Requests<A>
where
    A: Action,
{
    /// Create a new request manager sending completions over `action_tx`.
    pub fn new(action_tx: mpsc::UnboundedSender<A>) -> Self {
        Self {
            in_flight: HashMap::new(),
            action_tx,
        }
    }

    /// Spawn a request, aborting any in-flight request with the same key.
    pub fn spawn<F>(&mut self, key: impl Into<RequestKey>, future: F) -> &mut Self
    where
        F: Future<Output = A> + Send + 'static,
    {
        let key = key.into();
        self.cancel(&key);

        let tx = self.action_tx.clone();
        let handle: JoinHandle<()> = tokio::spawn(async move {
            let action = future.await;
            let _ = tx.send(action);
        });

        self.in_flight.insert(key, handle.abort_handle());
        self
    }

    /// Spawn a request after a quiet period, resetting the timer if called
    /// again with the same key before it fires.
    ///
    /// Used for fetch-as-you-navigate patterns such as symptom suggestion
    /// lookups while the category cursor moves.
    pub fn debounce<F>(
        &mut self,
        key: impl Into<RequestKey>,
        duration: Duration,
        future: F,
    ) -> &mut Self
    where
        F: Future<Output = A> + Send + 'static,
    {
        let key = key.into();
        self.cancel(&key);

        let tx = self.action_tx.clone();
        let handle: JoinHandle<()> = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let action = future.await;
            let _ = tx.send(action);
        });

        self.in_flight.insert(key, handle.abort_handle());
        self
    }

    /// Abort the request with the given key, if any.
    pub fn cancel(&mut self, key: &RequestKey) {
        if let Some(handle) = self.in_flight.remove(key) {
            handle.abort();
        }
    }

    /// Abort every in-flight request.
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.in_flight.drain() {
            handle.abort();
        }
    }

    /// Whether a request with the given key is currently in flight.
    ///
    /// Note: a completed task's entry is only cleaned up on the next spawn
    /// or cancel for that key; the authoritative "outstanding" indicator is
    /// application state set by intent/result actions.
    pub fn is_in_flight(&self, key: &RequestKey) -> bool {
        self.in_flight.contains_key(key)
    }

    /// Number of tracked request slots.
    pub fn len(&self) -> usize {
        self.in_flight.len()
    }

    /// Whether no requests are tracked.
    pub fn is_empty(&self) -> bool {
        self.in_flight.is_empty()
    }
}

impl<A> Drop for Requests<A> {
    fn drop(&mut self) {
        for (_, handle) in self.in_flight.drain() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Debug)]
    enum TestAction {
        Done(usize),
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            "Done"
        }
    }

    #[test]
    fn request_key_conversions() {
        let k1 = RequestKey::new("stats");
        let k2 = RequestKey::from("stats");
        let k3: RequestKey = "stats".into();

        assert_eq!(k1, k2);
        assert_eq!(k2, k3);
        assert_eq!(k1.name(), "stats");
    }

    #[tokio::test]
    async fn spawn_sends_completion_action() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut requests = Requests::new(tx);

        requests.spawn("stats", async { TestAction::Done(42) });

        let action = tokio::time::timeout(Duration::from_millis(100), rx.recv())
            .await
            .expect("timeout")
            .expect("channel closed");

        assert!(matches!(action, TestAction::Done(42)));
    }

    #[tokio::test]
    async fn same_key_aborts_previous() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut requests = Requests::new(tx);

        let counter = Arc::new(AtomicUsize::new(0));

        let c1 = counter.clone();
        requests.spawn("stats", async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            c1.fetch_add(1, Ordering::SeqCst);
            TestAction::Done(1)
        });

        let c2 = counter.clone();
        requests.spawn("stats", async move {
            c2.fetch_add(10, Ordering::SeqCst);
            TestAction::Done(2)
        });

        let action = tokio::time::timeout(Duration::from_millis(200), rx.recv())
            .await
            .expect("timeout")
            .expect("channel closed");

        assert!(matches!(action, TestAction::Done(2)));
        assert_eq!(counter.load(Ordering::SeqCst), 10);
    }

    #[tokio::test]
    async fn debounce_waits_and_resets() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut requests = Requests::new(tx);

        requests.debounce("suggest", Duration::from_millis(50), async {
            TestAction::Done(1)
        });

        tokio::time::sleep(Duration::from_millis(30)).await;
        requests.debounce("suggest", Duration::from_millis(50), async {
            TestAction::Done(2)
        });

        let action = tokio::time::timeout(Duration::from_millis(150), rx.recv())
            .await
            .expect("timeout")
            .expect("channel closed");

        assert!(matches!(action, TestAction::Done(2)));
    }

    #[tokio::test]
    async fn cancel_suppresses_completion() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut requests = Requests::new(tx);

        requests.spawn("stats", async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            TestAction::Done(1)
        });

        assert!(requests.is_in_flight(&RequestKey::new("stats")));
        requests.cancel(&RequestKey::new("stats"));
        assert!(!requests.is_in_flight(&RequestKey::new("stats")));

        let result = tokio::time::timeout(Duration::from_millis(150), rx.recv()).await;
        assert!(result.is_err() || result.unwrap().is_none());
    }

    #[tokio::test]
    async fn cancel_all_clears() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut requests = Requests::new(tx);

        requests.spawn("a", async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            TestAction::Done(1)
        });
        requests.spawn("b", async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            TestAction::Done(2)
        });

        assert_eq!(requests.len(), 2);
        requests.cancel_all();
        assert!(requests.is_empty());
    }
}
