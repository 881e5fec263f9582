//! Shared test fixtures for coordinator integration tests.
//!
//! Every test runs on a paused Tokio clock (`start_paused = true`), so the
//! timings asserted below are exact rather than approximate. The
//! [`Recorder`] collects what reached the collaborators: the number of
//! pre-execution hook calls and every delivered outcome with the virtual time
//! it arrived at.

use futures::FutureExt;
use futures::future::BoxFuture;
use rstest::fixture;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};
use typeahead::{CoordinatorConfig, SearchCoordinator, SearchOutcome};

/// 500 ms debounce, minimum length 3.
#[fixture]
pub fn config() -> CoordinatorConfig {
    typeahead::logging::init();
    CoordinatorConfig::new(Duration::from_millis(500), 3)
}

/// An outcome as seen by the completion sink.
#[derive(Debug)]
pub struct Delivered {
    /// Virtual time since the coordinator was created.
    pub at: Duration,
    pub outcome: SearchOutcome<String>,
}

/// Observes the collaborators of one coordinator.
pub struct Recorder {
    hooks: Arc<AtomicUsize>,
    delivered: mpsc::UnboundedReceiver<Delivered>,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl Recorder {
    /// Number of pre-execution hook calls so far.
    pub fn hooks(&self) -> usize {
        self.hooks.load(Ordering::SeqCst)
    }

    /// Let `window` of virtual time pass, then return everything delivered.
    pub async fn drain_for(&mut self, window: Duration) -> Vec<Delivered> {
        tokio::time::sleep(window).await;
        let mut delivered = Vec::new();
        while let Ok(next) = self.delivered.try_recv() {
            delivered.push(next);
        }
        delivered
    }
}

/// Query behaviour: per-keyword latency, and keywords that fail.
#[derive(Debug, Clone, Default)]
pub struct Backend {
    latency: HashMap<String, Duration>,
    failing: Vec<String>,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl Backend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slow(mut self, keyword: &str, latency: Duration) -> Self {
        self.latency.insert(keyword.to_string(), latency);
        self
    }

    pub fn failing(mut self, keyword: &str) -> Self {
        self.failing.push(keyword.to_string());
        self
    }

    /// Resolves to `"results for <keyword>"` after the keyword's latency.
    fn query(&self, keyword: String) -> BoxFuture<'static, typeahead::Result<String>> {
        let latency = self.latency.get(&keyword).copied().unwrap_or_default();
        let fails = self.failing.contains(&keyword);
        async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            if fails {
                anyhow::bail!("backend rejected {keyword}");
            }
            Ok(format!("results for {keyword}"))
        }
        .boxed()
    }
}

/// Build a coordinator wired to `backend` and a fresh [`Recorder`].
pub fn spawn_coordinator(
    config: CoordinatorConfig,
    backend: Backend,
) -> (SearchCoordinator, Recorder) {
    let hooks = Arc::new(AtomicUsize::new(0));
    let (tx, delivered) = mpsc::unbounded_channel();
    let start = Instant::now();

    let hook_count = Arc::clone(&hooks);
    let coordinator = SearchCoordinator::with_callbacks(
        config,
        move || {
            hook_count.fetch_add(1, Ordering::SeqCst);
        },
        move |keyword: String| backend.query(keyword),
        move |outcome: SearchOutcome<String>| {
            let _ = tx.send(Delivered {
                at: start.elapsed(),
                outcome,
            });
        },
    );

    (coordinator, Recorder { hooks, delivered })
}

/// Pause between submissions.
pub async fn wait_ms(millis: u64) {
    tokio::time::sleep(Duration::from_millis(millis)).await;
}
