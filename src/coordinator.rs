//! The search coordinator handle and its driver task.
//!
//! [`SearchCoordinator::new`] spawns one driver task that owns all mutable
//! state: the debounce timer, the gate, the generation clock and the query
//! tasks. The handle only holds the sending half of the input channel, a
//! cancellation token and a phase receiver, so `search` never blocks and is
//! callable from any thread.
//!
//! Pipeline inside the driver:
//!
//! ```text
//! search() -> watch -> Debouncer -> pre_execution() -> KeywordGate -> Dispatcher -> complete()
//! ```

use crate::config::CoordinatorConfig;
use crate::debounce::Debouncer;
use crate::delegate::{Callbacks, SearchDelegate, SearchOutcome};
use crate::dispatch::{Dispatcher, Settlement};
use crate::gate::KeywordGate;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Observable coordinator state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// Nothing pending, nothing in flight.
    #[default]
    Idle,
    /// A keyword is waiting out the debounce interval.
    Debouncing,
    /// A query is in flight and its outcome will be delivered.
    Dispatched,
}

/// Debounced, switch-latest search-as-you-type coordinator.
///
/// Dropping the coordinator tears it down. Use [`shutdown`](Self::shutdown)
/// to also wait until the driver has stopped, after which no callback can
/// fire.
#[derive(Debug)]
pub struct SearchCoordinator {
    input: watch::Sender<String>,
    phase: watch::Receiver<Phase>,
    cancel: CancellationToken,
    driver: Option<JoinHandle<()>>,
}

impl SearchCoordinator {
    /// Build a coordinator and spawn its driver task.
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime.
    pub fn new<D: SearchDelegate>(config: CoordinatorConfig, delegate: D) -> Self {
        let (input, input_rx) = watch::channel(String::new());
        let (phase_tx, phase) = watch::channel(Phase::Idle);
        let cancel = CancellationToken::new();

        let driver = Driver {
            debouncer: Debouncer::new(config.debounce_interval),
            gate: KeywordGate::new(config.minimum_length),
            dispatcher: Dispatcher::new(config.cancel_superseded),
            reject_retires_in_flight: config.reject_retires_in_flight,
            delegate,
            input: input_rx,
            phase: phase_tx,
            cancel: cancel.clone(),
        };

        let span = tracing::info_span!(
            "search_coordinator",
            debounce = ?config.debounce_interval,
            minimum_length = config.minimum_length,
        );
        let driver = tokio::spawn(driver.run().instrument(span));

        Self {
            input,
            phase,
            cancel,
            driver: Some(driver),
        }
    }

    /// Build a coordinator from three closures: the pre-execution hook, the
    /// query and the completion sink.
    pub fn with_callbacks<P, Q, C>(
        config: CoordinatorConfig,
        pre_execution: P,
        query: Q,
        completion: C,
    ) -> Self
    where
        Callbacks<P, Q, C>: SearchDelegate,
    {
        Self::new(config, Callbacks::new(pre_execution, query, completion))
    }

    /// Submit the latest keyword, replacing any keyword not yet debounced.
    pub fn search(&self, keyword: impl Into<String>) {
        if self.cancel.is_cancelled() {
            tracing::trace!("Ignoring search on disposed coordinator");
            return;
        }
        self.input.send_replace(keyword.into());
    }

    /// Current phase of the pipeline.
    pub fn phase(&self) -> Phase {
        *self.phase.borrow()
    }

    /// Receiver that observes every phase change.
    pub fn watch_phase(&self) -> watch::Receiver<Phase> {
        self.phase.clone()
    }

    /// Stop the coordinator: cancel the debounce timer, abort query tasks
    /// and retire all generations. Idempotent.
    pub fn dispose(&self) {
        if !self.cancel.is_cancelled() {
            tracing::debug!("Disposing search coordinator");
        }
        self.cancel.cancel();
    }

    pub fn is_disposed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Dispose and wait for the driver task to finish.
    pub async fn shutdown(mut self) {
        self.dispose();
        let Some(driver) = self.driver.take() else {
            return;
        };
        if let Err(e) = driver.await
            && e.is_panic()
        {
            tracing::error!("Search coordinator driver panicked: {}", e);
        }
    }
}

impl Drop for SearchCoordinator {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// State owned by the driver task.
struct Driver<D: SearchDelegate> {
    debouncer: Debouncer,
    gate: KeywordGate,
    dispatcher: Dispatcher<D::Output>,
    reject_retires_in_flight: bool,
    delegate: D,
    input: watch::Receiver<String>,
    phase: watch::Sender<Phase>,
    cancel: CancellationToken,
}

impl<D: SearchDelegate> Driver<D> {
    async fn run(mut self) {
        tracing::debug!("Search coordinator started");

        loop {
            tokio::select! {
                biased;

                () = self.cancel.cancelled() => break,

                changed = self.input.changed() => {
                    if changed.is_err() {
                        // Handle dropped.
                        break;
                    }
                    let keyword = self.input.borrow_and_update().clone();
                    self.on_input(keyword);
                }

                Some(keyword) = self.debouncer.elapsed(), if self.debouncer.is_pending() => {
                    self.on_debounced(keyword);
                }

                Some(joined) = self.dispatcher.join_next(), if self.dispatcher.has_tasks() => {
                    self.on_settled(joined);
                }
            }

            self.publish_phase();
        }

        self.debouncer.cancel();
        self.dispatcher.shutdown();
        self.publish_phase();
        tracing::debug!("Search coordinator stopped");
    }

    fn on_input(&mut self, keyword: String) {
        tracing::trace!(keyword = %keyword, "Keyword submitted");
        if let Some(keyword) = self.debouncer.push(keyword) {
            self.on_debounced(keyword);
        }
    }

    fn on_debounced(&mut self, keyword: String) {
        if self.cancel.is_cancelled() {
            return;
        }
        tracing::debug!(keyword = %keyword, "Keyword debounced");
        self.delegate.pre_execution();

        if !self.gate.accepts(&keyword) {
            tracing::trace!(
                keyword = %keyword,
                minimum_length = self.gate.minimum_length(),
                "Keyword below minimum length"
            );
            if self.reject_retires_in_flight && self.dispatcher.live_generation().is_some() {
                self.dispatcher.advance();
            }
            return;
        }

        let query = catch_unwind(AssertUnwindSafe(|| self.delegate.query(keyword.clone())));
        match query {
            Ok(query) => {
                self.dispatcher.dispatch(keyword, query);
            }
            Err(_) => {
                tracing::warn!(keyword = %keyword, "Query function panicked before returning a future");
                self.dispatcher.advance();
                self.deliver(SearchOutcome::internal());
            }
        }
    }

    fn on_settled(&mut self, joined: Result<Settlement<D::Output>, JoinError>) {
        if let Some(outcome) = self.dispatcher.settle(joined) {
            self.deliver(outcome);
        }
    }

    fn deliver(&self, outcome: SearchOutcome<D::Output>) {
        if self.cancel.is_cancelled() {
            return;
        }
        match &outcome.result {
            Ok(_) => tracing::debug!(keyword = %outcome.keyword, "Delivering result"),
            Err(e) => tracing::debug!(keyword = %outcome.keyword, "Delivering failure: {}", e),
        }
        self.delegate.complete(outcome);
    }

    fn publish_phase(&self) {
        let next = if self.cancel.is_cancelled() {
            Phase::Idle
        } else if self.debouncer.is_pending() {
            Phase::Debouncing
        } else if self.dispatcher.live_generation().is_some() {
            Phase::Dispatched
        } else {
            Phase::Idle
        };
        self.phase.send_if_modified(|phase| {
            let changed = *phase != next;
            *phase = next;
            changed
        });
    }
}
