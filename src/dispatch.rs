//! Switch-latest dispatch of query futures.
//!
//! Every accepted keyword gets a fresh [`Generation`] and its query runs as a
//! task in a [`JoinSet`]. Settlements come back to the driver tagged with the
//! generation they were started under, and only the live generation is ever
//! turned into a [`SearchOutcome`]. Starting a new generation retires the old
//! one immediately, whether or not its task has finished.

use crate::delegate::SearchOutcome;
use crate::error::SearchError;
use crate::generation::{Generation, GenerationClock};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::panic::AssertUnwindSafe;
use tokio::task::{AbortHandle, JoinError, JoinSet};

/// What a query task hands back to the driver.
#[derive(Debug)]
pub(crate) struct Settlement<R> {
    generation: Generation,
    keyword: String,
    result: Result<R, SearchError>,
}

#[derive(Debug)]
struct Live {
    generation: Generation,
    abort: AbortHandle,
}

#[derive(Debug)]
pub(crate) struct Dispatcher<R> {
    clock: GenerationClock,
    live: Option<Live>,
    tasks: JoinSet<Settlement<R>>,
    cancel_superseded: bool,
}

impl<R: Send + 'static> Dispatcher<R> {
    pub(crate) fn new(cancel_superseded: bool) -> Self {
        Self {
            clock: GenerationClock::new(),
            live: None,
            tasks: JoinSet::new(),
            cancel_superseded,
        }
    }

    /// Generation whose outcome is still eligible for delivery.
    pub(crate) fn live_generation(&self) -> Option<Generation> {
        self.live.as_ref().map(|live| live.generation)
    }

    pub(crate) fn has_tasks(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Start `query` as the new live generation.
    pub(crate) fn dispatch(
        &mut self,
        keyword: String,
        query: BoxFuture<'static, crate::Result<R>>,
    ) -> Generation {
        self.retire();
        let generation = self.clock.next();
        tracing::debug!(%generation, keyword = %keyword, "Dispatching query");

        let abort = self.tasks.spawn(async move {
            match AssertUnwindSafe(query).catch_unwind().await {
                Ok(result) => Settlement {
                    generation,
                    keyword,
                    result: result.map_err(SearchError::Query),
                },
                // A panicking query never settled.
                Err(_) => Settlement {
                    generation,
                    keyword: String::new(),
                    result: Err(SearchError::Internal),
                },
            }
        });

        self.live = Some(Live { generation, abort });
        generation
    }

    /// Consume a generation without starting a task, retiring whatever was
    /// live.
    pub(crate) fn advance(&mut self) -> Generation {
        self.retire();
        self.clock.next()
    }

    /// Waits for the next finished task. Cancel safe.
    pub(crate) async fn join_next(&mut self) -> Option<Result<Settlement<R>, JoinError>> {
        self.tasks.join_next().await
    }

    /// Turn a finished task into an outcome if it belongs to the live
    /// generation.
    pub(crate) fn settle(
        &mut self,
        joined: Result<Settlement<R>, JoinError>,
    ) -> Option<SearchOutcome<R>> {
        match joined {
            Ok(settlement) if self.live_generation() == Some(settlement.generation) => {
                self.live = None;
                Some(SearchOutcome {
                    keyword: settlement.keyword,
                    result: settlement.result,
                })
            }
            Ok(settlement) => {
                tracing::debug!(
                    generation = %settlement.generation,
                    keyword = %settlement.keyword,
                    "Dropping superseded result"
                );
                None
            }
            Err(e) if e.is_cancelled() => None,
            Err(e) => {
                // Panics are caught inside the task, so a task lost this way
                // took its settlement with it.
                tracing::warn!("Query task ended without a settlement: {}", e);
                self.live.take().map(|_| SearchOutcome::internal())
            }
        }
    }

    /// Retire the live generation, aborting its task if configured to.
    fn retire(&mut self) {
        let Some(live) = self.live.take() else {
            return;
        };
        if self.cancel_superseded {
            live.abort.abort();
        }
        tracing::debug!(generation = %live.generation, "Retired generation");
    }

    /// Retire everything and abort all tasks, superseded ones included.
    pub(crate) fn shutdown(&mut self) {
        self.live = None;
        self.tasks.abort_all();
    }
}
