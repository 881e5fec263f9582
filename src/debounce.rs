//! Quiet-period debouncing for keyword input.
//!
//! Each pushed keyword restarts a single timer; only the keyword present when
//! the timer elapses is emitted. The timer is a [`Sleep`] that is reset in
//! place, so a burst of input never allocates more than one timer.

use std::pin::Pin;
use tokio::time::{Duration, Instant, Sleep, sleep};

#[derive(Debug)]
pub(crate) struct Debouncer {
    interval: Duration,
    pending: Option<String>,
    timer: Pin<Box<Sleep>>,
}

impl Debouncer {
    /// Must be called inside a Tokio runtime.
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: None,
            timer: Box::pin(sleep(Duration::ZERO)),
        }
    }

    /// Record a new keyword and restart the quiet period.
    ///
    /// With a zero interval the keyword is handed straight back and nothing
    /// is left pending.
    pub(crate) fn push(&mut self, keyword: String) -> Option<String> {
        if self.interval.is_zero() {
            self.pending = None;
            return Some(keyword);
        }
        self.timer.as_mut().reset(Instant::now() + self.interval);
        self.pending = Some(keyword);
        None
    }

    pub(crate) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Resolves with the pending keyword once the quiet period elapses.
    ///
    /// Cancel safe: dropping the future keeps the keyword pending. Only poll
    /// while [`is_pending`](Self::is_pending) holds.
    pub(crate) async fn elapsed(&mut self) -> Option<String> {
        self.timer.as_mut().await;
        self.pending.take()
    }

    /// Drop the pending keyword without emitting it.
    pub(crate) fn cancel(&mut self) {
        self.pending = None;
    }
}
