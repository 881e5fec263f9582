//! Caller-supplied collaborators.
//!
//! The coordinator never performs a search itself. It calls out to a
//! [`SearchDelegate`] for the three things it needs: a side effect before each
//! debounced keyword, the asynchronous query, and the completion sink.
//! [`Callbacks`] adapts three closures to the trait.

use crate::error::SearchError;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;

/// Terminal notification for one accepted keyword.
#[derive(Debug)]
pub struct SearchOutcome<R> {
    /// The keyword the query ran for. Empty for [`SearchError::Internal`].
    pub keyword: String,
    pub result: Result<R, SearchError>,
}

impl<R> SearchOutcome<R> {
    pub fn success(keyword: impl Into<String>, value: R) -> Self {
        Self {
            keyword: keyword.into(),
            result: Ok(value),
        }
    }

    pub fn failure(keyword: impl Into<String>, error: SearchError) -> Self {
        Self {
            keyword: keyword.into(),
            result: Err(error),
        }
    }

    /// Fallback delivered when the pipeline produced no settlement.
    pub fn internal() -> Self {
        Self::failure(String::new(), SearchError::Internal)
    }

    pub const fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Collaborator interface driven by a [`SearchCoordinator`](crate::SearchCoordinator).
///
/// All three methods are called on the coordinator's driver task, one at a
/// time. Implementations must not panic from `pre_execution` or `complete`;
/// the coordinator does not catch those.
pub trait SearchDelegate: Send + 'static {
    /// Payload produced by a successful query.
    type Output: Send + 'static;

    /// Runs once for every debounced keyword, before the length gate.
    fn pre_execution(&self) {}

    /// Starts the lookup for an accepted keyword.
    fn query(&self, keyword: String) -> BoxFuture<'static, crate::Result<Self::Output>>;

    /// Receives exactly one outcome per accepted, non-superseded keyword.
    fn complete(&self, outcome: SearchOutcome<Self::Output>);
}

/// [`SearchDelegate`] built from closures.
pub struct Callbacks<P, Q, C> {
    pre_execution: P,
    query: Q,
    completion: C,
}

impl<P, Q, C> Callbacks<P, Q, C> {
    pub const fn new(pre_execution: P, query: Q, completion: C) -> Self {
        Self {
            pre_execution,
            query,
            completion,
        }
    }
}

impl<P, Q, C> fmt::Debug for Callbacks<P, Q, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks").finish_non_exhaustive()
    }
}

impl<P, Q, C, Fut, R> SearchDelegate for Callbacks<P, Q, C>
where
    P: Fn() + Send + 'static,
    Q: Fn(String) -> Fut + Send + 'static,
    Fut: Future<Output = crate::Result<R>> + Send + 'static,
    C: Fn(SearchOutcome<R>) + Send + 'static,
    R: Send + 'static,
{
    type Output = R;

    fn pre_execution(&self) {
        (self.pre_execution)();
    }

    fn query(&self, keyword: String) -> BoxFuture<'static, crate::Result<R>> {
        (self.query)(keyword).boxed()
    }

    fn complete(&self, outcome: SearchOutcome<R>) {
        (self.completion)(outcome);
    }
}
