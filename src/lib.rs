//! Search-as-you-type coordination.
//!
//! A [`SearchCoordinator`] takes a stream of keyword updates and turns it into
//! at most one live lookup at a time: input is debounced, every debounced
//! keyword runs the caller's pre-execution hook, keywords shorter than the
//! configured minimum are dropped, and only the most recently dispatched
//! query may reach the completion sink.
//!
//! ```no_run
//! use std::time::Duration;
//! use typeahead::{CoordinatorConfig, SearchCoordinator, SearchOutcome};
//!
//! # async fn demo() {
//! let coordinator = SearchCoordinator::with_callbacks(
//!     CoordinatorConfig::new(Duration::from_millis(300), 3),
//!     || { /* clear stale results */ },
//!     |keyword: String| async move { anyhow::Ok(vec![keyword]) },
//!     |outcome: SearchOutcome<Vec<String>>| println!("{:?}", outcome.result),
//! );
//! coordinator.search("rus");
//! coordinator.search("rust");
//! # coordinator.shutdown().await;
//! # }
//! ```

pub mod config;
pub mod coordinator;
pub(crate) mod debounce;
pub mod delegate;
pub(crate) mod dispatch;
pub mod error;
pub mod gate;
pub(crate) mod generation;
pub mod logging;

pub use config::CoordinatorConfig;
pub use coordinator::{Phase, SearchCoordinator};
pub use delegate::{Callbacks, SearchDelegate, SearchOutcome};
pub use error::{ConfigError, Result, SearchError};
pub use gate::KeywordGate;
