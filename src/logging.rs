//! Tracing initialization.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "typeahead=info";

/// Install a compact `tracing` subscriber. Safe to call multiple times.
///
/// Under the test harness output goes through the test writer so it is
/// captured per test, and the default level is raised to debug.
pub fn init() {
    INIT.call_once(|| {
        let is_test =
            std::env::var("NEXTEST").is_ok() || std::env::var("CARGO_TARGET_TMPDIR").is_ok();
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(if is_test { "typeahead=debug" } else { DEFAULT_FILTER })
        });

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_target(true)
            .compact();

        let installed = if is_test {
            builder.with_test_writer().try_init()
        } else {
            builder.with_writer(std::io::stderr).try_init()
        };
        if let Err(e) = installed {
            eprintln!("Failed to initialize tracing: {}", e);
        }
    });
}
