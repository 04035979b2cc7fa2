//! Logging setup built on `tracing`.
//!
//! The engines only emit events; the embedding application decides whether
//! to install a subscriber. `RUST_LOG` takes precedence over the configured
//! level.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `habitcoach_core=debug`
    #[serde(default = "default_level")]
    pub level: String,
    /// Emit ANSI colors on the terminal writer
    #[serde(default)]
    pub ansi: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            ansi: false,
        }
    }
}

/// Build the filter from `RUST_LOG` or the configured level.
pub fn filter_for(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Install a stderr fmt subscriber.
///
/// Returns `false` if a global subscriber was already set.
pub fn init(config: &LoggingConfig) -> bool {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter_for(config))
        .with_writer(std::io::stderr)
        .with_ansi(config.ansi)
        .with_target(true)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(level = %config.level, "Logging initialized");
    }
    installed
}

/// Initialize logging for tests (captured by the test harness)
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .with_span_events(FmtSpan::CLOSE)
        .try_init();
}
