//! Log setup for the `rollbook` binary.
//!
//! Logs go to stderr so they never mix with menu prompts on stdout.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// How much the binary logs, from `-q` / `-v` / `-vv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Warnings and errors, such as skipped attendance rows.
    #[default]
    Normal,
    /// Adds file writes, loads and syncs.
    Verbose,
    /// Everything.
    Trace,
}

impl Verbosity {
    /// Most detailed level shown.
    #[must_use]
    pub fn to_level_filter(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }
}

/// Install the stderr subscriber. `RUST_LOG` overrides `verbosity`.
///
/// Later calls are ignored.
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rollbook={}", verbosity.to_level_filter())));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

/// Route warnings from the library into captured test output.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("rollbook=warn")
        .with_test_writer()
        .try_init();
}
