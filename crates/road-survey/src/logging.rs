/*!
Logging and profiling setup for the road-survey binary.

Two implementations expose the same API:

- real: compiled when `feature = "profiling"` is set. Adds a tracing-chrome layer
  when the `ENABLE_PROFILING` environment variable is present; the trace file is
  flushed when the returned guard is dropped.
- stub: logging only.

Logs always go to stderr so stdout stays free for survey output.
*/

use tracing_subscriber::EnvFilter;

/// Filter used when RUST_LOG is not set
fn default_filter() -> EnvFilter {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let directives = if cfg!(debug_assertions) {
                "debug"
            } else {
                "info"
            };
            EnvFilter::new(directives)
        }
    }
}

#[cfg(feature = "profiling")]
mod inner {
    use tracing_chrome::{ChromeLayerBuilder, FlushGuard};
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    /// Keeps the chrome trace open; dropping it flushes the file
    pub struct LoggingGuard {
        _flush: Option<FlushGuard>,
    }

    pub fn setup_logging_and_profiling() -> LoggingGuard {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(super::default_filter());

        let (chrome_layer, guard) = if std::env::var("ENABLE_PROFILING").is_ok() {
            let (layer, guard) = ChromeLayerBuilder::new().include_args(true).build();
            (Some(layer), Some(guard))
        } else {
            (None, None)
        };
        let profiling = guard.is_some();

        tracing_subscriber::registry()
            .with(chrome_layer)
            .with(fmt_layer)
            .init();

        if profiling {
            tracing::info!("ENABLE_PROFILING set - recording Chrome trace until exit");
        }
        LoggingGuard { _flush: guard }
    }
}

#[cfg(not(feature = "profiling"))]
mod inner {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    pub struct LoggingGuard;

    pub fn setup_logging_and_profiling() -> LoggingGuard {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(super::default_filter());
        tracing_subscriber::registry().with(fmt_layer).init();
        LoggingGuard
    }
}

pub use inner::{LoggingGuard, setup_logging_and_profiling};
