//! Logging setup
//!
//! Structured logging via `tracing`. Library code only emits events; the
//! binary installs the subscriber once at startup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, compact lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Default filter for a verbosity level (`-v` count)
#[must_use]
pub fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info,entigen=debug",
        _ => "debug,entigen=trace",
    }
}

/// Initialize the global subscriber
///
/// `RUST_LOG` takes precedence over `verbosity`. Events go to stderr so
/// generated output on stdout stays clean.
///
/// # Example
///
/// ```rust,no_run
/// use entigen::observability::{self, LogFormat};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// observability::init(1, LogFormat::Pretty)?;
/// tracing::info!("generator started");
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init(
    verbosity: u8,
    format: LogFormat,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_levels() {
        assert_eq!(default_filter(0), "warn");
        assert!(default_filter(1).contains("entigen=debug"));
        assert!(default_filter(5).contains("entigen=trace"));
    }

    #[test]
    fn test_default_format() {
        assert_eq!(LogFormat::default(), LogFormat::Pretty);
    }
}
