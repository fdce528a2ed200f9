//! Single initialization point for the tracing subscriber.
//!
//! Logs go to stderr so stdout stays reserved for JSON output.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Default filter applied when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "docpreview=info";

/// Output profile for the subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    /// Human-readable output.
    #[default]
    Development,
    /// JSON structured output, one event per line.
    Production,
    /// Nothing is installed; tests capture or ignore events themselves.
    Test,
}

static INIT_ONCE: Once = Once::new();

/// Install the global subscriber for `profile`.
///
/// Only the first call has an effect. A subscriber installed elsewhere
/// beforehand is left in place.
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        let result = match profile {
            Profile::Development => tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(env_filter())
                .try_init(),
            Profile::Production => tracing_subscriber::fmt()
                .json()
                .with_writer(std::io::stderr)
                .with_env_filter(env_filter())
                .try_init(),
            Profile::Test => Ok(()),
        };
        if result.is_err() {
            tracing::debug!("global subscriber already installed");
        }
    });
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
