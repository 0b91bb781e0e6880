//! Tracing bootstrap for binaries and demos.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install the global tracing subscriber according to `config`.
///
/// `RUST_LOG` wins over the configured level when set. Calling this twice
/// is a no-op rather than a panic, so tests and embedding hosts can both
/// call it freely.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = if config.format == "json" {
        builder.json().try_init()
    } else {
        builder.pretty().try_init()
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
