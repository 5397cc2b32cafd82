//! Console logger construction.
//!
//! The subscriber is built once by the entry point and installed for the
//! duration of the run with [`tracing::subscriber::with_default`], so nothing
//! is configured at load time and library code never touches global state.

use std::io::IsTerminal;

use tracing::Subscriber;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Build the console subscriber described by `config`.
///
/// `RUST_LOG` takes precedence over the configured level. An unparsable
/// level falls back to `info`.
pub fn build_subscriber(config: &LoggingConfig) -> Box<dyn Subscriber + Send + Sync> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .with_ansi(std::io::stdout().is_terminal())
        .with_target(false);

    match config.format {
        LogFormat::Text => Box::new(builder.finish()),
        LogFormat::Json => Box::new(builder.json().finish()),
    }
}
