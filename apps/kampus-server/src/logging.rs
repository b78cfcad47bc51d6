use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, LoggingConfig};

/// Build the filter: `RUST_LOG` wins, then `-v`, then the configured level.
///
/// # Errors
///
/// Returns an error if the configured level is not a valid filter directive.
pub fn build_filter(cfg: &LoggingConfig, verbose: bool) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let level = if verbose { "debug" } else { cfg.level.as_str() };
    EnvFilter::try_new(level).with_context(|| format!("invalid logging.level {level:?}"))
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if the filter is invalid or a subscriber is already set.
pub fn init(cfg: &LoggingConfig, verbose: bool) -> Result<()> {
    let filter = build_filter(cfg, verbose)?;

    let (text, json) = match cfg.format {
        LogFormat::Text => (Some(fmt::layer().with_target(false)), None),
        LogFormat::Json => (None, Some(fmt::layer().json().flatten_event(true))),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .try_init()
        .context("failed to install tracing subscriber")
}
