use std::str::FromStr;

use color_eyre::eyre::{eyre, Result};
use tracing_subscriber::{
    filter::LevelFilter,
    fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::{LogFormat, LoggingConfig};

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingConfig) -> Result<()> {
    let level = LevelFilter::from_str(&logging.level)
        .map_err(|err| eyre!("invalid logging.level '{}': {}", logging.level, err))?;

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|err| eyre!("failed to install tracing subscriber: {}", err))
}
