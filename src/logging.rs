use error_stack::{Result, ResultExt};
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer, Registry};

use crate::config::{Logging, LoggingStyle};

#[derive(Debug, Error)]
#[error("Failed to initialize logging")]
pub struct LoggingInitError;

/// Installs the global subscriber. `RUST_LOG` takes over the
/// configured targets when it is set.
pub fn init(cfg: &Logging) -> Result<(), LoggingInitError> {
    let fmt: Box<dyn Layer<Registry> + Send + Sync> = match cfg.style {
        LoggingStyle::Compact => fmt::layer().compact().boxed(),
        LoggingStyle::Pretty => fmt::layer().pretty().boxed(),
    };

    let targets = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| cfg.targets.clone());
    let registry = Registry::default()
        .with(fmt)
        .with(ErrorLayer::default())
        .with(make_env_filter(&targets));

    tracing::subscriber::set_global_default(registry)
        .change_context(LoggingInitError)
        .attach_printable("logging is already initialized")
}

fn make_env_filter(targets: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(targets)
}
