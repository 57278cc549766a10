use std::env;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("log tracer already initialized")]
    LogTracerAlreadyInitialized,

    #[error("global tracing subscriber already set")]
    SubscriberAlreadySet,
}

/// Logs go to stderr so they never mix with rendered secrets on stdout.
///
/// Keep the returned guard alive until exit, or buffered JSON lines are lost.
pub fn init_logger() -> Result<Option<WorkerGuard>, SetupError> {
    if !json_enabled(env::var("JSON_LOG").ok().as_deref()) {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init()
            .map_err(|_| SetupError::SubscriberAlreadySet)?;
        return Ok(None);
    }

    // Redirect the logs from log library to tracing's subscribers.
    LogTracer::init().map_err(|_| SetupError::LogTracerAlreadyInitialized)?;

    let app_name = concat!(env!("CARGO_PKG_NAME"), "-", env!("CARGO_PKG_VERSION")).to_string();

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(std::io::stderr());

    let bunyan_formatting_layer = BunyanFormattingLayer::new(app_name, non_blocking_writer);
    let subscriber = Registry::default()
        .with(env_filter())
        .with(JsonStorageLayer)
        .with(bunyan_formatting_layer);
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|_| SetupError::SubscriberAlreadySet)?;

    Ok(Some(guard))
}

fn json_enabled(value: Option<&str>) -> bool {
    value.is_some_and(|s| s.parse().unwrap_or_default())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
