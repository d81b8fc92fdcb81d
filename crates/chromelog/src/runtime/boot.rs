//! Boot — logging init and config load.

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::conf::{ConfigError, PipelineConfig};

/// Initialise the tracing / logging subsystem.
///
/// Logs go to stderr; stdout belongs to the console call sink.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chromelog=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load and validate the pipeline configuration.
pub fn boot() -> Result<PipelineConfig, ConfigError> {
    info!("Starting chromelog v{}", env!("CARGO_PKG_VERSION"));

    let config = PipelineConfig::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        "Annotations: backtrace={:?}, timestamp={:?} ({}), banner={:?}",
        config.backtrace_position,
        config.timestamp_position,
        config.timestamp_format,
        config.display_data_url
    );

    Ok(config)
}
