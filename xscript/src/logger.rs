use tracing_subscriber::EnvFilter;

use crate::config::logger_config::LoggerConfig;

/// Install the global subscriber. `RUST_LOG` wins over the configured levels.
pub fn init_logging(config: &LoggerConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.directives()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
