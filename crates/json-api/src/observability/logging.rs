//! Log subscriber setup.

use tracing_subscriber::{
    EnvFilter, Registry,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{ServerConfig, observability::LogFormat};

use super::ObservabilityError;

/// Noisy dependencies are held at `warn` unless `RUST_LOG` carries explicit directives.
const QUIET_DEPENDENCIES: &str = "h2=warn,hyper=warn,hyper_util=warn,sqlx=warn,salvo_core=warn";

pub(super) fn init_subscriber(config: &ServerConfig) -> Result<(), ObservabilityError> {
    let layer: Box<dyn Layer<Registry> + Send + Sync> = match config.logging.log_format {
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(true)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(env_filter(&config.logging.log_level))
        .try_init()?;

    Ok(())
}

fn env_filter(level: &str) -> EnvFilter {
    if level.contains('=') {
        return EnvFilter::new(level);
    }

    EnvFilter::new(format!("{level},{QUIET_DEPENDENCIES}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_level_quiets_dependencies() {
        let filter = env_filter("debug").to_string();

        assert!(filter.contains("debug"), "level kept: {filter}");
        assert!(filter.contains("sqlx=warn"), "sqlx quieted: {filter}");
    }

    #[test]
    fn explicit_directives_are_used_verbatim() {
        let filter = env_filter("storefront_app=trace").to_string();

        assert!(filter.contains("storefront_app=trace"), "directive kept: {filter}");
        assert!(!filter.contains("sqlx"), "no defaults added: {filter}");
    }
}
