//! Tracing subscriber setup shared by both binaries

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LoggingConfig, DEFAULT_SECRET_KEY};

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "library_catalog={level},catalog_service={level},catalog_web={level},tower_http=debug",
            level = logging.level
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    if logging.format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

pub fn warn_on_default_secret(secret_key: &str) {
    if secret_key == DEFAULT_SECRET_KEY {
        tracing::warn!("SECRET_KEY is not set, using the built-in default");
    }
}
