//! Configuration management for the catalog service and web client
//!
//! Both processes read their settings the same way: built-in defaults, an
//! optional `config/default` file, `CATALOG_*` environment variables, and
//! finally the plain variable names (`DATABASE_URL`, `API_PORT`, ...).

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Secret key used when none is configured
pub const DEFAULT_SECRET_KEY: &str = "change-me";

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

/// Settings of the web client's outbound calls to the catalog service
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    /// Timeout applied to every outbound request, in seconds
    pub request_timeout_secs: f64,
}

impl ApiConfig {
    /// Negative values are treated as zero; infinite or out of range ones are rejected
    pub fn request_timeout(&self) -> Result<Duration, ConfigError> {
        Duration::try_from_secs_f64(self.request_timeout_secs.max(0.0)).map_err(|e| {
            ConfigError::Message(format!(
                "invalid api.request_timeout_secs {}: {}",
                self.request_timeout_secs, e
            ))
        })
    }
}

/// Catalog service configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub secret_key: String,
    pub logging: LoggingConfig,
}

/// Web client configuration
#[derive(Debug, Deserialize, Clone)]
pub struct WebConfig {
    pub server: ServerConfig,
    pub api: ApiConfig,
    pub secret_key: String,
    pub logging: LoggingConfig,
}

impl ServiceConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = ServiceConfig::default();

        let config = base_builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("database.url", defaults.database.url)?
            .set_default("database.max_connections", i64::from(defaults.database.max_connections))?
            .set_default("secret_key", defaults.secret_key)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.format", defaults.logging.format)?
            .add_source(File::with_name("config/service").required(false))
            .add_source(catalog_environment())
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .set_override_option(
                "database.max_connections",
                env::var("DATABASE_MAX_CONNECTIONS").ok(),
            )?
            .set_override_option("server.host", env::var("API_HOST").ok())?
            .set_override_option("server.port", env::var("API_PORT").ok())?
            .set_override_option("secret_key", env::var("SECRET_KEY").ok())?
            .set_override_option("logging.level", env::var("LOG_LEVEL").ok())?
            .set_override_option("logging.format", env::var("LOG_FORMAT").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl WebConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = WebConfig::default();

        let config = base_builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("api.base_url", defaults.api.base_url)?
            .set_default("api.request_timeout_secs", defaults.api.request_timeout_secs)?
            .set_default("secret_key", defaults.secret_key)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.format", defaults.logging.format)?
            .add_source(File::with_name("config/web").required(false))
            .add_source(catalog_environment())
            .set_override_option("server.host", env::var("WEB_HOST").ok())?
            .set_override_option("server.port", env::var("WEB_PORT").ok())?
            .set_override_option("api.base_url", env::var("API_BASE_URL").ok())?
            .set_override_option("api.request_timeout_secs", env::var("REQUEST_TIMEOUT").ok())?
            .set_override_option("secret_key", env::var("SECRET_KEY").ok())?
            .set_override_option("logging.level", env::var("LOG_LEVEL").ok())?
            .set_override_option("logging.format", env::var("LOG_FORMAT").ok())?
            .build()?;

        let web: WebConfig = config.try_deserialize()?;
        web.api.request_timeout()?;
        Ok(web)
    }
}

fn base_builder() -> config::ConfigBuilder<config::builder::DefaultState> {
    Config::builder().add_source(File::with_name("config/default").required(false))
}

/// `CATALOG_SERVER__PORT=9000` style variables
fn catalog_environment() -> Environment {
    Environment::with_prefix("CATALOG")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8001,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://library.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8001".to_string(),
            request_timeout_secs: 8.0,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
            },
            api: ApiConfig::default(),
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            logging: LoggingConfig::default(),
        }
    }
}
