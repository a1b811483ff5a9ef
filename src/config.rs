use config::{Config as ConfigBuilder, Environment, File};
use serde::Deserialize;
use std::env;

use crate::error::ConfigurationError;

/// Upper bound for `jwt.expiration_days` (ten years)
pub const MAX_EXPIRATION_DAYS: i64 = 3650;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub environment: EnvironmentConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    #[serde(default)]
    pub secret: String,
    pub expiration_days: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"***")
            .field("expiration_days", &self.expiration_days)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EnvironmentConfig {
    #[serde(default = "default_mode")]
    pub mode: String,
}

impl EnvironmentConfig {
    /// Only the exact `development` mode sends the session cookie over plain http
    pub fn is_development(&self) -> bool {
        self.mode == "development"
    }
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
        }
    }
}

fn default_mode() -> String {
    "production".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Legacy environment variables (JWT_SECRET, NODE_ENV, DATABASE_URL)
    /// 2. Prefixed environment variables (KEYCARD__JWT__SECRET, etc.)
    /// 3. Config file specified by path
    /// 4. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigurationError> {
        let mut builder = ConfigBuilder::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.request_timeout_secs", 30)?
            .set_default("database.url", "sqlite:keycard.db")?
            .set_default("database.max_connections", 5)?
            .set_default("jwt.secret", "")?
            .set_default("jwt.expiration_days", 7)?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Optional, ignored when missing
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("KEYCARD")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(database_url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", database_url)?;
        }

        if let Ok(jwt_secret) = env::var("JWT_SECRET") {
            builder = builder.set_override("jwt.secret", jwt_secret)?;
        }

        if let Ok(mode) = env::var("NODE_ENV") {
            builder = builder.set_override("environment.mode", mode)?;
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Validate configuration
    ///
    /// Called once at startup, a failure here must stop the process.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigurationError::MissingJwtSecret);
        }

        if !(1..=MAX_EXPIRATION_DAYS).contains(&self.jwt.expiration_days) {
            return Err(ConfigurationError::InvalidExpiration(
                self.jwt.expiration_days,
            ));
        }

        if self.database.max_connections < 1 {
            return Err(ConfigurationError::InvalidMaxConnections);
        }

        if self.server.port == 0 {
            return Err(ConfigurationError::InvalidPort);
        }

        if self.jwt.secret.len() < 32 {
            tracing::warn!("JWT secret is shorter than 32 characters");
        }

        Ok(())
    }
}
