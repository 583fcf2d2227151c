/**
 * Server Configuration
 *
 * This module handles loading and validation of server configuration and
 * the optional PostgreSQL database connection.
 *
 * # Configuration Sources
 *
 * Configuration is loaded from environment variables (after `.env` has been
 * applied by the binary), with defaults suitable for local development.
 *
 * | Variable                | Default |
 * |-------------------------|---------|
 * | `SERVER_PORT`           | 3000    |
 * | `DATABASE_URL`          | unset   |
 * | `JWT_SECRET`            | development secret, with a warning |
 * | `MAX_MESSAGE_LENGTH`    | 10000   |
 * | `HISTORY_PAGE_SIZE`     | 50      |
 * | `HISTORY_MAX_PAGE_SIZE` | 100     |
 * | `OUTBOUND_BUFFER`       | 64      |
 * | `TOKEN_TTL_SECS`        | 2592000 (30 days) |
 *
 * # Error Handling
 *
 * Malformed or inconsistent values are a `ConfigError`. A missing or
 * unreachable database is not: the server falls back to the in-memory store.
 */

use crate::backend::auth::sessions::DEFAULT_TOKEN_TTL_SECS;
use crate::backend::chat::ChatLimits;
use sqlx::PgPool;
use std::str::FromStr;
use thiserror::Error;

const DEV_JWT_SECRET: &str = "xfchat-development-secret";

/// Configuration error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} has invalid value {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Runtime settings for the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub max_message_length: usize,
    pub history_page_size: u32,
    pub history_max_page_size: u32,
    /// Capacity of each connection's outbound queue
    pub outbound_buffer: usize,
    /// Lifetime of tokens issued by the server's `Authenticator`
    pub token_ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let limits = ChatLimits::default();
        Self {
            port: 3000,
            database_url: None,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            max_message_length: limits.max_message_length,
            history_page_size: limits.default_page_size,
            history_max_page_size: limits.max_page_size,
            outbound_buffer: 64,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }
}

impl ServerConfig {
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let jwt_secret = match lookup("JWT_SECRET").filter(|s| !s.trim().is_empty()) {
            Some(secret) => secret,
            None => {
                tracing::warn!("[Server] JWT_SECRET not set, using the development secret");
                defaults.jwt_secret
            }
        };

        let config = Self {
            port: parse_or(&lookup, "SERVER_PORT", defaults.port)?,
            database_url: lookup("DATABASE_URL").filter(|s| !s.trim().is_empty()),
            jwt_secret,
            max_message_length: parse_or(&lookup, "MAX_MESSAGE_LENGTH", defaults.max_message_length)?,
            history_page_size: parse_or(&lookup, "HISTORY_PAGE_SIZE", defaults.history_page_size)?,
            history_max_page_size: parse_or(
                &lookup,
                "HISTORY_MAX_PAGE_SIZE",
                defaults.history_max_page_size,
            )?,
            outbound_buffer: parse_or(&lookup, "OUTBOUND_BUFFER", defaults.outbound_buffer)?,
            token_ttl_secs: parse_or(&lookup, "TOKEN_TTL_SECS", defaults.token_ttl_secs)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid("JWT secret cannot be empty".to_string()));
        }
        if self.max_message_length == 0 {
            return Err(ConfigError::Invalid("MAX_MESSAGE_LENGTH must be at least 1".to_string()));
        }
        if self.history_page_size == 0 {
            return Err(ConfigError::Invalid("HISTORY_PAGE_SIZE must be at least 1".to_string()));
        }
        if self.history_max_page_size < self.history_page_size {
            return Err(ConfigError::Invalid(format!(
                "HISTORY_MAX_PAGE_SIZE ({}) is smaller than HISTORY_PAGE_SIZE ({})",
                self.history_max_page_size, self.history_page_size
            )));
        }
        if self.outbound_buffer == 0 {
            return Err(ConfigError::Invalid("OUTBOUND_BUFFER must be at least 1".to_string()));
        }
        if self.token_ttl_secs == 0 {
            return Err(ConfigError::Invalid("TOKEN_TTL_SECS must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn limits(&self) -> ChatLimits {
        ChatLimits {
            max_message_length: self.max_message_length,
            default_page_size: self.history_page_size,
            max_page_size: self.history_max_page_size,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        None => Ok(default),
    }
}

/// Builder for `ServerConfig`
#[derive(Debug, Clone, Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = Some(url.into());
        self
    }

    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.jwt_secret = secret.into();
        self
    }

    pub fn max_message_length(mut self, len: usize) -> Self {
        self.config.max_message_length = len;
        self
    }

    pub fn history_page_size(mut self, size: u32) -> Self {
        self.config.history_page_size = size;
        self
    }

    pub fn history_max_page_size(mut self, size: u32) -> Self {
        self.config.history_max_page_size = size;
        self
    }

    pub fn outbound_buffer(mut self, capacity: usize) -> Self {
        self.config.outbound_buffer = capacity;
        self
    }

    pub fn token_ttl_secs(mut self, secs: u64) -> Self {
        self.config.token_ttl_secs = secs;
        self
    }

    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Load and initialize the database connection pool
///
/// # Returns
///
/// - `Some(PgPool)` if the database is reachable
/// - `None` if the connection fails
///
/// Migration failures are logged and the pool is still returned.
pub async fn load_database(database_url: &str) -> Option<PgPool> {
    tracing::info!("[Server] Connecting to database...");

    let pool = match PgPool::connect(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("[Server] Failed to create database connection pool: {:?}", e);
            tracing::warn!("[Server] Falling back to the in-memory message store");
            return None;
        }
    };

    tracing::info!("[Server] Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => tracing::info!("[Server] Database migrations completed successfully"),
        Err(e) => {
            tracing::error!("[Server] Failed to run database migrations: {}", e);
            tracing::warn!("[Server] Continuing without migrations - database might not be up to date");
        }
    }

    Some(pool)
}
