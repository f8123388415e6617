//! Configuration schema types
//!
//! This module defines the configuration structure that maps to
//! `medigram.toml`.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseTarget {
    /// MongoDB collections plus a GridFS bucket for avatars
    #[default]
    MongoDb,
    /// Process-local store, lost on exit
    Memory,
}

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

/// Main Medigram configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedigramConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage backend (mongodb or memory)
    #[serde(default)]
    pub database_target: DatabaseTarget,

    /// MongoDB configuration (required if database_target = mongodb)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mongodb: Option<MongoDbConfig>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl MedigramConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.server.validate()?;

        match self.database_target {
            DatabaseTarget::MongoDb => match self.mongodb {
                Some(ref config) => config.validate()?,
                None => {
                    return Err(
                        "mongodb.connection_string is required when database_target = 'mongodb' \
                         (set it in the config file or via MONGODB_URI)"
                            .to_string(),
                    )
                }
            },
            DatabaseTarget::Memory => {
                if self.environment == Environment::Production {
                    return Err(
                        "database_target = 'memory' is not allowed in production environments"
                            .to_string(),
                    );
                }
            }
        }

        self.logging.validate()?;
        Ok(())
    }
}

impl Default for MedigramConfig {
    fn default() -> Self {
        Self {
            application: ApplicationConfig::default(),
            environment: Environment::default(),
            server: ServerConfig::default(),
            database_target: DatabaseTarget::Memory,
            mongodb: None,
            logging: LoggingConfig::default(),
        }
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Request body limit in bytes; bounds buffered avatar uploads
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Origins allowed to call the API from a browser ("*" for any)
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

impl ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.bind_address.parse::<SocketAddr>().is_err() {
            return Err(format!(
                "server.bind_address '{}' is not a valid socket address (e.g. 0.0.0.0:3000)",
                self.bind_address
            ));
        }

        if !(1024..=100 * 1024 * 1024).contains(&self.max_upload_bytes) {
            return Err(format!(
                "server.max_upload_bytes must be between 1024 and 104857600, got {}",
                self.max_upload_bytes
            ));
        }

        for origin in &self.cors_allowed_origins {
            if origin == "*" {
                continue;
            }
            match url::Url::parse(origin) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
                _ => {
                    return Err(format!(
                        "server.cors_allowed_origins entry '{origin}' must be '*' or an http(s) origin"
                    ))
                }
            }
        }

        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            max_upload_bytes: default_max_upload_bytes(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

/// MongoDB configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoDbConfig {
    /// Connection string (`mongodb://` or `mongodb+srv://`)
    /// Stored securely in memory and automatically zeroized on drop
    pub connection_string: SecretString,

    /// Database name
    #[serde(default = "default_database_name")]
    pub database_name: String,

    /// GridFS bucket holding avatar images
    #[serde(default = "default_avatar_bucket")]
    pub avatar_bucket: String,

    /// Application name reported to the server
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Connect and server-selection timeout in seconds
    #[serde(default = "default_connect_timeout_seconds")]
    pub connect_timeout_seconds: u64,
}

impl MongoDbConfig {
    /// Creates a configuration with defaults for everything but the URI
    pub fn with_connection_string(connection_string: SecretString) -> Self {
        Self {
            connection_string,
            database_name: default_database_name(),
            avatar_bucket: default_avatar_bucket(),
            app_name: default_app_name(),
            connect_timeout_seconds: default_connect_timeout_seconds(),
        }
    }

    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        let uri = self.connection_string.expose_secret();
        if uri.is_empty() {
            return Err("mongodb.connection_string cannot be empty".to_string());
        }

        if !uri.starts_with("mongodb://") && !uri.starts_with("mongodb+srv://") {
            return Err(
                "mongodb.connection_string must start with mongodb:// or mongodb+srv://"
                    .to_string(),
            );
        }

        if self.database_name.is_empty()
            || self
                .database_name
                .chars()
                .any(|c| matches!(c, '/' | '\\' | '.' | ' ' | '"' | '$'))
        {
            return Err(format!(
                "mongodb.database_name '{}' is empty or contains invalid characters",
                self.database_name
            ));
        }

        if self.avatar_bucket.trim().is_empty() {
            return Err("mongodb.avatar_bucket cannot be empty".to_string());
        }

        if self.connect_timeout_seconds == 0 || self.connect_timeout_seconds > 300 {
            return Err(format!(
                "mongodb.connect_timeout_seconds must be between 1 and 300, got {}",
                self.connect_timeout_seconds
            ));
        }

        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write JSON logs to rolling files
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation policy (daily, hourly, never)
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled = true".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_database_name() -> String {
    "medigram".to_string()
}

fn default_avatar_bucket() -> String {
    "avatars".to_string()
}

fn default_app_name() -> String {
    "medigram".to_string()
}

fn default_connect_timeout_seconds() -> u64 {
    10
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}
