//! Configuration management for Medigram.
//!
//! Medigram reads a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `MEDIGRAM_*` environment overrides, plus `MONGODB_URI`
//! - Default values for optional settings
//! - Validation before the server starts
//!
//! # Example Configuration
//!
//! ```toml
//! database_target = "mongodb"
//!
//! [application]
//! log_level = "info"
//!
//! [server]
//! bind_address = "0.0.0.0:3000"
//! max_upload_bytes = 10485760
//!
//! [mongodb]
//! connection_string = "${MONGODB_URI}"
//! database_name = "medigram"
//! avatar_bucket = "avatars"
//!
//! [logging]
//! local_enabled = false
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use medigram::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("medigram.toml")?;
//! println!("Listening on {}", config.server.bind_address);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, load_config_from_str};
pub use schema::{
    ApplicationConfig, DatabaseTarget, Environment, LoggingConfig, MedigramConfig, MongoDbConfig,
    ServerConfig,
};
pub use secret::{redact_connection_string, secret_string, SecretString, SecretValue};
