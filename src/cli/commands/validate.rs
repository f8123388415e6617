//! Validate config command implementation
//!
//! Loads the configuration file (which validates it) and prints a summary
//! with credentials redacted.

use super::exit_code;
use crate::config::schema::{DatabaseTarget, MedigramConfig};
use crate::config::{load_config, redact_connection_string};
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        match load_config(config_path) {
            Ok(config) => {
                println!("✅ Configuration is valid");
                println!();
                for line in summary(&config) {
                    println!("  {line}");
                }
                println!();
                Ok(exit_code::SUCCESS)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(exit_code::CONFIG_ERROR)
            }
        }
    }
}

/// Summary lines for a loaded configuration; never includes secrets
fn summary(config: &MedigramConfig) -> Vec<String> {
    let mut lines = vec![
        format!("Environment: {:?}", config.environment),
        format!("Log Level: {}", config.application.log_level),
        format!("Bind Address: {}", config.server.bind_address),
        format!("Max Upload: {} bytes", config.server.max_upload_bytes),
    ];

    if config.server.cors_allowed_origins.is_empty() {
        lines.push("CORS Origins: (none)".to_string());
    } else {
        lines.push(format!(
            "CORS Origins: {}",
            config.server.cors_allowed_origins.join(", ")
        ));
    }

    match (config.database_target, config.mongodb.as_ref()) {
        (DatabaseTarget::MongoDb, Some(mongo)) => {
            lines.push("Database Target: MongoDB".to_string());
            lines.push(format!(
                "MongoDB URI: {}",
                redact_connection_string(mongo.connection_string.expose_secret())
            ));
            lines.push(format!("MongoDB Database: {}", mongo.database_name));
            lines.push(format!("Avatar Bucket: {}", mongo.avatar_bucket));
        }
        (DatabaseTarget::MongoDb, None) => {
            lines.push("Database Target: MongoDB (not configured)".to_string());
        }
        (DatabaseTarget::Memory, _) => {
            lines.push("Database Target: in-memory".to_string());
        }
    }

    if config.logging.local_enabled {
        lines.push(format!(
            "File Logging: {} ({})",
            config.logging.local_path, config.logging.local_rotation
        ));
    }

    lines
}
