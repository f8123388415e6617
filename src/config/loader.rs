//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{DatabaseTarget, MedigramConfig, MongoDbConfig};
use super::secret::secret_string;
use crate::domain::errors::MedigramError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into MedigramConfig
/// 4. Applies environment variable overrides (MEDIGRAM_* prefix, MONGODB_URI)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, a referenced
/// environment variable is unset, or validation fails. A missing MongoDB
/// connection string is reported here, before the server starts.
///
/// # Examples
///
/// ```no_run
/// use medigram::config::loader::load_config;
///
/// let config = load_config("medigram.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<MedigramConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MedigramError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        MedigramError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_from_str(&contents)
}

/// Parses, overrides and validates configuration held in memory
///
/// # Errors
///
/// Same as [`load_config`], minus the file access.
pub fn load_config_from_str(contents: &str) -> Result<MedigramConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: MedigramConfig = toml::from_str(&contents)
        .map_err(|e| MedigramError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        MedigramError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| MedigramError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(MedigramError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides
///
/// Variables follow the pattern `MEDIGRAM_<SECTION>_<KEY>`, for example
/// `MEDIGRAM_SERVER_BIND_ADDRESS`. `MONGODB_URI` and `MONGODB_DB_NAME` are
/// honoured too, so a deployment that only sets `MONGODB_URI` gets a working
/// `[mongodb]` section.
fn apply_env_overrides(config: &mut MedigramConfig) -> Result<()> {
    if let Ok(val) = std::env::var("MEDIGRAM_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("MEDIGRAM_SERVER_BIND_ADDRESS") {
        config.server.bind_address = val;
    }
    if let Ok(val) = std::env::var("MEDIGRAM_SERVER_MAX_UPLOAD_BYTES") {
        config.server.max_upload_bytes = val.parse().map_err(|_| {
            MedigramError::Configuration(format!(
                "MEDIGRAM_SERVER_MAX_UPLOAD_BYTES must be a number, got '{val}'"
            ))
        })?;
    }
    if let Ok(val) = std::env::var("MEDIGRAM_SERVER_CORS_ALLOWED_ORIGINS") {
        config.server.cors_allowed_origins = val
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
    }

    if let Ok(val) = std::env::var("MEDIGRAM_DATABASE_TARGET") {
        config.database_target = match val.to_lowercase().as_str() {
            "mongodb" => DatabaseTarget::MongoDb,
            "memory" => DatabaseTarget::Memory,
            other => {
                return Err(MedigramError::Configuration(format!(
                    "MEDIGRAM_DATABASE_TARGET must be 'mongodb' or 'memory', got '{other}'"
                )))
            }
        };
    }

    let uri = std::env::var("MEDIGRAM_MONGODB_CONNECTION_STRING")
        .or_else(|_| std::env::var("MONGODB_URI"))
        .ok();
    if let Some(uri) = uri {
        match config.mongodb {
            Some(ref mut mongo) => mongo.connection_string = secret_string(uri),
            None => {
                config.mongodb = Some(MongoDbConfig::with_connection_string(secret_string(uri)))
            }
        }
    }

    if let Some(ref mut mongo) = config.mongodb {
        if let Ok(val) = std::env::var("MEDIGRAM_MONGODB_DATABASE_NAME")
            .or_else(|_| std::env::var("MONGODB_DB_NAME"))
        {
            mongo.database_name = val;
        }
        if let Ok(val) = std::env::var("MEDIGRAM_MONGODB_AVATAR_BUCKET") {
            mongo.avatar_bucket = val;
        }
    }

    if let Ok(val) = std::env::var("MEDIGRAM_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("MEDIGRAM_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
