//! Serve command implementation
//!
//! Loads the configuration, connects the stores, and runs the HTTP API
//! until a shutdown signal arrives.

use super::exit_code;
use crate::adapters::database::create_stores;
use crate::api;
use crate::config::load_config;
use crate::core::records::Records;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Override `server.bind_address`
    #[arg(short, long)]
    pub bind: Option<String>,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, config_path = %config_path, "Configuration error");
                eprintln!("❌ {e}");
                return Ok(exit_code::CONFIG_ERROR);
            }
        };

        if let Some(ref bind) = self.bind {
            config.server.bind_address = bind.clone();
            if let Err(e) = config.validate() {
                eprintln!("❌ Configuration validation failed: {e}");
                return Ok(exit_code::CONFIG_ERROR);
            }
        }

        tracing::info!(
            environment = ?config.environment,
            database_target = ?config.database_target,
            bind_address = %config.server.bind_address,
            "Starting Medigram"
        );

        let stores = match create_stores(&config).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create stores");
                eprintln!("❌ Failed to create stores: {e}");
                return Ok(exit_code::CONNECTION_ERROR);
            }
        };

        if let Err(e) = stores.documents.test_connection().await {
            tracing::error!(error = %e, "Store connection check failed");
            eprintln!("❌ Store connection check failed: {e}");
            return Ok(exit_code::CONNECTION_ERROR);
        }

        let records = Records::new(stores.documents, stores.blobs);
        api::serve(&config.server, records, shutdown_signal).await?;

        Ok(exit_code::SUCCESS)
    }
}
