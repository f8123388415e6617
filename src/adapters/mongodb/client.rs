//! MongoDB client implementation
//!
//! Wraps the driver's `Client`, the configured database and the GridFS
//! bucket holding avatars.

use crate::config::redact_connection_string;
use crate::config::schema::MongoDbConfig;
use crate::domain::{Collection, MedigramError, Result, StoreError};
use mongodb::bson::{doc, Document};
use mongodb::gridfs::GridFsBucket;
use mongodb::options::{ClientOptions, GridFsBucketOptions};
use mongodb::{Client, Database};
use secrecy::ExposeSecret;
use std::time::Duration;

/// MongoDB client for Medigram
///
/// The driver pools connections internally, so one instance is created at
/// startup and shared.
pub struct MongoDbClient {
    database: Database,
    bucket: GridFsBucket,
    config: MongoDbConfig,
}

impl MongoDbClient {
    /// Create a new MongoDB client
    ///
    /// Parses the connection string and builds the client; no server round
    /// trip happens until the first operation or [`Self::test_connection`].
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string is invalid.
    pub async fn new(config: MongoDbConfig) -> Result<Self> {
        let connection_string = config.connection_string.expose_secret();

        let mut options = ClientOptions::parse(connection_string.as_ref())
            .await
            .map_err(|e| {
                MedigramError::Configuration(format!(
                    "Invalid MongoDB connection string {}: {}",
                    redact_connection_string(connection_string),
                    e
                ))
            })?;

        let timeout = Duration::from_secs(config.connect_timeout_seconds);
        options.app_name = Some(config.app_name.clone());
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);

        let client = Client::with_options(options)
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        let database = client.database(&config.database_name);
        let bucket = database.gridfs_bucket(
            GridFsBucketOptions::builder()
                .bucket_name(config.avatar_bucket.clone())
                .build(),
        );

        tracing::info!(
            uri = %redact_connection_string(connection_string),
            database = %config.database_name,
            "MongoDB client created"
        );

        Ok(Self {
            database,
            bucket,
            config,
        })
    }

    /// Test the connection with a `ping` command
    pub async fn test_connection(&self) -> Result<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        tracing::debug!("MongoDB connection test successful");
        Ok(())
    }

    /// Untyped handle on one of the Medigram collections
    pub fn collection(&self, collection: Collection) -> mongodb::Collection<Document> {
        self.database.collection::<Document>(collection.name())
    }

    pub fn bucket(&self) -> &GridFsBucket {
        &self.bucket
    }

    pub fn database_name(&self) -> &str {
        &self.config.database_name
    }

    pub fn bucket_name(&self) -> &str {
        &self.config.avatar_bucket
    }
}
