//! Store factory
//!
//! Creates the document and blob stores selected by `database_target`.

use crate::adapters::database::traits::{BlobStore, DocumentStore};
use crate::adapters::memory::MemoryStore;
use crate::adapters::mongodb::{MongoDbAdapter, MongoDbClient};
use crate::config::schema::{DatabaseTarget, MedigramConfig};
use crate::domain::{MedigramError, Result};
use std::sync::Arc;

/// Document and blob stores sharing one underlying client
pub struct Stores {
    pub documents: Arc<dyn DocumentStore>,
    pub blobs: Arc<dyn BlobStore>,
}

/// Create both stores based on the configuration
///
/// For MongoDB, both traits are served by one adapter so they share a
/// connection pool.
///
/// # Errors
///
/// Returns an error if the MongoDB section is missing or the client cannot
/// be created.
pub async fn create_stores(config: &MedigramConfig) -> Result<Stores> {
    match config.database_target {
        DatabaseTarget::MongoDb => {
            let mongo_config = config.mongodb.as_ref().ok_or_else(|| {
                MedigramError::Configuration(
                    "mongodb section is required when database_target = 'mongodb'".to_string(),
                )
            })?;

            tracing::info!(
                database = %mongo_config.database_name,
                bucket = %mongo_config.avatar_bucket,
                "Creating MongoDB stores"
            );
            let client = MongoDbClient::new(mongo_config.clone()).await?;
            let adapter = Arc::new(MongoDbAdapter::new(client));

            Ok(Stores {
                documents: adapter.clone(),
                blobs: adapter,
            })
        }
        DatabaseTarget::Memory => {
            tracing::warn!("Using in-memory stores; data is lost on exit");
            let store = Arc::new(MemoryStore::new());

            Ok(Stores {
                documents: store.clone(),
                blobs: store,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_target_creates_shared_store() {
        let config = MedigramConfig::default();
        let stores = create_stores(&config).await.unwrap();
        assert_eq!(stores.documents.database_name(), "memory");
        assert_eq!(stores.blobs.bucket_name(), "avatars");
    }

    #[tokio::test]
    async fn test_mongodb_target_without_section_fails() {
        let config = MedigramConfig {
            database_target: DatabaseTarget::MongoDb,
            ..Default::default()
        };
        assert!(create_stores(&config).await.is_err());
    }
}
