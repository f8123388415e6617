//! Process-local document and blob store
//!
//! Backs `database_target = "memory"` and the HTTP tests. Collections keep
//! insertion order, so listings come back in creation order like a fresh
//! MongoDB collection scan.

use super::evaluate;
use crate::adapters::database::traits::{BlobStore, DocumentStore};
use crate::core::aggregation::Pipeline;
use crate::domain::{BlobId, Collection, Result, StoreError};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, DateTime, Document};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Bucket name reported by the in-memory blob store
pub const MEMORY_BUCKET: &str = "avatars";

#[derive(Debug, Clone)]
struct StoredBlob {
    filename: String,
    bytes: Vec<u8>,
    uploaded_at: DateTime,
}

/// In-memory implementation of both store traits
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
    blobs: RwLock<HashMap<ObjectId, StoredBlob>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently in `collection`
    pub async fn count(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map_or(0, Vec::len)
    }

    /// Number of stored blobs
    pub async fn blob_count(&self) -> usize {
        self.blobs.read().await.len()
    }

    /// Filename recorded for a blob at upload time
    pub async fn blob_filename(&self, id: &BlobId) -> Option<String> {
        self.blobs
            .read()
            .await
            .get(id.as_object_id())
            .map(|blob| blob.filename.clone())
    }
}

fn id_of(document: &Document) -> Option<ObjectId> {
    match document.get("_id") {
        Some(Bson::ObjectId(id)) => Some(*id),
        _ => None,
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    async fn insert_one(&self, collection: Collection, mut document: Document) -> Result<ObjectId> {
        let id = match document.get("_id") {
            None => {
                let id = ObjectId::new();
                document.insert("_id", id);
                id
            }
            Some(Bson::ObjectId(id)) => *id,
            Some(other) => {
                return Err(StoreError::InsertFailed {
                    collection: collection.name(),
                    message: format!("expected ObjectId _id, got {other}"),
                }
                .into())
            }
        };

        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection).or_default();
        if documents.iter().any(|doc| id_of(doc) == Some(id)) {
            return Err(StoreError::InsertFailed {
                collection: collection.name(),
                message: format!("duplicate key _id {id}"),
            }
            .into());
        }
        documents.push(document);
        Ok(id)
    }

    async fn find_by_id(&self, collection: Collection, id: &ObjectId) -> Result<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|doc| id_of(doc).as_ref() == Some(id)))
            .cloned())
    }

    async fn update_by_id(
        &self,
        collection: Collection,
        id: &ObjectId,
        changes: Document,
    ) -> Result<bool> {
        let mut collections = self.collections.write().await;
        let target = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|doc| id_of(doc).as_ref() == Some(id)));

        match target {
            Some(doc) => {
                for (key, value) in changes {
                    doc.insert(key, value);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_id(&self, collection: Collection, id: &ObjectId) -> Result<bool> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|doc| id_of(doc).as_ref() != Some(id));
        Ok(docs.len() < before)
    }

    async fn aggregate(&self, pipeline: &Pipeline) -> Result<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(evaluate::run(pipeline, &collections))
    }

    fn database_name(&self) -> &str {
        "memory"
    }
}

#[async_trait]
impl BlobStore for MemoryStore {
    async fn upload(&self, filename: &str, bytes: &[u8]) -> Result<BlobId> {
        let id = ObjectId::new();
        self.blobs.write().await.insert(
            id,
            StoredBlob {
                filename: filename.to_string(),
                bytes: bytes.to_vec(),
                uploaded_at: DateTime::now(),
            },
        );
        tracing::debug!(blob_id = %id, size = bytes.len(), "Blob stored in memory");
        Ok(BlobId::from(id))
    }

    async fn download(&self, id: &BlobId) -> Result<Vec<u8>> {
        self.blobs
            .read()
            .await
            .get(id.as_object_id())
            .map(|blob| blob.bytes.clone())
            .ok_or_else(|| StoreError::BlobNotFound(id.to_hex()).into())
    }

    async fn delete(&self, id: &BlobId) -> Result<()> {
        match self.blobs.write().await.remove(id.as_object_id()) {
            Some(blob) => {
                tracing::debug!(blob_id = %id, uploaded_at = %blob.uploaded_at, "Blob removed");
                Ok(())
            }
            None => Err(StoreError::BlobNotFound(id.to_hex()).into()),
        }
    }

    fn bucket_name(&self) -> &str {
        MEMORY_BUCKET
    }
}
