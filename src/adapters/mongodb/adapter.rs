//! MongoDB adapter implementing the store traits
//!
//! Driver errors are translated into [`StoreError`] here so nothing above
//! the adapter layer sees `mongodb::error::Error`.

use crate::adapters::database::traits::{BlobStore, DocumentStore};
use crate::adapters::mongodb::client::MongoDbClient;
use crate::core::aggregation::Pipeline;
use crate::domain::{BlobId, Collection, Result, StoreError};
use async_trait::async_trait;
use futures::io::{AsyncReadExt, AsyncWriteExt};
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Bson, Document};
use mongodb::error::{ErrorKind, GridFsErrorKind};
use std::sync::Arc;

/// MongoDB implementation of the store traits
pub struct MongoDbAdapter {
    client: Arc<MongoDbClient>,
}

impl MongoDbAdapter {
    pub fn new(client: MongoDbClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

fn is_file_not_found(error: &mongodb::error::Error) -> bool {
    matches!(
        *error.kind,
        ErrorKind::GridFs(GridFsErrorKind::FileNotFound { .. })
    )
}

#[async_trait]
impl DocumentStore for MongoDbAdapter {
    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn insert_one(&self, collection: Collection, document: Document) -> Result<ObjectId> {
        let result = self
            .client
            .collection(collection)
            .insert_one(document)
            .await
            .map_err(|e| StoreError::InsertFailed {
                collection: collection.name(),
                message: e.to_string(),
            })?;

        match result.inserted_id {
            Bson::ObjectId(id) => Ok(id),
            other => Err(StoreError::InsertFailed {
                collection: collection.name(),
                message: format!("expected ObjectId _id, got {other}"),
            }
            .into()),
        }
    }

    async fn find_by_id(&self, collection: Collection, id: &ObjectId) -> Result<Option<Document>> {
        let found = self
            .client
            .collection(collection)
            .find_one(doc! { "_id": *id })
            .await
            .map_err(|e| StoreError::QueryFailed {
                collection: collection.name(),
                message: e.to_string(),
            })?;
        Ok(found)
    }

    async fn update_by_id(
        &self,
        collection: Collection,
        id: &ObjectId,
        changes: Document,
    ) -> Result<bool> {
        let result = self
            .client
            .collection(collection)
            .update_one(doc! { "_id": *id }, doc! { "$set": changes })
            .await
            .map_err(|e| StoreError::UpdateFailed {
                collection: collection.name(),
                message: e.to_string(),
            })?;
        Ok(result.matched_count > 0)
    }

    async fn delete_by_id(&self, collection: Collection, id: &ObjectId) -> Result<bool> {
        let result = self
            .client
            .collection(collection)
            .delete_one(doc! { "_id": *id })
            .await
            .map_err(|e| StoreError::DeleteFailed {
                collection: collection.name(),
                message: e.to_string(),
            })?;
        Ok(result.deleted_count > 0)
    }

    async fn aggregate(&self, pipeline: &Pipeline) -> Result<Vec<Document>> {
        let collection = pipeline.root();
        let query_failed = |e: mongodb::error::Error| StoreError::QueryFailed {
            collection: collection.name(),
            message: e.to_string(),
        };

        let cursor = self
            .client
            .collection(collection)
            .aggregate(pipeline.to_documents())
            .await
            .map_err(query_failed)?;

        let documents: Vec<Document> = cursor.try_collect().await.map_err(query_failed)?;

        tracing::debug!(
            collection = %collection,
            stages = pipeline.stages().len(),
            results = documents.len(),
            "Aggregation completed"
        );
        Ok(documents)
    }

    fn database_name(&self) -> &str {
        self.client.database_name()
    }
}

#[async_trait]
impl BlobStore for MongoDbAdapter {
    async fn upload(&self, filename: &str, bytes: &[u8]) -> Result<BlobId> {
        let mut stream = self
            .client
            .bucket()
            .open_upload_stream(filename)
            .await
            .map_err(|e| StoreError::BlobUploadFailed(e.to_string()))?;

        let id = match stream.id() {
            Bson::ObjectId(id) => BlobId::from(*id),
            other => {
                return Err(StoreError::BlobUploadFailed(format!(
                    "expected ObjectId file id, got {other}"
                ))
                .into())
            }
        };

        if let Err(e) = stream.write_all(bytes).await {
            if let Err(abort_error) = stream.abort().await {
                tracing::warn!(blob_id = %id, error = %abort_error, "Failed to abort upload");
            }
            return Err(StoreError::BlobUploadFailed(e.to_string()).into());
        }

        stream
            .close()
            .await
            .map_err(|e| StoreError::BlobUploadFailed(e.to_string()))?;

        tracing::debug!(blob_id = %id, size = bytes.len(), "Blob uploaded");
        Ok(id)
    }

    async fn download(&self, id: &BlobId) -> Result<Vec<u8>> {
        let mut stream = self
            .client
            .bucket()
            .open_download_stream(Bson::ObjectId(*id.as_object_id()))
            .await
            .map_err(|e| {
                if is_file_not_found(&e) {
                    StoreError::BlobNotFound(id.to_hex())
                } else {
                    StoreError::BlobDownloadFailed(e.to_string())
                }
            })?;

        let mut bytes = Vec::new();
        stream
            .read_to_end(&mut bytes)
            .await
            .map_err(|e| StoreError::BlobDownloadFailed(e.to_string()))?;
        Ok(bytes)
    }

    async fn delete(&self, id: &BlobId) -> Result<()> {
        self.client
            .bucket()
            .delete(Bson::ObjectId(*id.as_object_id()))
            .await
            .map_err(|e| {
                if is_file_not_found(&e) {
                    StoreError::BlobNotFound(id.to_hex())
                } else {
                    StoreError::BlobDeleteFailed(e.to_string())
                }
            })?;
        Ok(())
    }

    fn bucket_name(&self) -> &str {
        self.client.bucket_name()
    }
}
