//! Store abstraction traits
//!
//! This module defines the traits that storage backends must implement to
//! back Medigram: a document store for the five collections and a blob
//! store for avatar images.

use crate::core::aggregation::Pipeline;
use crate::domain::{BlobId, Collection, Result};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::Document;

/// Document store trait
///
/// Documents are plain BSON; typed access goes through
/// `core::records::Repository`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Test the store connection
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    async fn test_connection(&self) -> Result<()>;

    /// Insert a document, returning its `_id`
    ///
    /// A document without `_id` receives a freshly generated one.
    async fn insert_one(&self, collection: Collection, document: Document) -> Result<ObjectId>;

    /// Fetch a document by `_id`
    ///
    /// # Returns
    ///
    /// Returns `Ok(None)` if no document has that identifier.
    async fn find_by_id(&self, collection: Collection, id: &ObjectId) -> Result<Option<Document>>;

    /// Apply `$set` with `changes` to the document with this `_id`
    ///
    /// # Returns
    ///
    /// Returns `true` if a document matched.
    async fn update_by_id(
        &self,
        collection: Collection,
        id: &ObjectId,
        changes: Document,
    ) -> Result<bool>;

    /// Delete the document with this `_id`
    ///
    /// # Returns
    ///
    /// Returns `true` if a document was deleted.
    async fn delete_by_id(&self, collection: Collection, id: &ObjectId) -> Result<bool>;

    /// Run an aggregation pipeline against its root collection
    ///
    /// # Errors
    ///
    /// Store failures surface as an error; there is no partial result.
    async fn aggregate(&self, pipeline: &Pipeline) -> Result<Vec<Document>>;

    /// Get the database name
    fn database_name(&self) -> &str;
}

/// Blob store trait for avatar images
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write `bytes` under a freshly generated identifier
    ///
    /// Completes only once the blob is fully stored.
    async fn upload(&self, filename: &str, bytes: &[u8]) -> Result<BlobId>;

    /// Read a blob fully into memory
    ///
    /// # Errors
    ///
    /// Returns `StoreError::BlobNotFound` for an unknown identifier.
    async fn download(&self, id: &BlobId) -> Result<Vec<u8>>;

    /// Remove a blob and its metadata
    async fn delete(&self, id: &BlobId) -> Result<()>;

    /// Get the bucket name
    fn bucket_name(&self) -> &str;
}
