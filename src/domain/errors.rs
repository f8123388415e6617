//! Domain error types
//!
//! This module defines the error hierarchy for Medigram. Errors are
//! domain-specific and don't expose driver types; adapters translate
//! MongoDB and GridFS failures into [`StoreError`] at the boundary.

use thiserror::Error;

/// Main Medigram error type
///
/// This is the primary error type used throughout the library. The HTTP
/// layer maps each variant onto a status code (see `api::error`).
#[derive(Debug, Error)]
pub enum MedigramError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Document or blob store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Client input failed validation (missing fields, empty arrays)
    #[error("Validation error: {0}")]
    Validation(String),

    /// An identifier could not be parsed as an ObjectId
    #[error("Invalid {kind} ID: {value}")]
    InvalidId { kind: &'static str, value: String },

    /// A referenced record does not exist; carries the record kind
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Store-specific errors
///
/// Raised by the document and blob store adapters.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to connect to the store
    #[error("Failed to connect to store: {0}")]
    ConnectionFailed(String),

    /// Failed to insert a document
    #[error("Failed to insert document into {collection}: {message}")]
    InsertFailed {
        collection: &'static str,
        message: String,
    },

    /// Failed to query or aggregate documents
    #[error("Failed to query {collection}: {message}")]
    QueryFailed {
        collection: &'static str,
        message: String,
    },

    /// Failed to update a document
    #[error("Failed to update document in {collection}: {message}")]
    UpdateFailed {
        collection: &'static str,
        message: String,
    },

    /// Failed to delete a document
    #[error("Failed to delete document from {collection}: {message}")]
    DeleteFailed {
        collection: &'static str,
        message: String,
    },

    /// Blob does not exist in the bucket
    #[error("Blob not found: {0}")]
    BlobNotFound(String),

    /// Failed to write a blob
    #[error("Failed to upload blob: {0}")]
    BlobUploadFailed(String),

    /// Failed to read a blob
    #[error("Failed to download blob: {0}")]
    BlobDownloadFailed(String),

    /// Failed to delete a blob
    #[error("Failed to delete blob: {0}")]
    BlobDeleteFailed(String),
}

impl From<std::io::Error> for MedigramError {
    fn from(err: std::io::Error) -> Self {
        MedigramError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for MedigramError {
    fn from(err: serde_json::Error) -> Self {
        MedigramError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for MedigramError {
    fn from(err: toml::de::Error) -> Self {
        MedigramError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<mongodb::bson::ser::Error> for MedigramError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        MedigramError::Serialization(err.to_string())
    }
}

impl From<mongodb::bson::de::Error> for MedigramError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        MedigramError::Serialization(err.to_string())
    }
}
