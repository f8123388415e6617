//! Avatar blob lifecycle
//!
//! Avatars are uploaded with their owner, served by `GET /api/avatars/{id}`,
//! and discarded when the owner is deleted. The owner stores only the URL
//! path; the blob identifier is its trailing segment.

use crate::adapters::database::BlobStore;
use crate::domain::{BlobId, Result};
use std::sync::Arc;

/// Route prefix under which avatars are served
pub const AVATAR_ROUTE_PREFIX: &str = "/api/avatars/";

/// Content type sent with every avatar
pub const AVATAR_CONTENT_TYPE: &str = "image/jpeg";

/// Blob identifiers are never reused, so responses may be cached forever
pub const AVATAR_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Filename recorded when the client sends none
pub const DEFAULT_AVATAR_FILENAME: &str = "avatar";

/// An avatar file taken from a multipart form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarUpload {
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
}

impl AvatarUpload {
    pub fn new(filename: Option<String>, bytes: Vec<u8>) -> Self {
        Self { filename, bytes }
    }

    /// Filename to record, falling back to [`DEFAULT_AVATAR_FILENAME`]
    pub fn filename(&self) -> &str {
        self.filename
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_AVATAR_FILENAME)
    }
}

/// Path persisted on the owner for a stored avatar
pub fn avatar_url(id: &BlobId) -> String {
    format!("{AVATAR_ROUTE_PREFIX}{id}")
}

/// Extracts the blob identifier from a stored avatar path
///
/// # Errors
///
/// Returns `MedigramError::InvalidId` if the trailing segment is not an
/// ObjectId.
pub fn blob_id_from_url(url: &str) -> Result<BlobId> {
    let segment = url.trim_end_matches('/').rsplit('/').next().unwrap_or(url);
    BlobId::parse(segment)
}

/// Outcome of a best-effort avatar removal
///
/// Removal never fails the surrounding operation; the outcome exists for
/// logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// The blob was deleted
    Removed,
    /// The owner had no avatar
    Skipped,
    /// Deletion failed and was logged
    Failed,
}

/// Moves avatars between the HTTP boundary and the blob store
#[derive(Clone)]
pub struct AvatarManager {
    blobs: Arc<dyn BlobStore>,
}

impl AvatarManager {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }

    /// Stores the upload and returns its identifier once fully written
    pub async fn upload(&self, upload: &AvatarUpload) -> Result<BlobId> {
        let id = self.blobs.upload(upload.filename(), &upload.bytes).await?;
        tracing::info!(
            blob_id = %id,
            filename = upload.filename(),
            size = upload.bytes.len(),
            bucket = self.blobs.bucket_name(),
            "Avatar uploaded"
        );
        Ok(id)
    }

    /// Reads an avatar fully into memory
    pub async fn download(&self, id: &BlobId) -> Result<Vec<u8>> {
        self.blobs.download(id).await
    }

    /// Deletes the blob behind `avatar_url`, logging instead of failing
    pub async fn discard(&self, avatar_url: Option<&str>) -> CleanupOutcome {
        let Some(url) = avatar_url.filter(|u| !u.trim().is_empty()) else {
            return CleanupOutcome::Skipped;
        };

        let id = match blob_id_from_url(url) {
            Ok(id) => id,
            Err(e) => {
                crate::log_cleanup_failure!("avatar", url, e);
                return CleanupOutcome::Failed;
            }
        };

        self.discard_blob(&id).await
    }

    /// Deletes a blob by identifier, logging instead of failing
    pub async fn discard_blob(&self, id: &BlobId) -> CleanupOutcome {
        match self.blobs.delete(id).await {
            Ok(()) => {
                tracing::info!(blob_id = %id, "Avatar deleted");
                CleanupOutcome::Removed
            }
            Err(e) => {
                crate::log_cleanup_failure!("avatar", id, e);
                CleanupOutcome::Failed
            }
        }
    }
}
