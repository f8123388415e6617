//! Compensating actions for multi-document writes
//!
//! Creating an owner or a requisition touches several collections without a
//! transaction. Each completed write is recorded here; if a later step fails
//! the recorded writes are undone in reverse order. Undo failures are logged
//! and otherwise ignored.

use crate::adapters::database::DocumentStore;
use crate::core::avatars::{AvatarManager, CleanupOutcome};
use crate::domain::{BlobId, Collection};
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Undo {
    Document(Collection, ObjectId),
    Blob(BlobId),
}

/// Summary of a rollback
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RollbackReport {
    pub undone: usize,
    pub failed: usize,
}

/// Journal of writes made so far by one logical operation
pub struct Compensation {
    store: Arc<dyn DocumentStore>,
    avatars: AvatarManager,
    steps: Vec<Undo>,
}

impl Compensation {
    pub fn new(store: Arc<dyn DocumentStore>, avatars: AvatarManager) -> Self {
        Self {
            store,
            avatars,
            steps: Vec::new(),
        }
    }

    pub fn record_document(&mut self, collection: Collection, id: ObjectId) {
        self.steps.push(Undo::Document(collection, id));
    }

    pub fn record_blob(&mut self, id: BlobId) {
        self.steps.push(Undo::Blob(id));
    }

    /// Number of writes recorded
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Keeps every recorded write
    pub fn commit(mut self) {
        self.steps.clear();
    }

    /// Undoes every recorded write, newest first
    pub async fn rollback(mut self) -> RollbackReport {
        let mut report = RollbackReport::default();

        while let Some(step) = self.steps.pop() {
            let undone = match step {
                Undo::Document(collection, id) => {
                    match self.store.delete_by_id(collection, &id).await {
                        Ok(_) => true,
                        Err(e) => {
                            crate::log_cleanup_failure!(collection.name(), id, e);
                            false
                        }
                    }
                }
                Undo::Blob(id) => self.avatars.discard_blob(&id).await == CleanupOutcome::Removed,
            };

            if undone {
                report.undone += 1;
            } else {
                report.failed += 1;
            }
        }

        tracing::warn!(
            undone = report.undone,
            failed = report.failed,
            "Rolled back partial write"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::database::BlobStore;
    use crate::adapters::memory::MemoryStore;
    use mongodb::bson::doc;

    #[tokio::test]
    async fn test_rollback_removes_recorded_writes() {
        let store = Arc::new(MemoryStore::new());
        let avatars = AvatarManager::new(store.clone());
        let mut journal = Compensation::new(store.clone(), avatars);

        let blob = store.upload("a.jpg", &[1, 2]).await.unwrap();
        journal.record_blob(blob);
        let address = store
            .insert_one(Collection::Addresses, doc! { "city": "Toronto" })
            .await
            .unwrap();
        journal.record_document(Collection::Addresses, address);
        assert_eq!(journal.len(), 2);

        let report = journal.rollback().await;
        assert_eq!(report, RollbackReport { undone: 2, failed: 0 });
        assert_eq!(store.count(Collection::Addresses).await, 0);
        assert_eq!(store.blob_count().await, 0);
    }

    #[tokio::test]
    async fn test_commit_keeps_writes() {
        let store = Arc::new(MemoryStore::new());
        let mut journal = Compensation::new(store.clone(), AvatarManager::new(store.clone()));
        let id = store
            .insert_one(Collection::Tests, doc! { "name": "CBC" })
            .await
            .unwrap();
        journal.record_document(Collection::Tests, id);
        journal.commit();
        assert_eq!(store.count(Collection::Tests).await, 1);
    }

    #[tokio::test]
    async fn test_missing_blob_counts_as_failed() {
        let store = Arc::new(MemoryStore::new());
        let mut journal = Compensation::new(store.clone(), AvatarManager::new(store.clone()));
        journal.record_blob(BlobId::generate());
        let report = journal.rollback().await;
        assert_eq!(report.failed, 1);
    }
}
