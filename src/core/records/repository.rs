//! Typed repository over the document store

use crate::adapters::database::DocumentStore;
use crate::domain::{Entity, Result};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, Document};
use std::marker::PhantomData;
use std::sync::Arc;

/// CRUD access to the collection of one [`Entity`] type
///
/// Records are validated before every insert and (de)serialized with the
/// camelCase field names used on the wire.
pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// Validates and inserts `record`, returning the generated `_id`
    pub async fn insert(&self, record: &T) -> Result<ObjectId> {
        record.validate()?;
        let document = bson::to_document(record)?;
        let id = self.store.insert_one(T::COLLECTION, document).await?;
        tracing::debug!(collection = %T::COLLECTION, id = %id, "Inserted {}", T::KIND);
        Ok(id)
    }

    pub async fn find(&self, id: impl Into<ObjectId>) -> Result<Option<T>> {
        let id = id.into();
        match self.store.find_by_id(T::COLLECTION, &id).await? {
            Some(document) => Ok(Some(bson::from_document(document)?)),
            None => Ok(None),
        }
    }

    pub async fn exists(&self, id: impl Into<ObjectId>) -> Result<bool> {
        let id = id.into();
        Ok(self.store.find_by_id(T::COLLECTION, &id).await?.is_some())
    }

    /// Applies a `$set` document; returns whether a record matched
    pub async fn update(&self, id: impl Into<ObjectId>, changes: Document) -> Result<bool> {
        let id = id.into();
        self.store.update_by_id(T::COLLECTION, &id, changes).await
    }

    /// Deletes by `_id`; returns whether a record was removed
    pub async fn delete(&self, id: impl Into<ObjectId>) -> Result<bool> {
        let id = id.into();
        self.store.delete_by_id(T::COLLECTION, &id).await
    }
}
