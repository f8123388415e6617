//! Physician operations

use super::owners::Owners;
use crate::adapters::database::DocumentStore;
use crate::core::aggregation::composer;
use crate::core::avatars::{AvatarManager, AvatarUpload};
use crate::domain::{Address, MedigramError, Physician, PhysicianId, PhysicianUpdate, Result};
use mongodb::bson::Document;
use std::sync::Arc;

/// Input for creating a physician
#[derive(Debug, Clone)]
pub struct NewPhysician {
    pub name: String,
    pub specialization: String,
    pub license_number: String,
    pub address: Address,
    pub avatar: Option<AvatarUpload>,
}

#[derive(Clone)]
pub struct PhysicianService {
    store: Arc<dyn DocumentStore>,
    owners: Owners<Physician>,
}

impl PhysicianService {
    pub fn new(store: Arc<dyn DocumentStore>, avatars: AvatarManager) -> Self {
        Self {
            owners: Owners::new(Arc::clone(&store), avatars),
            store,
        }
    }

    pub async fn create(&self, new: NewPhysician) -> Result<PhysicianId> {
        let NewPhysician {
            name,
            specialization,
            license_number,
            address,
            avatar,
        } = new;

        let id = self
            .owners
            .create(address, avatar, |address_id, avatar_url| {
                Physician::new(
                    name.clone(),
                    specialization.clone(),
                    license_number.clone(),
                    address_id,
                    avatar_url,
                )
            })
            .await?;
        Ok(PhysicianId::from(id))
    }

    pub async fn list(&self) -> Result<Vec<Document>> {
        self.store.aggregate(&composer::physician_listing()).await
    }

    pub async fn detail(&self, id: PhysicianId) -> Result<Document> {
        self.store
            .aggregate(&composer::physician_detail(id))
            .await?
            .into_iter()
            .next()
            .ok_or(MedigramError::NotFound("Physician"))
    }

    /// Applies a profile update and stamps `updatedAt`
    ///
    /// # Errors
    ///
    /// Validation errors for an empty update come before the existence
    /// check, which yields `MedigramError::NotFound`.
    pub async fn update(&self, id: PhysicianId, update: PhysicianUpdate) -> Result<()> {
        let changes = update.into_changes()?;
        if !self.owners.repository().update(id, changes).await? {
            return Err(MedigramError::NotFound("Physician"));
        }
        tracing::info!(id = %id, "Physician updated");
        Ok(())
    }

    /// Deletes the physician, its avatar (best-effort) and its address
    ///
    /// Requisitions keep their `physicianId`; references are only checked
    /// when a requisition is created.
    pub async fn delete(&self, id: PhysicianId) -> Result<()> {
        self.owners.delete(id).await
    }
}
