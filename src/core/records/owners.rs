//! Shared create and delete flows for address owners
//!
//! Patients and physicians are both written as avatar, then address, then
//! owner, and deleted in the opposite direction.

use super::compensation::Compensation;
use super::repository::Repository;
use crate::adapters::database::DocumentStore;
use crate::core::avatars::{avatar_url, AvatarManager, AvatarUpload};
use crate::domain::{Address, AddressId, AddressOwner, Collection, Entity, MedigramError, Result};
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

/// Create and cascade-delete flows for one owner type
pub struct Owners<T> {
    store: Arc<dyn DocumentStore>,
    avatars: AvatarManager,
    owners: Repository<T>,
    addresses: Repository<Address>,
}

impl<T> Clone for Owners<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            avatars: self.avatars.clone(),
            owners: self.owners.clone(),
            addresses: self.addresses.clone(),
        }
    }
}

impl<T: AddressOwner> Owners<T> {
    pub fn new(store: Arc<dyn DocumentStore>, avatars: AvatarManager) -> Self {
        Self {
            owners: Repository::new(Arc::clone(&store)),
            addresses: Repository::new(Arc::clone(&store)),
            store,
            avatars,
        }
    }

    pub fn repository(&self) -> &Repository<T> {
        &self.owners
    }

    /// Stores the avatar, the address and then the owner built by `build`
    ///
    /// Both records are validated before anything is written. If a later
    /// write fails, earlier ones are rolled back.
    pub async fn create<F>(
        &self,
        address: Address,
        avatar: Option<AvatarUpload>,
        build: F,
    ) -> Result<ObjectId>
    where
        F: Fn(AddressId, Option<String>) -> T,
    {
        address.validate()?;
        build(AddressId::generate(), None).validate()?;

        let mut journal = Compensation::new(Arc::clone(&self.store), self.avatars.clone());
        let outcome = async {
            let avatar_path = match avatar {
                Some(upload) => {
                    let blob = self.avatars.upload(&upload).await?;
                    journal.record_blob(blob);
                    Some(avatar_url(&blob))
                }
                None => None,
            };

            let address_id = self.addresses.insert(&address).await?;
            journal.record_document(Collection::Addresses, address_id);

            let owner = build(AddressId::from(address_id), avatar_path);
            self.owners.insert(&owner).await
        }
        .await;

        match outcome {
            Ok(id) => {
                journal.commit();
                tracing::info!(kind = T::KIND, id = %id, "Record created");
                Ok(id)
            }
            Err(e) => {
                crate::log_error_with_context!(&e, "Record creation failed", kind = T::KIND);
                journal.rollback().await;
                Err(e)
            }
        }
    }

    /// Deletes the owner with its avatar (best-effort) and address
    ///
    /// # Errors
    ///
    /// Returns `MedigramError::NotFound` if no owner has this identifier.
    pub async fn delete(&self, id: impl Into<ObjectId>) -> Result<()> {
        let id = id.into();
        let owner = self
            .owners
            .find(id)
            .await?
            .ok_or(MedigramError::NotFound(T::KIND))?;

        let avatar = self.avatars.discard(owner.avatar_url()).await;

        if !self.addresses.delete(owner.address_id()).await? {
            tracing::warn!(
                kind = T::KIND,
                id = %id,
                address_id = %owner.address_id(),
                "Owner referenced a missing address"
            );
        }

        self.owners.delete(id).await?;
        tracing::info!(kind = T::KIND, id = %id, avatar = ?avatar, "Record deleted");
        Ok(())
    }
}
