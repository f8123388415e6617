//! Patient operations

use super::owners::Owners;
use crate::adapters::database::DocumentStore;
use crate::core::aggregation::composer;
use crate::core::avatars::{AvatarManager, AvatarUpload};
use crate::domain::{Address, MedigramError, Patient, PatientId, Result};
use mongodb::bson::Document;
use std::sync::Arc;

/// Input for creating a patient
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub name: String,
    pub address: Address,
    pub avatar: Option<AvatarUpload>,
}

#[derive(Clone)]
pub struct PatientService {
    store: Arc<dyn DocumentStore>,
    owners: Owners<Patient>,
}

impl PatientService {
    pub fn new(store: Arc<dyn DocumentStore>, avatars: AvatarManager) -> Self {
        Self {
            owners: Owners::new(Arc::clone(&store), avatars),
            store,
        }
    }

    pub async fn create(&self, new: NewPatient) -> Result<PatientId> {
        let name = new.name;
        let id = self
            .owners
            .create(new.address, new.avatar, |address_id, avatar_url| {
                Patient::new(name.clone(), address_id, avatar_url)
            })
            .await?;
        Ok(PatientId::from(id))
    }

    /// Every patient with requisitions, tests and address
    pub async fn list(&self) -> Result<Vec<Document>> {
        self.store.aggregate(&composer::patient_listing()).await
    }

    /// One patient with requisitions (each with its physician), tests and
    /// address
    pub async fn detail(&self, id: PatientId) -> Result<Document> {
        self.store
            .aggregate(&composer::patient_detail(id))
            .await?
            .into_iter()
            .next()
            .ok_or(MedigramError::NotFound("Patient"))
    }

    /// Deletes the patient, its avatar (best-effort) and its address
    pub async fn delete(&self, id: PatientId) -> Result<()> {
        self.owners.delete(id).await
    }
}
