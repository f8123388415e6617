//! Record services
//!
//! - [`repository`] - Typed CRUD over one collection
//! - [`owners`] - Create/cascade-delete shared by patients and physicians
//! - [`compensation`] - Rollback journal for multi-document writes
//! - [`patients`], [`physicians`], [`requisitions`] - Per-resource operations

pub mod compensation;
pub mod owners;
pub mod patients;
pub mod physicians;
pub mod repository;
pub mod requisitions;

pub use compensation::{Compensation, RollbackReport};
pub use patients::{NewPatient, PatientService};
pub use physicians::{NewPhysician, PhysicianService};
pub use repository::Repository;
pub use requisitions::{NewRequisition, RequisitionService};

use crate::adapters::database::{BlobStore, DocumentStore};
use crate::core::avatars::AvatarManager;
use crate::domain::Result;
use std::sync::Arc;

/// All record services, built once over the injected stores
#[derive(Clone)]
pub struct Records {
    store: Arc<dyn DocumentStore>,
    pub patients: PatientService,
    pub physicians: PhysicianService,
    pub requisitions: RequisitionService,
    pub avatars: AvatarManager,
}

impl Records {
    pub fn new(store: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>) -> Self {
        let avatars = AvatarManager::new(blobs);
        Self {
            patients: PatientService::new(Arc::clone(&store), avatars.clone()),
            physicians: PhysicianService::new(Arc::clone(&store), avatars.clone()),
            requisitions: RequisitionService::new(Arc::clone(&store), avatars.clone()),
            avatars,
            store,
        }
    }

    /// Pings the document store
    pub async fn check_health(&self) -> Result<()> {
        self.store.test_connection().await
    }

    pub fn database_name(&self) -> &str {
        self.store.database_name()
    }
}
