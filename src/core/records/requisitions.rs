//! Requisition creation
//!
//! One requisition and one lab test stub per requested test name, written
//! without a transaction and rolled back on partial failure.

use super::compensation::Compensation;
use super::repository::Repository;
use crate::adapters::database::DocumentStore;
use crate::core::avatars::AvatarManager;
use crate::domain::{
    Collection, LabTest, MedigramError, Patient, PatientId, Physician, PhysicianId, Requisition,
    RequisitionId, Result,
};
use std::sync::Arc;

/// Message returned when required requisition input is absent
pub const MISSING_REQUISITION_FIELDS: &str = "Missing required fields or empty arrays";

/// Input for creating a requisition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRequisition {
    pub patient_id: PatientId,
    pub physician_id: PhysicianId,
    pub test_names: Vec<String>,
    pub samples: Vec<String>,
}

impl NewRequisition {
    fn validate(&self) -> Result<()> {
        let blank = |values: &[String]| values.is_empty() || values.iter().any(|v| v.trim().is_empty());
        if blank(self.test_names.as_slice()) || blank(self.samples.as_slice()) {
            return Err(MedigramError::Validation(
                MISSING_REQUISITION_FIELDS.to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct RequisitionService {
    store: Arc<dyn DocumentStore>,
    avatars: AvatarManager,
    requisitions: Repository<Requisition>,
    tests: Repository<LabTest>,
    patients: Repository<Patient>,
    physicians: Repository<Physician>,
}

impl RequisitionService {
    pub fn new(store: Arc<dyn DocumentStore>, avatars: AvatarManager) -> Self {
        Self {
            requisitions: Repository::new(Arc::clone(&store)),
            tests: Repository::new(Arc::clone(&store)),
            patients: Repository::new(Arc::clone(&store)),
            physicians: Repository::new(Arc::clone(&store)),
            store,
            avatars,
        }
    }

    /// Creates a pending requisition and its test stubs
    ///
    /// Checks run in order: non-empty inputs, patient exists, physician
    /// exists. Nothing is written unless all pass.
    pub async fn create(&self, new: NewRequisition) -> Result<RequisitionId> {
        new.validate()?;

        if !self.patients.exists(new.patient_id).await? {
            return Err(MedigramError::NotFound("Patient"));
        }
        if !self.physicians.exists(new.physician_id).await? {
            return Err(MedigramError::NotFound("Physician"));
        }

        let mut journal = Compensation::new(Arc::clone(&self.store), self.avatars.clone());
        let outcome = async {
            let requisition = Requisition::pending(
                new.patient_id,
                new.physician_id,
                new.samples.iter().map(|s| s.trim().to_string()).collect(),
            );
            let requisition_id = RequisitionId::from(self.requisitions.insert(&requisition).await?);
            journal.record_document(Collection::Requisitions, requisition_id.into());

            for name in &new.test_names {
                let test = LabTest::stub(name.as_str(), requisition_id, new.patient_id);
                let test_id = self.tests.insert(&test).await?;
                journal.record_document(Collection::Tests, test_id);
            }
            Ok::<_, MedigramError>(requisition_id)
        }
        .await;

        match outcome {
            Ok(id) => {
                journal.commit();
                tracing::info!(
                    requisition_id = %id,
                    patient_id = %new.patient_id,
                    physician_id = %new.physician_id,
                    tests = new.test_names.len(),
                    "Requisition created"
                );
                Ok(id)
            }
            Err(e) => {
                crate::log_error_with_context!(&e, "Requisition creation failed");
                journal.rollback().await;
                Err(e)
            }
        }
    }
}
