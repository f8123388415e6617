//! Requisitions and the lab tests ordered on them

use crate::domain::entity::{require, Collection, Entity};
use crate::domain::ids::{LabTestId, PatientId, PhysicianId, RequisitionId};
use crate::domain::Result;
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Requisition processing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RequisitionStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl fmt::Display for RequisitionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RequisitionStatus::Pending => "Pending",
            RequisitionStatus::Completed => "Completed",
            RequisitionStatus::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}

/// Requisition document linking a patient, a physician and sample references
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requisition {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RequisitionId>,
    pub patient_id: PatientId,
    pub physician_id: PhysicianId,
    pub date_submitted: DateTime,
    pub status: RequisitionStatus,
    #[serde(default)]
    pub samples: Vec<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Requisition {
    /// Creates a pending requisition submitted now
    pub fn pending(patient_id: PatientId, physician_id: PhysicianId, samples: Vec<String>) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            patient_id,
            physician_id,
            date_submitted: now,
            status: RequisitionStatus::Pending,
            samples,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for Requisition {
    const COLLECTION: Collection = Collection::Requisitions;
    const KIND: &'static str = "Requisition";

    fn validate(&self) -> Result<()> {
        for sample in &self.samples {
            require(Self::KIND, "samples[]", sample)?;
        }
        Ok(())
    }
}

/// Lab test stub created alongside a requisition
///
/// `patientId` is denormalized from the requisition so tests can be joined
/// to patients directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabTest {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<LabTestId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub requisition_id: RequisitionId,
    pub patient_id: PatientId,
}

impl LabTest {
    /// Creates a test stub with only a name
    pub fn stub(name: impl Into<String>, requisition_id: RequisitionId, patient_id: PatientId) -> Self {
        Self {
            id: None,
            name: name.into().trim().to_string(),
            description: None,
            normal_range: None,
            unit: None,
            requisition_id,
            patient_id,
        }
    }
}

impl Entity for LabTest {
    const COLLECTION: Collection = Collection::Tests;
    const KIND: &'static str = "Test";

    fn validate(&self) -> Result<()> {
        require(Self::KIND, "name", &self.name)
    }
}
