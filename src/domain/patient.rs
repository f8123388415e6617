//! Patient records

use crate::domain::entity::{require, AddressOwner, Collection, Entity};
use crate::domain::ids::{AddressId, PatientId};
use crate::domain::Result;
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

/// Patient document
///
/// The address lives in its own collection and is referenced by
/// `addressId`; requisitions point back at the patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PatientId>,
    pub name: String,
    pub address_id: AddressId,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Patient {
    /// Creates an unsaved patient stamped with the current time
    pub fn new(name: impl Into<String>, address_id: AddressId, avatar_url: Option<String>) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            name: name.into().trim().to_string(),
            address_id,
            avatar_url,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for Patient {
    const COLLECTION: Collection = Collection::Patients;
    const KIND: &'static str = "Patient";

    fn validate(&self) -> Result<()> {
        require(Self::KIND, "name", &self.name)
    }
}

impl AddressOwner for Patient {
    fn address_id(&self) -> AddressId {
        self.address_id
    }

    fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sets_matching_timestamps() {
        let patient = Patient::new("Jane Doe", AddressId::generate(), None);
        assert_eq!(patient.created_at, patient.updated_at);
        assert!(patient.id.is_none());
    }

    #[test]
    fn test_avatar_url_serializes_as_null_when_absent() {
        let patient = Patient::new("Jane Doe", AddressId::generate(), None);
        let doc = mongodb::bson::to_document(&patient).unwrap();
        assert!(doc.is_null("avatarUrl"));
        assert!(doc.get_object_id("addressId").is_ok());
    }

    #[test]
    fn test_validate_requires_name() {
        let patient = Patient::new("  ", AddressId::generate(), None);
        assert!(patient.validate().is_err());
    }
}
