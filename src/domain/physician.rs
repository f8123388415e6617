//! Physician records

use crate::domain::entity::{require, AddressOwner, Collection, Entity};
use crate::domain::errors::MedigramError;
use crate::domain::ids::{AddressId, PhysicianId};
use crate::domain::Result;
use mongodb::bson::{doc, DateTime, Document};
use serde::{Deserialize, Serialize};

/// Physician document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Physician {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PhysicianId>,
    pub name: String,
    pub specialization: String,
    pub license_number: String,
    pub address_id: AddressId,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Physician {
    /// Creates an unsaved physician stamped with the current time
    pub fn new(
        name: impl Into<String>,
        specialization: impl Into<String>,
        license_number: impl Into<String>,
        address_id: AddressId,
        avatar_url: Option<String>,
    ) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            name: name.into().trim().to_string(),
            specialization: specialization.into().trim().to_string(),
            license_number: license_number.into().trim().to_string(),
            address_id,
            avatar_url,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for Physician {
    const COLLECTION: Collection = Collection::Physicians;
    const KIND: &'static str = "Physician";

    fn validate(&self) -> Result<()> {
        require(Self::KIND, "name", &self.name)?;
        require(Self::KIND, "specialization", &self.specialization)?;
        require(Self::KIND, "licenseNumber", &self.license_number)?;
        Ok(())
    }
}

impl AddressOwner for Physician {
    fn address_id(&self) -> AddressId {
        self.address_id
    }

    fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }
}

/// Partial update accepted by `PUT /api/physicians/{id}`
///
/// Only profile fields may change; references, avatar and timestamps are
/// managed by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PhysicianUpdate {
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub license_number: Option<String>,
}

impl PhysicianUpdate {
    /// Builds the `$set` document, stamping `updatedAt`
    ///
    /// # Errors
    ///
    /// Returns a validation error if no field is supplied or a supplied
    /// field is blank.
    pub fn into_changes(self) -> Result<Document> {
        let mut changes = Document::new();
        for (field, value) in [
            ("name", self.name),
            ("specialization", self.specialization),
            ("licenseNumber", self.license_number),
        ] {
            if let Some(value) = value {
                require(Physician::KIND, field, &value)?;
                changes.insert(field, value.trim());
            }
        }

        if changes.is_empty() {
            return Err(MedigramError::Validation(
                "No updatable physician fields supplied".to_string(),
            ));
        }

        changes.extend(doc! { "updatedAt": DateTime::now() });
        Ok(changes)
    }
}
