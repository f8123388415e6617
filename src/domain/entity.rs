//! Collections and the entity contract
//!
//! Every persisted record type implements [`Entity`], which names its
//! collection and checks required fields before a write, the way an ODM
//! schema would.

use crate::domain::errors::MedigramError;
use crate::domain::ids::AddressId;
use crate::domain::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// Document collections used by Medigram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Patients,
    Physicians,
    Addresses,
    Requisitions,
    Tests,
}

impl Collection {
    /// All collections, in creation order
    pub const ALL: [Collection; 5] = [
        Collection::Addresses,
        Collection::Patients,
        Collection::Physicians,
        Collection::Requisitions,
        Collection::Tests,
    ];

    /// Collection name in the database
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Patients => "patients",
            Collection::Physicians => "physicians",
            Collection::Addresses => "addresses",
            Collection::Requisitions => "requisitions",
            Collection::Tests => "tests",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A record type stored in one collection
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection holding this record type
    const COLLECTION: Collection;

    /// Human-readable kind, used in "not found" messages
    const KIND: &'static str;

    /// Checks required fields before the record is written
    ///
    /// # Errors
    ///
    /// Returns [`MedigramError::Validation`] naming the first missing field.
    fn validate(&self) -> Result<()>;
}

/// A record that owns an address and may carry an avatar
///
/// Deleting an owner cascades to its address and avatar blob.
pub trait AddressOwner: Entity {
    fn address_id(&self) -> AddressId;

    fn avatar_url(&self) -> Option<&str>;
}

/// Fails with a validation error when `value` is blank
pub(crate) fn require(kind: &str, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MedigramError::Validation(format!(
            "{kind}.{field} is required"
        )));
    }
    Ok(())
}
