//! Domain identifier types
//!
//! Every record is keyed by a store-generated ObjectId. The newtypes below
//! keep patient, physician, requisition, address and blob identifiers from
//! being mixed up, and centralise parsing of the 24-hex-digit wire form.

use crate::domain::errors::MedigramError;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(ObjectId);

        impl $name {
            /// Record kind used in error messages
            pub const KIND: &'static str = $kind;

            /// Generates a fresh identifier
            pub fn generate() -> Self {
                Self(ObjectId::new())
            }

            /// Parses the 24-hex-digit form, rejecting anything else
            pub fn parse(value: &str) -> Result<Self, MedigramError> {
                ObjectId::parse_str(value.trim())
                    .map(Self)
                    .map_err(|_| MedigramError::InvalidId {
                        kind: $kind,
                        value: value.to_string(),
                    })
            }

            /// Returns the underlying ObjectId
            pub fn as_object_id(&self) -> &ObjectId {
                &self.0
            }

            /// Returns the lowercase hex form
            pub fn to_hex(&self) -> String {
                self.0.to_hex()
            }
        }

        impl From<ObjectId> for $name {
            fn from(id: ObjectId) -> Self {
                Self(id)
            }
        }

        impl From<$name> for ObjectId {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0.to_hex())
            }
        }

        impl FromStr for $name {
            type Err = MedigramError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

record_id!(
    /// Patient document identifier
    PatientId,
    "patient"
);

record_id!(
    /// Physician document identifier
    PhysicianId,
    "physician"
);

record_id!(
    /// Address document identifier
    AddressId,
    "address"
);

record_id!(
    /// Requisition document identifier
    RequisitionId,
    "requisition"
);

record_id!(
    /// Lab test document identifier
    LabTestId,
    "test"
);

record_id!(
    /// Avatar blob identifier inside the GridFS bucket
    BlobId,
    "avatar"
);
