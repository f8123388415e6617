//! Domain models and types for Medigram.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`PatientId`], [`PhysicianId`], [`BlobId`], ...)
//! - **Records** ([`Patient`], [`Physician`], [`Address`], [`Requisition`], [`LabTest`])
//! - **The entity contract** ([`Entity`], [`AddressOwner`], [`Collection`])
//! - **Error types** ([`MedigramError`], [`StoreError`]) and the [`Result`] alias
//!
//! # Type Safety
//!
//! Identifiers are newtypes over ObjectId, so a physician ID can't be passed
//! where a patient ID is expected:
//!
//! ```rust
//! use medigram::domain::{PatientId, PhysicianId};
//!
//! # fn example() -> medigram::domain::Result<()> {
//! let patient_id = PatientId::parse("65f1a2b3c4d5e6f708192a3b")?;
//! let physician_id = PhysicianId::parse("65f1a2b3c4d5e6f708192a3c")?;
//!
//! // let wrong: PatientId = physician_id;  // Compile error!
//! # let _ = (patient_id, physician_id);
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod entity;
pub mod errors;
pub mod ids;
pub mod patient;
pub mod physician;
pub mod requisition;
pub mod result;

pub use address::Address;
pub use entity::{AddressOwner, Collection, Entity};
pub use errors::{MedigramError, StoreError};
pub use ids::{AddressId, BlobId, LabTestId, PatientId, PhysicianId, RequisitionId};
pub use patient::Patient;
pub use physician::{Physician, PhysicianUpdate};
pub use requisition::{LabTest, Requisition, RequisitionStatus};
pub use result::Result;
