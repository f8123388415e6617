//! Core business logic for Medigram.
//!
//! # Modules
//!
//! - [`aggregation`] - Typed pipelines and the patient/physician read views
//! - [`avatars`] - Avatar upload, download and best-effort removal
//! - [`records`] - Repositories and the patient, physician and requisition
//!   services
//!
//! # Example
//!
//! ```rust,no_run
//! use medigram::adapters::memory::MemoryStore;
//! use medigram::core::records::Records;
//! use std::sync::Arc;
//!
//! # async fn example() -> medigram::domain::Result<()> {
//! let store = Arc::new(MemoryStore::new());
//! let records = Records::new(store.clone(), store);
//!
//! let patients = records.patients.list().await?;
//! println!("{} patients", patients.len());
//! # Ok(())
//! # }
//! ```

pub mod aggregation;
pub mod avatars;
pub mod records;
