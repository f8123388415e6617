//! Aggregation composer
//!
//! - [`pipeline`] - Typed `Stage`/`Pipeline` values and their BSON rendering
//! - [`composer`] - The patient and physician read views
//! - [`render`] - Conversion of result documents to JSON

pub mod composer;
pub mod pipeline;
pub mod render;

pub use pipeline::{Pipeline, Stage};
pub use render::{document_to_json, documents_to_json};
