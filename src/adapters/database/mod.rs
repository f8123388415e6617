//! Store abstraction layer
//!
//! This module provides a trait-based abstraction over document and blob
//! storage, allowing Medigram to run against MongoDB or the in-memory store.

pub mod factory;
pub mod traits;

pub use factory::{create_stores, Stores};
pub use traits::{BlobStore, DocumentStore};
