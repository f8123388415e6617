//! Storage integrations for Medigram.
//!
//! This module provides adapters for the systems records and avatars live in:
//!
//! - [`database`] - Store abstraction layer (traits and factory)
//! - [`mongodb`] - MongoDB collections plus a GridFS avatar bucket
//! - [`memory`] - Process-local store for development and tests
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies and
//! enable testing without a database. Services only see
//! `Arc<dyn DocumentStore>` and `Arc<dyn BlobStore>`.
//!
//! ```rust,no_run
//! use medigram::adapters::database::create_stores;
//! use medigram::config::load_config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("medigram.toml")?;
//! let stores = create_stores(&config).await?;
//! stores.documents.test_connection().await?;
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod memory;
pub mod mongodb;
