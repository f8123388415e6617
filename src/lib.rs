// Medigram - Patient Records Service
// Copyright (c) 2025 Medigram Contributors
// Licensed under the MIT License

//! # Medigram - Patient Records Service
//!
//! Medigram is an HTTP service for patients, physicians, their addresses,
//! lab requisitions and test stubs, with avatar images kept in a blob store.
//!
//! ## Overview
//!
//! - **Records**: create, list, fetch and cascade-delete patients and
//!   physicians; update physicians; create requisitions with their tests
//! - **Aggregated views**: joined listing and detail documents built from
//!   one typed pipeline description, run by MongoDB or evaluated in memory
//! - **Avatars**: upload, download and best-effort cleanup of image blobs
//!   (MongoDB GridFS in production)
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface (`serve`, `validate-config`, `init`)
//! - [`api`] - axum router, handlers and HTTP error mapping
//! - [`core`] - Record services, aggregation pipelines, avatar lifecycle
//! - [`adapters`] - Store traits with MongoDB and in-memory backends
//! - [`domain`] - Entities, identifiers and errors
//! - [`config`] - TOML configuration with environment overrides
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use medigram::adapters::database::create_stores;
//! use medigram::config::load_config;
//! use medigram::core::records::Records;
//! use tokio::sync::watch;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("medigram.toml")?;
//!     let stores = create_stores(&config).await?;
//!     let records = Records::new(stores.documents, stores.blobs);
//!
//!     let (_shutdown_tx, shutdown_rx) = watch::channel(false);
//!     medigram::api::serve(&config.server, records, shutdown_rx).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library code returns [`domain::Result`] with [`domain::MedigramError`];
//! the HTTP layer maps it onto status codes through [`api::ApiError`].

pub mod adapters;
pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
