//! MongoDB adapter
//!
//! Collections go through the official driver; avatars live in a GridFS
//! bucket on the same database.

pub mod adapter;
pub mod client;

pub use adapter::MongoDbAdapter;
pub use client::MongoDbClient;
