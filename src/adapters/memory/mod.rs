//! In-memory adapter
//!
//! Implements both store traits over `tokio::sync::RwLock`-guarded maps and
//! evaluates aggregation pipelines in process.

mod evaluate;
pub mod store;

pub use store::MemoryStore;
