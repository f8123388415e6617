//! HTTP API
//!
//! axum router over the record services. Handlers take
//! `State<AppContext>` and return `Result<_, ApiError>`; every error
//! renders as `{ "error": ..., "details"?: ... }`.

pub mod endpoints;
pub mod error;
pub mod form;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::api_router;
pub use server::serve;
pub use types::AppContext;
