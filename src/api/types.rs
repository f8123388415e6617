//! Shared types for the HTTP layer

use serde::{Deserialize, Serialize};

use crate::core::records::Records;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppContext {
    pub records: Records,
}

impl AppContext {
    pub fn new(records: Records) -> Self {
        Self { records }
    }
}

/// Body of a `201 Created` response
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedResponse {
    pub id: String,
}

impl CreatedResponse {
    pub fn new(id: impl std::fmt::Display) -> Self {
        Self { id: id.to_string() }
    }
}

/// Confirmation message body
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `?id=` query accepted by the collection-level DELETE routes
#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

impl IdQuery {
    /// The id, if present and non-blank
    pub fn into_id(self) -> Option<String> {
        self.id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
    }
}
