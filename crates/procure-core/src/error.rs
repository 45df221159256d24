//! Procurement error types.

use thiserror::Error;

use crate::draft::DraftField;

/// Errors that can occur while editing or validating an item draft.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcureError {
    /// Quantity is not a positive whole number.
    #[error("Invalid quantity: {0:?}")]
    InvalidQuantity(String),

    /// Timeline is not an ISO date.
    #[error("Invalid date (expected YYYY-MM-DD): {0:?}")]
    InvalidDate(String),

    /// No draft field has this name.
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Required fields are empty.
    #[error("Missing required fields: {}", join_labels(.0))]
    MissingFields(Vec<DraftField>),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

fn join_labels(fields: &[DraftField]) -> String {
    fields
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<serde_json::Error> for ProcureError {
    fn from(e: serde_json::Error) -> Self {
        ProcureError::SerializationError(e.to_string())
    }
}
