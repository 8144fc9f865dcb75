use std::result::Result as StdResult;

use thiserror::Error;

use crate::domain::common::DbId;

/// Unified error type for domain/service/storage layers.
///
/// Every failing operation leaves the book untouched; variants carry the
/// entity id and state detail the caller needs to render a message or
/// re-fetch and retry.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("invalid transition for {entity} {id}: {from} -> {to}")]
    InvalidTransition {
        entity: &'static str,
        id: DbId,
        from: String,
        to: String,
    },
    #[error("missing evidence for {entity} {id}: {what}")]
    MissingEvidence {
        entity: &'static str,
        id: DbId,
        what: &'static str,
    },
    #[error("missing proof for payment on schedule entry {entry_id}: {what}")]
    MissingProof { entry_id: DbId, what: &'static str },
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: DbId },
    #[error("external service failure ({service}): {message}")]
    ExternalService {
        service: &'static str,
        message: String,
    },
    #[error("persistence error: {0}")]
    Storage(String),
}

pub type Result<T> = StdResult<T, CoreError>;

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Storage(err.to_string())
    }
}
