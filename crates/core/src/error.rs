//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Only deterministic, in-memory failures live here. Absence of a record is
/// usually modelled with `Option` instead; `NotFound` is for callers that need
/// to turn absence into an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An aggregate operation (max, min, ...) was asked of an empty collection.
    #[error("empty collection: {0}")]
    EmptyCollection(String),

    /// A requested record was not found.
    #[error("not found: {0}")]
    NotFound(String),
}

impl DomainError {
    pub fn empty_collection(msg: impl Into<String>) -> Self {
        Self::EmptyCollection(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}
