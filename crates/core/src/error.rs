//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every operation in the workspace eventually reports one of these. The API
/// layer maps each variant to exactly one HTTP status.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed or missing input. Caller-fixable, never retried.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Missing, invalid or expired credential (or a subject that no longer exists).
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// Authenticated, but not the owner of the target resource.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The requested resource does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The operation would violate a uniqueness invariant.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Backing store failure (including deadline expiry).
    ///
    /// The message is for logs only; callers see an opaque internal failure.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self::Unauthenticated(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Stable, machine-readable code for this error class.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Validation(_) => "validation_error",
            DomainError::Unauthenticated(_) => "unauthenticated",
            DomainError::Forbidden(_) => "forbidden",
            DomainError::NotFound(_) => "not_found",
            DomainError::Conflict(_) => "conflict",
            DomainError::Storage(_) => "internal_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_resource() {
        assert_eq!(DomainError::not_found("event").to_string(), "event not found");
    }

    #[test]
    fn codes_are_distinct() {
        let all = [
            DomainError::validation("x"),
            DomainError::unauthenticated("x"),
            DomainError::forbidden("x"),
            DomainError::not_found("x"),
            DomainError::conflict("x"),
            DomainError::storage("x"),
        ];
        let mut codes: Vec<_> = all.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }
}
