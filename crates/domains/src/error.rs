//! # DomainError
//!
//! Centralized error handling for the campus-admin workspace.
//! Maps store and workflow failures to actionable error types.

use thiserror::Error;

/// The primary error type for all domain operations.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Referenced document absent (e.g. College, Programme)
    #[error("{0} not found with id {1}")]
    NotFound(&'static str, String),

    /// Malformed input (e.g. a non-image blob in an upload batch)
    #[error("validation error: {0}")]
    Validation(String),

    /// Login email already registered in the auth service
    #[error("identity conflict: {0}")]
    IdentityConflict(String),

    /// Underlying document/auth/object store call failed
    #[error("dependency failure: {0}")]
    Dependency(String),
}

impl DomainError {
    /// Wraps an infrastructure failure from an underlying store call.
    pub fn dependency(err: impl std::fmt::Display) -> Self {
        Self::Dependency(err.to_string())
    }
}

/// A specialized Result type for campus-admin logic.
pub type Result<T> = std::result::Result<T, DomainError>;
