//! Error types for the authorization system.
//!
//! # Security Note
//! Error messages must not leak policy details to callers. Detailed errors are
//! logged; callers only ever observe a deny.

use thiserror::Error;

/// Errors that can occur while building or evaluating authorization requests.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// Failed to parse the Cedar policy set.
    #[error("Policy parsing failed: {0}")]
    PolicyParse(String),

    /// Failed to create a Cedar entity from caller or resource data.
    #[error("Entity creation failed: {0}")]
    EntityCreation(String),

    /// Failed to build or evaluate an authorization request.
    #[error("Authorization evaluation failed: {0}")]
    EvaluationError(String),

    /// A role name that the board does not recognize.
    #[error("Unknown role: {0}")]
    UnknownRole(String),
}

/// A specialized Result type for authorization operations.
pub type Result<T> = std::result::Result<T, AuthzError>;
