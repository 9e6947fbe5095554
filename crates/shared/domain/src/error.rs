//! Domain-level errors.
//!
//! These errors represent business rule violations and domain logic failures.
//! They are independent of infrastructure concerns (HTTP, database).

use thiserror::Error;

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed for a field or input
    #[error("{0}")]
    Validation(String),

    /// Password does not satisfy the password policy
    #[error("{0}")]
    PasswordPolicy(String),

    /// A business rule forbids the operation
    #[error("{0}")]
    BusinessRule(String),

    /// Internal domain error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    /// Create a password policy error
    pub fn password(msg: impl Into<String>) -> Self {
        DomainError::PasswordPolicy(msg.into())
    }

    /// Create a business rule error
    pub fn business_rule(msg: impl Into<String>) -> Self {
        DomainError::BusinessRule(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        DomainError::Internal(msg.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
