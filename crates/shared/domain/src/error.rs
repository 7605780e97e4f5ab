//! Domain-level errors.
//!
//! These errors represent business rule violations and domain logic failures.
//! They are independent of infrastructure concerns (HTTP, database, message bus).

use std::error::Error as StdError;

use thiserror::Error;

/// Errors returned across the service boundary.
///
/// Client-caused variants are precise enough to pick a response status.
/// Infrastructure failures collapse into [`DomainError::Internal`]; the
/// cause is logged where the collapse happens and never carried further.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("user already exists")]
    UserAlreadyExists,

    #[error("user not found")]
    UserNotFound,

    #[error("incorrect credential")]
    IncorrectCredential,

    #[error("product not found")]
    ProductNotFound,

    #[error("permission denied")]
    PermissionDenied,

    #[error("internal error")]
    Internal,
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Failures reported by repository adapters.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// A unique constraint rejected the row
    #[error("duplicate key")]
    Duplicate,

    /// The requested row does not exist
    #[error("no data")]
    NotFound,

    /// Anything the service layer does not recognize
    #[error(transparent)]
    Other(Box<dyn StdError + Send + Sync>),
}

impl RepositoryError {
    pub fn other(err: impl StdError + Send + Sync + 'static) -> Self {
        RepositoryError::Other(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_keeps_the_cause_message() {
        let err = RepositoryError::other(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset",
        ));
        assert_eq!(err.to_string(), "connection reset");
    }
}
