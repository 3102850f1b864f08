//! Domain validation errors.

use thiserror::Error;

/// Errors raised when a value cannot be used as a [`Domain`](crate::Domain).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DomainError {
    /// The value is neither a string nor the local-domain sentinel.
    #[error("domain must be a string or false, got {kind}")]
    InvalidKind {
        /// Kind of the rejected value (e.g. `number`, `array`).
        kind: &'static str,
    },
}
