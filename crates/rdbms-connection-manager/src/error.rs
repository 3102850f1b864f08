//! Connection manager error types.
//!
//! These cover configuration only. Failures to acquire a connection come
//! from the load balancer and are returned as its own error type.

use rdbms_balancer::DomainError;
use thiserror::Error;

/// Errors raised while configuring a connection manager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// The domain is neither a string nor the local sentinel.
    #[error("invalid domain: {0}")]
    InvalidDomain(#[from] DomainError),

    /// Malformed configuration input.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for connection manager configuration.
pub type Result<T> = std::result::Result<T, Error>;
