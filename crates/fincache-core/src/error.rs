//! Error types for cache operations.
//!
//! This module defines [`DataError`] which covers all error cases that can occur
//! when reading from the store, fetching from the upstream provider, or
//! validating caller input.

use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Error, Debug)]
pub enum DataError {
    /// The upstream provider returned nothing for the request, or a record
    /// the caller asked for does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An invalid argument was provided (e.g. an unsupported statement type).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Network or provider failure (connection errors, non-success status,
    /// provider error payloads, undecodable responses).
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Rate limit exceeded by the upstream provider.
    #[error("Rate limited by {provider}: retry after {retry_after:?}")]
    RateLimited {
        /// The provider that rate limited the request.
        provider: String,
        /// Suggested time to wait before retrying.
        retry_after: Option<std::time::Duration>,
    },

    /// The persistence layer could not be reached or failed the operation.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// A record with the same unique key already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// A stored record could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DataError {
    /// Returns true if this error originated from the upstream provider.
    #[must_use]
    pub const fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream(_) | Self::RateLimited { .. })
    }
}

/// Result type alias using [`DataError`].
pub type Result<T> = std::result::Result<T, DataError>;
