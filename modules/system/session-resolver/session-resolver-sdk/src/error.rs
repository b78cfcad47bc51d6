//! Error types for the session resolver.

use thiserror::Error;

/// Errors that can occur when resolving a session.
#[derive(Debug, Error)]
pub enum SessionResolverError {
    /// The credential could not be parsed by the backend.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The identity backend is unreachable or not ready.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}
