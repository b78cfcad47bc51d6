//! Error types for the request gate.

use thiserror::Error;

/// Startup errors. The gate refuses to initialize on any of these.
#[derive(Debug, Error)]
pub enum GateConfigError {
    #[error("redirect target `{name}` is invalid ({value:?}): {reason}")]
    InvalidRedirectTarget {
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("route prefix `{name}` is invalid ({value:?}): {reason}")]
    InvalidPrefix {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("passthrough pattern {pattern:?} is invalid: {reason}")]
    InvalidPassthroughPattern { pattern: String, reason: String },

    #[error("session cookie name {0:?} is invalid")]
    InvalidCookieName(String),

    #[error("session resolver timeout must be greater than zero")]
    ZeroResolveTimeout,

    #[error("redirect loop: {0}")]
    RedirectLoop(String),
}

/// A request path the classifier refuses to classify.
///
/// Surfaced as a server error; a malformed path is never forwarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path is not absolute")]
    NotAbsolute,

    #[error("path contains a dot segment")]
    DotSegment,

    #[error("path segment decodes to invalid UTF-8")]
    InvalidEncoding,

    #[error("path segment contains an encoded separator")]
    EncodedSeparator,

    #[error("path contains control characters")]
    ControlCharacter,
}
