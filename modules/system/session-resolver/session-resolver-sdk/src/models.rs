//! Domain models for session resolution.

use kampus_security::SecurityContext;
use secrecy::{ExposeSecret, SecretString};

/// Transport the credential was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Session cookie set by the login flow.
    Cookie,
    /// `Authorization: Bearer` header.
    Bearer,
}

impl CredentialSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cookie => "cookie",
            Self::Bearer => "bearer",
        }
    }
}

/// Credential material extracted from an inbound request.
///
/// The value is wrapped in `SecretString` so it never shows up in logs.
#[derive(Debug, Clone)]
pub struct SessionCredentials {
    source: CredentialSource,
    value: SecretString,
}

impl SessionCredentials {
    #[must_use]
    pub fn new(source: CredentialSource, value: impl Into<String>) -> Self {
        Self {
            source,
            value: SecretString::from(value.into()),
        }
    }

    #[must_use]
    pub fn cookie(value: impl Into<String>) -> Self {
        Self::new(CredentialSource::Cookie, value)
    }

    #[must_use]
    pub fn bearer(value: impl Into<String>) -> Self {
        Self::new(CredentialSource::Bearer, value)
    }

    #[must_use]
    pub fn source(&self) -> CredentialSource {
        self.source
    }

    /// Raw credential value. Callers must not log it.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }
}

/// Result of a successful session resolution.
#[derive(Debug, Clone)]
pub struct ResolvedSession {
    /// Identity of the session holder, handed to downstream handlers.
    pub security_context: SecurityContext,
}
