//! Session resolution boundary.
//!
//! Every identity-provider failure is caught and normalized here; nothing
//! past this module sees a raw resolver error.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderMap;
use axum_extra::extract::cookie::CookieJar;
use session_resolver_sdk::{
    ResolvedSession, SessionCredentials, SessionResolverClient, SessionResolverError,
};

/// Outcome of resolving a request's session.
#[derive(Debug, Clone)]
pub enum SessionState {
    Authenticated(ResolvedSession),
    /// No credential, or the credential is unknown/expired/malformed.
    Anonymous,
    /// The resolver could not answer (backend down, timeout, internal error).
    /// Kept distinct from `Anonymous` for logging; the gate fails closed on it.
    Unavailable(String),
}

impl SessionState {
    /// Fail-closed view: only a positively resolved session counts.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authenticated(_) => "authenticated",
            Self::Anonymous => "anonymous",
            Self::Unavailable(_) => "unavailable",
        }
    }
}

/// Extract credential material from request headers.
///
/// The session cookie takes precedence over an `Authorization: Bearer` header.
/// Empty values are treated as absent.
#[must_use]
pub fn extract_credentials(headers: &HeaderMap, cookie_name: &str) -> Option<SessionCredentials> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(cookie_name)
        && !cookie.value().trim().is_empty()
    {
        return Some(SessionCredentials::cookie(cookie.value()));
    }

    extract_bearer_token(headers).map(SessionCredentials::bearer)
}

/// Extract Bearer token from Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer ").map(str::trim))
        .filter(|s| !s.is_empty())
}

/// Timeout-bounded wrapper around a [`SessionResolverClient`].
///
/// The lookup is awaited inline in the caller's future. If the caller is
/// dropped (client disconnect), the lookup is dropped with it.
#[derive(Clone)]
pub struct SessionProbe {
    client: Arc<dyn SessionResolverClient>,
    timeout: Duration,
}

impl SessionProbe {
    #[must_use]
    pub fn new(client: Arc<dyn SessionResolverClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Resolve the session for the given credentials.
    pub async fn probe(&self, credentials: Option<&SessionCredentials>) -> SessionState {
        let Some(credentials) = credentials else {
            return SessionState::Anonymous;
        };

        match tokio::time::timeout(self.timeout, self.client.resolve_session(credentials)).await {
            Ok(Ok(Some(session))) => SessionState::Authenticated(session),
            Ok(Ok(None)) => SessionState::Anonymous,
            Ok(Err(err)) => normalize_error(credentials, &err),
            Err(_) => {
                tracing::warn!(
                    source = credentials.source().as_str(),
                    timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                    "Session resolver timed out; treating request as unauthenticated"
                );
                SessionState::Unavailable("session resolver timed out".to_owned())
            }
        }
    }
}

/// Log resolver errors at appropriate levels and collapse them.
#[allow(clippy::cognitive_complexity)]
fn normalize_error(credentials: &SessionCredentials, err: &SessionResolverError) -> SessionState {
    let source = credentials.source().as_str();
    match err {
        SessionResolverError::InvalidCredentials(msg) => {
            tracing::debug!(source, "Session credential rejected: {msg}");
            SessionState::Anonymous
        }
        SessionResolverError::ServiceUnavailable(msg) => {
            tracing::warn!(
                source,
                "Session resolver unavailable; treating request as unauthenticated: {msg}"
            );
            SessionState::Unavailable(err.to_string())
        }
        SessionResolverError::Internal(msg) => {
            tracing::error!(
                source,
                "Session resolver internal error; treating request as unauthenticated: {msg}"
            );
            SessionState::Unavailable(err.to_string())
        }
    }
}
