//! API trait for session resolution.
//!
//! The request gate is the only consumer; identity backends implement it.

use async_trait::async_trait;

use crate::error::SessionResolverError;
use crate::models::{ResolvedSession, SessionCredentials};

/// Resolves request credentials into an authenticated session.
///
/// Implementations must be side-effect free: the gate only reads session
/// state, it never creates, refreshes or destroys sessions.
///
/// # Contract
///
/// - `Ok(Some(_))` - the credential belongs to a live session
/// - `Ok(None)` - the credential is unknown, expired or malformed
/// - `Err(_)` - the backend could not answer; callers decide the policy
///   (the request gate fails closed)
#[async_trait]
pub trait SessionResolverClient: Send + Sync {
    /// Resolve the session attached to the given credentials.
    ///
    /// # Errors
    ///
    /// - `InvalidCredentials` if the backend rejects the credential format
    /// - `ServiceUnavailable` if the identity backend cannot be reached
    /// - `Internal` for unexpected errors
    async fn resolve_session(
        &self,
        credentials: &SessionCredentials,
    ) -> Result<Option<ResolvedSession>, SessionResolverError>;
}
