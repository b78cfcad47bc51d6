//! `SessionResolverClient` implementation for the static plugin.

use async_trait::async_trait;
use session_resolver_sdk::{
    ResolvedSession, SessionCredentials, SessionResolverClient, SessionResolverError,
};

use super::service::Service;

#[async_trait]
impl SessionResolverClient for Service {
    async fn resolve_session(
        &self,
        credentials: &SessionCredentials,
    ) -> Result<Option<ResolvedSession>, SessionResolverError> {
        let session = self.resolve(credentials);
        if session.is_none() {
            tracing::debug!(
                source = credentials.source().as_str(),
                "Static session resolver did not recognize credential"
            );
        }
        Ok(session)
    }
}
