//! Service implementation for the static session plugin.

use std::collections::HashMap;

use kampus_security::SecurityContext;
use session_resolver_sdk::{ResolvedSession, SessionCredentials};

use crate::config::{IdentityConfig, SessionMode, StaticSessionPluginConfig};

/// Static session resolver service.
///
/// Provides credential-to-identity mapping based on configuration mode:
/// - `accept_all`: Any non-empty credential maps to the default identity
/// - `static_tokens`: Specific credentials map to specific identities
pub struct Service {
    mode: SessionMode,
    default_identity: IdentityConfig,
    token_map: HashMap<String, IdentityConfig>,
}

impl Service {
    /// Create a service from plugin configuration.
    #[must_use]
    pub fn from_config(cfg: &StaticSessionPluginConfig) -> Self {
        if cfg.mode == SessionMode::AcceptAll {
            tracing::warn!(
                "Static session resolver is running in `accept_all` mode: \
                 every non-empty session credential is accepted with a hardcoded identity. \
                 Do NOT use this mode in production."
            );
        }

        let token_map: HashMap<String, IdentityConfig> = cfg
            .tokens
            .iter()
            .map(|m| (m.token.clone(), m.identity.clone()))
            .collect();

        tracing::info!(
            mode = ?cfg.mode,
            token_count = token_map.len(),
            "Static session resolver configured"
        );

        Self {
            mode: cfg.mode,
            default_identity: cfg.default_identity.clone(),
            token_map,
        }
    }

    /// Resolve credentials to a session.
    ///
    /// Returns `None` if the credential is empty or, in `static_tokens` mode,
    /// not recognized.
    #[must_use]
    pub fn resolve(&self, credentials: &SessionCredentials) -> Option<ResolvedSession> {
        let raw = credentials.expose();
        if raw.trim().is_empty() {
            return None;
        }

        let identity = match self.mode {
            SessionMode::AcceptAll => &self.default_identity,
            SessionMode::StaticTokens => self.token_map.get(raw)?,
        };

        Some(build_session(identity, raw))
    }
}

fn build_session(identity: &IdentityConfig, credential: &str) -> ResolvedSession {
    let mut builder = SecurityContext::builder()
        .subject_id(identity.subject_id)
        .site_id(identity.site_id)
        .credential(credential.to_owned());
    if let Some(subject_type) = identity.subject_type.as_deref() {
        builder = builder.subject_type(subject_type);
    }

    ResolvedSession {
        security_context: builder.build(),
    }
}
