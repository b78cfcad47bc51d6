//! Configuration for the static session plugin.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use kampus_security::constants::{DEFAULT_SITE_ID, DEFAULT_SUBJECT_ID};

/// Plugin configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticSessionPluginConfig {
    /// Resolution mode.
    pub mode: SessionMode,

    /// Identity returned in `accept_all` mode.
    pub default_identity: IdentityConfig,

    /// Static credential-to-identity mappings for `static_tokens` mode.
    pub tokens: Vec<TokenMapping>,
}

impl Default for StaticSessionPluginConfig {
    fn default() -> Self {
        Self {
            mode: SessionMode::StaticTokens,
            default_identity: IdentityConfig::default(),
            tokens: Vec::new(),
        }
    }
}

/// Resolution mode.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// Accept any non-empty credential and return the default identity.
    AcceptAll,
    /// Map specific credentials to specific identities. With no tokens
    /// configured nothing authenticates.
    #[default]
    StaticTokens,
}

/// Identity of a session holder.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdentityConfig {
    pub subject_id: Uuid,

    /// e.g. `site_admin`, `staff`
    pub subject_type: Option<String>,

    /// Site administered by the subject; `None` for platform administrators.
    pub site_id: Option<Uuid>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            subject_id: DEFAULT_SUBJECT_ID,
            subject_type: Some("site_admin".to_owned()),
            site_id: Some(DEFAULT_SITE_ID),
        }
    }
}

/// Maps a static credential to a specific identity.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TokenMapping {
    /// The cookie or bearer value to match.
    pub token: String,
    /// The identity to return when this credential is presented.
    pub identity: IdentityConfig,
}
