use std::time::Duration;

use http::{Method, StatusCode};
use serde::{Deserialize, Serialize};

fn default_admin_prefix() -> String {
    "/admin".to_owned()
}

fn default_login_prefix() -> String {
    "/login".to_owned()
}

fn default_passthrough() -> String {
    "/api|/_static|/favicon.ico|/healthz".to_owned()
}

fn default_session_cookie() -> String {
    "kampus_session".to_owned()
}

fn default_resolve_timeout_ms() -> u64 {
    1_500
}

/// Request gate configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct RequestGateConfig {
    /// Paths under this prefix require an authenticated session.
    pub admin_prefix: String,
    /// Paths under this prefix are only for anonymous visitors.
    pub login_prefix: String,
    /// Where unauthenticated admin requests are sent. Path only.
    pub login_path: String,
    /// Where authenticated login requests are sent. Path only.
    pub admin_home_path: String,
    /// `|`-separated path prefixes that bypass the gate entirely, evaluated
    /// before the admin/login prefixes. A trailing `/**` or `/*` is accepted
    /// and means the same as the bare prefix.
    pub passthrough: String,
    /// Name of the cookie carrying the session credential.
    pub session_cookie: String,
    /// Upper bound for a single session lookup.
    pub resolve_timeout_ms: u64,
    /// Status code selection for redirects.
    pub redirect_policy: RedirectPolicy,
}

impl Default for RequestGateConfig {
    fn default() -> Self {
        Self {
            admin_prefix: default_admin_prefix(),
            login_prefix: default_login_prefix(),
            login_path: default_login_prefix(),
            admin_home_path: default_admin_prefix(),
            passthrough: default_passthrough(),
            session_cookie: default_session_cookie(),
            resolve_timeout_ms: default_resolve_timeout_ms(),
            redirect_policy: RedirectPolicy::default(),
        }
    }
}

impl RequestGateConfig {
    #[must_use]
    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_millis(self.resolve_timeout_ms)
    }
}

/// How the redirect status code is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectPolicy {
    /// `302 Found` for every method.
    #[default]
    Found,
    /// `307 Temporary Redirect` for non-idempotent methods, `302` otherwise.
    PreserveMethod,
}

impl RedirectPolicy {
    #[must_use]
    pub fn status_for(self, method: &Method) -> StatusCode {
        match self {
            Self::PreserveMethod if !method.is_idempotent() => StatusCode::TEMPORARY_REDIRECT,
            Self::Found | Self::PreserveMethod => StatusCode::FOUND,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_paths() {
        let cfg = RequestGateConfig::default();
        assert_eq!(cfg.admin_prefix, "/admin");
        assert_eq!(cfg.login_prefix, "/login");
        assert_eq!(cfg.login_path, "/login");
        assert_eq!(cfg.admin_home_path, "/admin");
        assert_eq!(cfg.resolve_timeout(), Duration::from_millis(1_500));
        assert_eq!(cfg.redirect_policy, RedirectPolicy::Found);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg: RequestGateConfig = serde_json::from_value(serde_json::json!({
            "login_path": "/masuk",
            "login_prefix": "/masuk",
            "redirect_policy": "preserve_method"
        }))
        .unwrap();

        assert_eq!(cfg.login_path, "/masuk");
        assert_eq!(cfg.admin_prefix, "/admin");
        assert_eq!(cfg.redirect_policy, RedirectPolicy::PreserveMethod);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let res: Result<RequestGateConfig, _> =
            serde_json::from_value(serde_json::json!({ "login_url": "/x" }));
        assert!(res.is_err());
    }

    #[test]
    fn found_policy_always_302() {
        for method in [Method::GET, Method::POST, Method::PATCH, Method::DELETE] {
            assert_eq!(RedirectPolicy::Found.status_for(&method), StatusCode::FOUND);
        }
    }

    #[test]
    fn preserve_method_policy_uses_307_for_non_idempotent() {
        let p = RedirectPolicy::PreserveMethod;
        assert_eq!(p.status_for(&Method::GET), StatusCode::FOUND);
        assert_eq!(p.status_for(&Method::HEAD), StatusCode::FOUND);
        assert_eq!(p.status_for(&Method::PUT), StatusCode::FOUND);
        assert_eq!(p.status_for(&Method::POST), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(p.status_for(&Method::PATCH), StatusCode::TEMPORARY_REDIRECT);
    }
}
