//! The request gate: classification, session resolution and the redirect decision.

use std::sync::Arc;

use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use session_resolver_sdk::SessionResolverClient;

use crate::classifier::{PathClassifier, PathVerdict, RouteClass};
use crate::config::{RedirectPolicy, RequestGateConfig};
use crate::decision::{GateAction, RedirectTarget, decide};
use crate::error::{GateConfigError, PathError};
use crate::path::normalize_path;
use crate::session::{SessionProbe, SessionState, extract_credentials};

/// What the gate does with one request.
#[derive(Debug, Clone)]
pub enum GateDecision {
    /// Hand the request to the next stage.
    ///
    /// `session` is `None` when the gate did not need to resolve it
    /// (passthrough and public paths).
    Forward {
        verdict: PathVerdict,
        session: Option<SessionState>,
    },
    Redirect {
        target: RedirectTarget,
        status: StatusCode,
    },
}

/// Validated, immutable gate shared by every request.
pub struct RequestGate {
    classifier: PathClassifier,
    login_location: HeaderValue,
    admin_home_location: HeaderValue,
    redirect_policy: RedirectPolicy,
    session_cookie: String,
    probe: SessionProbe,
}

impl RequestGate {
    /// Build the gate from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GateConfigError`] when a redirect target is not a safe
    /// local path, a prefix or passthrough pattern is invalid, the cookie name
    /// is not a cookie token, the resolver timeout is zero, or the targets
    /// would bounce between each other.
    pub fn new(
        cfg: &RequestGateConfig,
        resolver: Arc<dyn SessionResolverClient>,
    ) -> Result<Self, GateConfigError> {
        let classifier = PathClassifier::from_config(cfg)?;
        let login_location = validate_target("login_path", &cfg.login_path)?;
        let admin_home_location = validate_target("admin_home_path", &cfg.admin_home_path)?;

        if !is_cookie_token(&cfg.session_cookie) {
            return Err(GateConfigError::InvalidCookieName(cfg.session_cookie.clone()));
        }
        if cfg.resolve_timeout_ms == 0 {
            return Err(GateConfigError::ZeroResolveTimeout);
        }

        check_targets_do_not_loop(&classifier, cfg)?;

        tracing::info!(
            rules = classifier.rules().len(),
            login_path = %cfg.login_path,
            admin_home_path = %cfg.admin_home_path,
            redirect_policy = ?cfg.redirect_policy,
            resolve_timeout_ms = cfg.resolve_timeout_ms,
            "Request gate initialized"
        );

        Ok(Self {
            classifier,
            login_location,
            admin_home_location,
            redirect_policy: cfg.redirect_policy,
            session_cookie: cfg.session_cookie.clone(),
            probe: SessionProbe::new(resolver, cfg.resolve_timeout()),
        })
    }

    #[must_use]
    pub fn classifier(&self) -> &PathClassifier {
        &self.classifier
    }

    /// Configured `Location` for a redirect target.
    #[must_use]
    pub fn location(&self, target: RedirectTarget) -> &HeaderValue {
        match target {
            RedirectTarget::Login => &self.login_location,
            RedirectTarget::AdminHome => &self.admin_home_location,
        }
    }

    /// Evaluate the gate for one request.
    ///
    /// Passthrough and public paths are forwarded without consulting the
    /// session resolver.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] when the path cannot be classified.
    pub async fn evaluate(
        &self,
        method: &Method,
        path: &str,
        headers: &HeaderMap,
    ) -> Result<GateDecision, PathError> {
        let verdict = self.classifier.classify(path)?;
        let class = match verdict {
            PathVerdict::Passthrough | PathVerdict::Gated(RouteClass::Public) => {
                return Ok(GateDecision::Forward {
                    verdict,
                    session: None,
                });
            }
            PathVerdict::Gated(class) => class,
        };

        let credentials = extract_credentials(headers, &self.session_cookie);
        let session = self.probe.probe(credentials.as_ref()).await;

        Ok(match decide(class, session.is_authenticated()) {
            GateAction::Forward => GateDecision::Forward {
                verdict,
                session: Some(session),
            },
            GateAction::Redirect(target) => GateDecision::Redirect {
                target,
                status: self.redirect_policy.status_for(method),
            },
        })
    }
}

fn validate_target(name: &'static str, value: &str) -> Result<HeaderValue, GateConfigError> {
    let invalid = |reason| GateConfigError::InvalidRedirectTarget {
        name,
        value: value.to_owned(),
        reason,
    };

    if value.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if !value.starts_with('/') {
        return Err(invalid("must be an absolute path without scheme or host"));
    }
    if value.starts_with("//") {
        return Err(invalid("protocol-relative URLs are not allowed"));
    }
    if !value.is_ascii() {
        return Err(invalid("must be ASCII; percent-encode other characters"));
    }
    if value.contains('\\') {
        return Err(invalid("backslashes are not allowed"));
    }
    if value.contains(['?', '#']) {
        return Err(invalid("query strings and fragments are not allowed"));
    }
    if value.chars().any(|c| c.is_ascii_control() || c.is_ascii_whitespace()) {
        return Err(invalid("whitespace and control characters are not allowed"));
    }
    if normalize_path(value).is_err() {
        return Err(invalid("dot segments and encoded separators are not allowed"));
    }

    HeaderValue::from_str(value).map_err(|_| invalid("not a valid header value"))
}

fn is_cookie_token(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// A redirect must land on a path that forwards for the same session state.
fn check_targets_do_not_loop(
    classifier: &PathClassifier,
    cfg: &RequestGateConfig,
) -> Result<(), GateConfigError> {
    let classify = |path: &str| {
        classifier
            .classify(path)
            .map_err(|e| GateConfigError::RedirectLoop(format!("cannot classify {path}: {e}")))
    };

    let login = classify(&cfg.login_path)?;
    if login == PathVerdict::Gated(RouteClass::AdminArea) {
        return Err(GateConfigError::RedirectLoop(format!(
            "login_path {} lies inside the admin area and would redirect unauthenticated users back to itself",
            cfg.login_path
        )));
    }
    if login != PathVerdict::Gated(RouteClass::LoginArea) {
        tracing::warn!(
            login_path = %cfg.login_path,
            "login_path is outside the login area; signed-in users will not be sent to the admin home"
        );
    }

    let admin_home = classify(&cfg.admin_home_path)?;
    if admin_home == PathVerdict::Gated(RouteClass::LoginArea) {
        return Err(GateConfigError::RedirectLoop(format!(
            "admin_home_path {} lies inside the login area and would redirect signed-in users back to itself",
            cfg.admin_home_path
        )));
    }

    Ok(())
}
