//! Path classifier: an ordered `(pattern, action)` rule table, first match wins.
//!
//! Passthrough rules are placed first so that an excluded path is never
//! classified, even when it also sits under the admin prefix.

use crate::config::RequestGateConfig;
use crate::error::{GateConfigError, PathError};
use crate::path::normalize_path;

/// Area a gated path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteClass {
    AdminArea,
    LoginArea,
    Public,
}

impl RouteClass {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AdminArea => "admin",
            Self::LoginArea => "login",
            Self::Public => "public",
        }
    }
}

/// Classifier output. Also inserted into forwarded requests as an extension
/// so later stages (site rewriting) can tell which area they are serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathVerdict {
    /// Matched a passthrough rule; the gate does not evaluate it.
    Passthrough,
    Gated(RouteClass),
}

/// Action attached to a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleAction {
    Passthrough,
    Classify(RouteClass),
}

impl From<RuleAction> for PathVerdict {
    fn from(action: RuleAction) -> Self {
        match action {
            RuleAction::Passthrough => Self::Passthrough,
            RuleAction::Classify(class) => Self::Gated(class),
        }
    }
}

/// Segment-aware prefix matcher: `/api` matches `/api` and `/api/...`
/// but not `/apis`.
#[derive(Clone)]
struct PrefixMatcher {
    matcher: matchit::Router<()>,
}

impl PrefixMatcher {
    fn new(prefix: &str) -> Result<Self, matchit::InsertError> {
        let mut matcher = matchit::Router::new();
        matcher.insert(prefix, ())?;
        matcher.insert(format!("{prefix}/{{*rest}}"), ())?;
        Ok(Self { matcher })
    }

    fn find(&self, path: &str) -> bool {
        self.matcher.at(path).is_ok()
    }
}

/// One entry of the rule table.
#[derive(Clone)]
pub struct RouteRule {
    prefix: String,
    matcher: PrefixMatcher,
    action: RuleAction,
}

impl RouteRule {
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn action(&self) -> RuleAction {
        self.action
    }
}

impl std::fmt::Debug for RouteRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteRule")
            .field("prefix", &self.prefix)
            .field("action", &self.action)
            .finish_non_exhaustive()
    }
}

/// Canonicalize a configured prefix. Returns the reason on failure.
fn canonical_prefix(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    let stripped = trimmed
        .strip_suffix("/**")
        .or_else(|| trimmed.strip_suffix("/*"))
        .unwrap_or(trimmed);

    if stripped.contains(['{', '}', '*', '?', '#']) {
        return Err("only literal path prefixes are supported".to_owned());
    }
    let canonical = normalize_path(stripped).map_err(|e| e.to_string())?;
    if canonical == "/" {
        return Err("the root path cannot be used as a prefix".to_owned());
    }
    Ok(canonical)
}

#[derive(Debug, Clone)]
pub struct PathClassifier {
    rules: Vec<RouteRule>,
}

impl PathClassifier {
    /// Build the rule table: passthrough patterns (in the order given), then
    /// the admin prefix, then the login prefix.
    ///
    /// # Errors
    ///
    /// Returns [`GateConfigError`] if a prefix or passthrough pattern is not a
    /// literal absolute path, or if two rules share a prefix.
    pub fn from_config(cfg: &RequestGateConfig) -> Result<Self, GateConfigError> {
        let mut builder = PathClassifierBuilder::default();

        for pattern in cfg.passthrough.split('|').filter(|p| !p.trim().is_empty()) {
            let prefix = canonical_prefix(pattern).map_err(|reason| {
                GateConfigError::InvalidPassthroughPattern {
                    pattern: pattern.to_owned(),
                    reason,
                }
            })?;
            builder.push(prefix, RuleAction::Passthrough).map_err(|reason| {
                GateConfigError::InvalidPassthroughPattern {
                    pattern: pattern.to_owned(),
                    reason,
                }
            })?;
        }

        for (name, value, class) in [
            ("admin_prefix", &cfg.admin_prefix, RouteClass::AdminArea),
            ("login_prefix", &cfg.login_prefix, RouteClass::LoginArea),
        ] {
            let invalid = |reason| GateConfigError::InvalidPrefix {
                name,
                value: value.clone(),
                reason,
            };
            let prefix = canonical_prefix(value).map_err(invalid)?;
            builder
                .push(prefix, RuleAction::Classify(class))
                .map_err(invalid)?;
        }

        Ok(Self {
            rules: builder.rules,
        })
    }

    #[must_use]
    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    /// Classify a raw request path.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] when the path cannot be normalized.
    pub fn classify(&self, raw_path: &str) -> Result<PathVerdict, PathError> {
        let path = normalize_path(raw_path)?;
        Ok(self.classify_normalized(&path))
    }

    fn classify_normalized(&self, path: &str) -> PathVerdict {
        self.rules
            .iter()
            .find(|rule| rule.matcher.find(path))
            .map_or(PathVerdict::Gated(RouteClass::Public), |rule| {
                rule.action.into()
            })
    }
}

#[derive(Default)]
struct PathClassifierBuilder {
    rules: Vec<RouteRule>,
}

impl PathClassifierBuilder {
    fn push(&mut self, prefix: String, action: RuleAction) -> Result<(), String> {
        if self.rules.iter().any(|r| r.prefix == prefix) {
            return Err(format!("prefix {prefix} is already used by another rule"));
        }
        let matcher = PrefixMatcher::new(&prefix).map_err(|e| e.to_string())?;
        self.rules.push(RouteRule {
            prefix,
            matcher,
            action,
        });
        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn classifier() -> PathClassifier {
        PathClassifier::from_config(&RequestGateConfig::default()).unwrap()
    }

    #[test]
    fn admin_paths_classify_as_admin() {
        let c = classifier();
        for path in ["/admin", "/admin/", "/admin/staff/new", "//admin", "/%61dmin/posts"] {
            assert_eq!(
                c.classify(path).unwrap(),
                PathVerdict::Gated(RouteClass::AdminArea),
                "{path}"
            );
        }
    }

    #[test]
    fn login_paths_classify_as_login() {
        let c = classifier();
        for path in ["/login", "/login/", "/login/reset"] {
            assert_eq!(
                c.classify(path).unwrap(),
                PathVerdict::Gated(RouteClass::LoginArea),
                "{path}"
            );
        }
    }

    #[test]
    fn prefix_match_is_segment_aware() {
        let c = classifier();
        assert_eq!(
            c.classify("/administrator").unwrap(),
            PathVerdict::Gated(RouteClass::Public)
        );
        assert_eq!(
            c.classify("/loginx").unwrap(),
            PathVerdict::Gated(RouteClass::Public)
        );
        assert_eq!(c.classify("/apis").unwrap(), PathVerdict::Gated(RouteClass::Public));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let c = classifier();
        assert_eq!(
            c.classify("/Admin").unwrap(),
            PathVerdict::Gated(RouteClass::Public)
        );
    }

    #[test]
    fn everything_else_is_public() {
        let c = classifier();
        for path in ["/", "/berita/2024", "/prodi/informatika", "/_sites/ft/staff"] {
            assert_eq!(
                c.classify(path).unwrap(),
                PathVerdict::Gated(RouteClass::Public),
                "{path}"
            );
        }
    }

    #[test]
    fn passthrough_prefixes_bypass() {
        let c = classifier();
        for path in ["/api", "/api/sites", "/_static/css/app.css", "/favicon.ico", "/healthz"] {
            assert_eq!(c.classify(path).unwrap(), PathVerdict::Passthrough, "{path}");
        }
    }

    #[test]
    fn passthrough_wins_over_admin_prefix() {
        let cfg = RequestGateConfig {
            passthrough: "/admin/assets/**|/api".to_owned(),
            ..RequestGateConfig::default()
        };
        let c = PathClassifier::from_config(&cfg).unwrap();

        assert_eq!(
            c.classify("/admin/assets/logo.png").unwrap(),
            PathVerdict::Passthrough
        );
        assert_eq!(
            c.classify("/admin/staff").unwrap(),
            PathVerdict::Gated(RouteClass::AdminArea)
        );
    }

    #[test]
    fn rule_table_order_is_passthrough_admin_login() {
        let c = classifier();
        let actions: Vec<_> = c.rules().iter().map(RouteRule::action).collect();
        assert_eq!(
            actions,
            vec![
                RuleAction::Passthrough,
                RuleAction::Passthrough,
                RuleAction::Passthrough,
                RuleAction::Passthrough,
                RuleAction::Classify(RouteClass::AdminArea),
                RuleAction::Classify(RouteClass::LoginArea),
            ]
        );
        assert_eq!(c.rules()[0].prefix(), "/api");
    }

    #[test]
    fn malformed_paths_are_errors() {
        let c = classifier();
        assert_eq!(c.classify("/api/../admin"), Err(PathError::DotSegment));
        assert_eq!(c.classify("admin"), Err(PathError::NotAbsolute));
    }

    #[test]
    fn glob_suffixes_are_accepted() {
        assert_eq!(canonical_prefix("/_next/static/**").unwrap(), "/_next/static");
        assert_eq!(canonical_prefix("/api/*").unwrap(), "/api");
        assert_eq!(canonical_prefix(" /favicon.ico ").unwrap(), "/favicon.ico");
    }

    #[test]
    fn invalid_patterns_are_rejected() {
        assert!(canonical_prefix("/").is_err());
        assert!(canonical_prefix("/**").is_err());
        assert!(canonical_prefix("api").is_err());
        assert!(canonical_prefix("/users/{id}").is_err());
        assert!(canonical_prefix("/a*b").is_err());

        let cfg = RequestGateConfig {
            passthrough: "/api|*.png".to_owned(),
            ..RequestGateConfig::default()
        };
        assert!(matches!(
            PathClassifier::from_config(&cfg),
            Err(GateConfigError::InvalidPassthroughPattern { .. })
        ));
    }

    #[test]
    fn duplicate_prefixes_are_rejected() {
        let cfg = RequestGateConfig {
            login_prefix: "/admin".to_owned(),
            ..RequestGateConfig::default()
        };
        assert!(matches!(
            PathClassifier::from_config(&cfg),
            Err(GateConfigError::InvalidPrefix { name: "login_prefix", .. })
        ));
    }
}
