#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Request gate for KampusCMS.
//!
//! Classifies each request path, resolves the session only where it matters,
//! and redirects between the login page and the admin area:
//!
//! - unauthenticated requests to the admin area go to the login page;
//! - authenticated requests to the login area go to the admin home;
//! - everything else is forwarded unchanged.
//!
//! ```yaml
//! request_gate:
//!   admin_prefix: /admin
//!   login_prefix: /login
//!   login_path: /login
//!   admin_home_path: /admin
//!   passthrough: "/api|/_static|/favicon.ico|/healthz"
//!   session_cookie: kampus_session
//!   resolve_timeout_ms: 1500
//!   redirect_policy: found
//! ```

pub mod classifier;
pub mod config;
pub mod decision;
pub mod error;
pub mod gate;
pub mod middleware;
pub mod path;
pub mod problem;
pub mod session;

pub use classifier::{PathClassifier, PathVerdict, RouteClass, RouteRule, RuleAction};
pub use config::{RedirectPolicy, RequestGateConfig};
pub use decision::{GateAction, RedirectTarget, decide};
pub use error::{GateConfigError, PathError};
pub use gate::{GateDecision, RequestGate};
pub use middleware::request_gate_middleware;
pub use path::normalize_path;
pub use problem::Problem;
pub use session::{SessionProbe, SessionState, extract_credentials};
