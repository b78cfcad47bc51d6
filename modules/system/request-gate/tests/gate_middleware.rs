#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Integration tests for the request gate middleware.
//!
//! These tests verify that:
//! 1. Unauthenticated admin requests are redirected to the login page
//! 2. Authenticated login requests are redirected to the admin home
//! 3. Public and passthrough requests are forwarded without a session lookup
//! 4. Resolver failures fail closed
//! 5. Malformed paths never reach the application

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{
    Extension, Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
    middleware::from_fn_with_state,
    routing::{any, get},
};
use http_body_util::BodyExt;
use kampus_security::SecurityContext;
use request_gate::{
    PathVerdict, RedirectPolicy, RequestGate, RequestGateConfig, request_gate_middleware,
};
use session_resolver_sdk::{
    ResolvedSession, SessionCredentials, SessionResolverClient, SessionResolverError,
};
use tower::ServiceExt;
use uuid::Uuid;

const VALID_SESSION: &str = "valid-session";
const BACKEND_DOWN: &str = "backend-down";

/// Resolver that knows one session and counts every lookup.
struct CountingResolver {
    subject: Uuid,
    calls: AtomicUsize,
}

#[async_trait]
impl SessionResolverClient for CountingResolver {
    async fn resolve_session(
        &self,
        credentials: &SessionCredentials,
    ) -> Result<Option<ResolvedSession>, SessionResolverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match credentials.expose() {
            VALID_SESSION => Ok(Some(ResolvedSession {
                security_context: SecurityContext::builder()
                    .subject_id(self.subject)
                    .subject_type("site_admin")
                    .build(),
            })),
            BACKEND_DOWN => Err(SessionResolverError::ServiceUnavailable(
                "database unreachable".to_owned(),
            )),
            _ => Ok(None),
        }
    }
}

async fn echo(
    Extension(ctx): Extension<SecurityContext>,
    Extension(verdict): Extension<PathVerdict>,
) -> String {
    let area = match verdict {
        PathVerdict::Passthrough => "passthrough",
        PathVerdict::Gated(class) => class.as_str(),
    };
    format!("{area}|{}", ctx.subject_id())
}

struct Harness {
    app: Router,
    resolver: Arc<CountingResolver>,
}

fn harness(cfg: &RequestGateConfig) -> Harness {
    let resolver = Arc::new(CountingResolver {
        subject: Uuid::new_v4(),
        calls: AtomicUsize::new(0),
    });
    let gate = Arc::new(RequestGate::new(cfg, resolver.clone()).unwrap());

    let app = Router::new()
        .route("/admin", any(echo))
        .route("/admin/{*rest}", any(echo))
        .route("/login", any(echo))
        .route("/api/{*rest}", get(echo))
        .fallback(echo)
        .layer(from_fn_with_state(gate, request_gate_middleware));

    Harness { app, resolver }
}

fn request(method: Method, uri: &str, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = session {
        builder = builder.header(header::COOKIE, format!("kampus_session={value}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn anonymous_admin_request_redirects_to_login() {
    let h = harness(&RequestGateConfig::default());

    let response = h
        .app
        .oneshot(request(Method::GET, "/admin/dashboard", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/login");
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store, private");
    assert_eq!(response.headers()[header::VARY], "Cookie, Authorization");
}

#[tokio::test]
async fn unknown_session_on_admin_redirects_to_login() {
    let h = harness(&RequestGateConfig::default());

    let response = h
        .app
        .oneshot(request(Method::GET, "/admin", Some("expired")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/login");
    assert_eq!(h.resolver.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn authenticated_admin_request_is_forwarded_with_context() {
    let h = harness(&RequestGateConfig::default());
    let subject = h.resolver.subject;

    let response = h
        .app
        .oneshot(request(Method::GET, "/admin/dashboard", Some(VALID_SESSION)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, format!("admin|{subject}"));
}

#[tokio::test]
async fn authenticated_login_request_redirects_to_admin_home() {
    let h = harness(&RequestGateConfig::default());

    let response = h
        .app
        .oneshot(request(Method::GET, "/login", Some(VALID_SESSION)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/admin");
    assert_eq!(response.headers()[header::PRAGMA], "no-cache");
}

#[tokio::test]
async fn anonymous_login_request_is_forwarded() {
    let h = harness(&RequestGateConfig::default());

    let response = h
        .app
        .oneshot(request(Method::GET, "/login", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, format!("login|{}", Uuid::nil()));
}

#[tokio::test]
async fn public_request_is_forwarded_without_lookup() {
    let h = harness(&RequestGateConfig::default());

    let response = h
        .app
        .clone()
        .oneshot(request(Method::GET, "/berita/wisuda-2024", Some(VALID_SESSION)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    // Public pages never see the session, even a valid one.
    assert_eq!(body_string(response).await, format!("public|{}", Uuid::nil()));
    assert_eq!(h.resolver.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn passthrough_request_is_forwarded_without_lookup() {
    let h = harness(&RequestGateConfig::default());

    let response = h
        .app
        .oneshot(request(Method::GET, "/api/sites", Some(VALID_SESSION)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_string(response).await,
        format!("passthrough|{}", Uuid::nil())
    );
    assert_eq!(h.resolver.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn passthrough_under_admin_prefix_is_not_gated() {
    let cfg = RequestGateConfig {
        passthrough: "/admin/assets/**".to_owned(),
        ..RequestGateConfig::default()
    };
    let h = harness(&cfg);

    let response = h
        .app
        .oneshot(request(Method::GET, "/admin/assets/app.css", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(h.resolver.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn resolver_failure_fails_closed() {
    let h = harness(&RequestGateConfig::default());

    let admin = h
        .app
        .clone()
        .oneshot(request(Method::GET, "/admin", Some(BACKEND_DOWN)))
        .await
        .unwrap();
    assert_eq!(admin.status(), StatusCode::FOUND);
    assert_eq!(admin.headers()[header::LOCATION], "/login");

    // The login page stays reachable while the resolver is down.
    let login = h
        .app
        .oneshot(request(Method::GET, "/login", Some(BACKEND_DOWN)))
        .await
        .unwrap();
    assert_eq!(login.status(), StatusCode::OK);
}

#[tokio::test]
async fn bearer_header_is_accepted() {
    let h = harness(&RequestGateConfig::default());

    let req = Request::builder()
        .uri("/admin")
        .header(header::AUTHORIZATION, format!("Bearer {VALID_SESSION}"))
        .body(Body::empty())
        .unwrap();
    let response = h.app.oneshot(req).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn preserve_method_policy_uses_307_for_post() {
    let cfg = RequestGateConfig {
        redirect_policy: RedirectPolicy::PreserveMethod,
        ..RequestGateConfig::default()
    };
    let h = harness(&cfg);

    let post = h
        .app
        .clone()
        .oneshot(request(Method::POST, "/admin/posts", None))
        .await
        .unwrap();
    assert_eq!(post.status(), StatusCode::TEMPORARY_REDIRECT);

    let get = h
        .app
        .oneshot(request(Method::GET, "/admin/posts", None))
        .await
        .unwrap();
    assert_eq!(get.status(), StatusCode::FOUND);
}

#[tokio::test]
async fn default_policy_uses_302_for_post() {
    let h = harness(&RequestGateConfig::default());

    let response = h
        .app
        .oneshot(request(Method::POST, "/login", Some(VALID_SESSION)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/admin");
}

#[tokio::test]
async fn malformed_path_is_a_server_error() {
    let h = harness(&RequestGateConfig::default());

    let response = h
        .app
        .oneshot(request(Method::GET, "/api/%2e%2e/admin", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/problem+json"
    );
    assert_eq!(h.resolver.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn configured_targets_are_used() {
    let cfg = RequestGateConfig {
        admin_prefix: "/dasbor".to_owned(),
        login_prefix: "/masuk".to_owned(),
        login_path: "/masuk".to_owned(),
        admin_home_path: "/dasbor/beranda".to_owned(),
        ..RequestGateConfig::default()
    };
    let h = harness(&cfg);

    let anonymous = h
        .app
        .clone()
        .oneshot(request(Method::GET, "/dasbor/berita", None))
        .await
        .unwrap();
    assert_eq!(anonymous.headers()[header::LOCATION], "/masuk");

    let signed_in = h
        .app
        .oneshot(request(Method::GET, "/masuk", Some(VALID_SESSION)))
        .await
        .unwrap();
    assert_eq!(signed_in.headers()[header::LOCATION], "/dasbor/beranda");
}
