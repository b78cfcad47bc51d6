//! Page handlers.
//!
//! The pages are placeholders for the CMS renderer; what matters here is
//! which handler a request reaches and what identity it carries.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use kampus_security::SecurityContext;
use serde_json::json;
use site_resolver::{SiteInfo, SiteResolver};

#[must_use]
pub fn router(sites: Arc<SiteResolver>) -> Router {
    Router::new()
        .route("/login", get(login_page).post(login_page))
        .route("/admin", get(admin_page))
        .route("/admin/{*rest}", get(admin_page))
        .route("/api/sites", get(list_sites))
        .route("/healthz", get(healthz))
        .route("/_sites/{site}", get(site_home))
        .route("/_sites/{site}/{*path}", get(site_page))
        .fallback(fallback_page)
        .with_state(sites)
}

async fn login_page() -> &'static str {
    "KampusCMS login"
}

async fn admin_page(Extension(ctx): Extension<SecurityContext>, uri: Uri) -> String {
    format!(
        "KampusCMS admin {} (subject {}, {})",
        uri.path(),
        ctx.subject_id(),
        ctx.subject_type().unwrap_or("unknown")
    )
}

async fn list_sites(State(sites): State<Arc<SiteResolver>>) -> Json<Vec<SiteInfo>> {
    Json(sites.sites().iter().map(|s| s.as_ref().clone()).collect())
}

async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn site_home(Extension(site): Extension<SiteInfo>) -> String {
    format!("{} home", site.name)
}

async fn site_page(
    Path((_slug, path)): Path<(String, String)>,
    Extension(site): Extension<SiteInfo>,
) -> String {
    format!("{} /{path}", site.name)
}

async fn fallback_page(uri: Uri) -> impl IntoResponse {
    if uri.path() == "/" {
        (StatusCode::OK, "KampusCMS")
    } else {
        (StatusCode::NOT_FOUND, "Page not found")
    }
}
