//! Public path rewriting.
//!
//! Runs after the request gate and relies on the [`PathVerdict`] extension it
//! inserts. Only public, non-passthrough requests are touched.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::header;
use http::uri::{PathAndQuery, Uri};
use request_gate::{PathVerdict, Problem, RouteClass};

use crate::config::UnknownHostPolicy;
use crate::domain::{SiteInfo, SiteResolver};

pub async fn site_rewrite_middleware(
    State(resolver): State<Arc<SiteResolver>>,
    mut req: Request,
    next: Next,
) -> Response {
    if req.extensions().get::<PathVerdict>() != Some(&PathVerdict::Gated(RouteClass::Public)) {
        return next.run(req).await;
    }

    let site = request_host(&req).and_then(|host| resolver.resolve_host(host).cloned());
    let Some(site) = site else {
        return unknown_host(&resolver, req, next).await;
    };

    let rewritten = resolver.rewrite_path(&site, req.uri().path());
    match rewrite_uri(req.uri(), &rewritten) {
        Ok(uri) => {
            tracing::debug!(
                site = %site.slug,
                from = %req.uri().path(),
                to = %rewritten,
                "Site rewrite"
            );
            *req.uri_mut() = uri;
            req.extensions_mut().insert(SiteInfo::clone(&site));
            next.run(req).await
        }
        Err(e) => {
            tracing::error!(site = %site.slug, error = %e, "Failed to build rewritten URI");
            Problem::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                "Request could not be routed to its site",
            )
            .into_response()
        }
    }
}

async fn unknown_host(resolver: &SiteResolver, req: Request, next: Next) -> Response {
    // The rewrite namespace is only reachable through a resolved host.
    if resolver.is_internal_path(req.uri().path()) {
        return not_found();
    }
    match resolver.unknown_host() {
        UnknownHostPolicy::Fallback => next.run(req).await,
        UnknownHostPolicy::NotFound => {
            tracing::debug!(host = ?request_host(&req), "No site for host");
            not_found()
        }
    }
}

fn not_found() -> Response {
    Problem::new(StatusCode::NOT_FOUND, "Not Found", "No site is served at this address")
        .into_response()
}

/// `Host` header, falling back to the URI authority (HTTP/2).
fn request_host(req: &Request) -> Option<&str> {
    req.headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| req.uri().authority().map(http::uri::Authority::as_str))
}

fn rewrite_uri(original: &Uri, path: &str) -> Result<Uri, http::Error> {
    let path_and_query = match original.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_owned(),
    };
    let mut parts = original.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query)?);
    Ok(Uri::from_parts(parts)?)
}
