use std::sync::Arc;

use anyhow::{Context, Result, bail};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::from_fn_with_state;
use request_gate::{PathVerdict, RequestGate, RouteClass, request_gate_middleware};
use session_resolver_sdk::SessionResolverClient;
use site_resolver::{SiteResolver, site_rewrite_middleware};
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::field::Empty;

use crate::config::AppConfig;
use crate::routes;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Validated runtime components.
#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<RequestGate>,
    pub sites: Arc<SiteResolver>,
}

impl AppState {
    /// Build every component from configuration, failing on the first
    /// invalid section.
    ///
    /// # Errors
    ///
    /// Returns an error if the request gate or the site table rejects its
    /// configuration, or if the site rewrite prefix overlaps a gated area.
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let resolver: Arc<dyn SessionResolverClient> = Arc::new(
            static_session_plugin::Service::from_config(&cfg.session_resolver),
        );
        Self::with_resolver(cfg, resolver)
    }

    /// Same as [`AppState::from_config`] with a caller-supplied session resolver.
    ///
    /// # Errors
    ///
    /// See [`AppState::from_config`].
    pub fn with_resolver(
        cfg: &AppConfig,
        resolver: Arc<dyn SessionResolverClient>,
    ) -> Result<Self> {
        let gate = RequestGate::new(&cfg.request_gate, resolver)
            .context("invalid request_gate configuration")?;
        let sites = SiteResolver::from_config(&cfg.site_resolver)
            .context("invalid site_resolver configuration")?;
        check_rewrite_prefix(&gate, &sites)?;
        Ok(Self {
            gate: Arc::new(gate),
            sites: Arc::new(sites),
        })
    }
}

/// Rewritten requests are routed after the gate has run, so the rewrite
/// namespace must be public and must not contain any gate rule.
fn check_rewrite_prefix(gate: &RequestGate, sites: &SiteResolver) -> Result<()> {
    let prefix = sites.rewrite_prefix();
    let verdict = gate
        .classifier()
        .classify(prefix)
        .with_context(|| format!("site_resolver.rewrite_prefix {prefix} is not a valid path"))?;
    let area = match verdict {
        PathVerdict::Gated(RouteClass::Public) => None,
        PathVerdict::Gated(class) => Some(class.as_str()),
        PathVerdict::Passthrough => Some("passthrough"),
    };
    if let Some(area) = area {
        bail!(
            "site_resolver.rewrite_prefix {prefix} must be a public path, \
             but the request gate classifies it as {area}"
        );
    }

    let nested = format!("{prefix}/");
    if let Some(rule) = gate
        .classifier()
        .rules()
        .iter()
        .find(|rule| rule.prefix().starts_with(&nested))
    {
        bail!(
            "request gate rule {} lies inside site_resolver.rewrite_prefix {prefix}",
            rule.prefix()
        );
    }
    Ok(())
}

/// Compose the HTTP stack, outermost first:
/// request id → trace → request gate → site rewrite → router.
///
/// The gate and the rewrite wrap the router as a service so that the
/// rewritten URI is what gets routed.
#[must_use]
pub fn build_app(state: &AppState) -> Router {
    let gated = ServiceBuilder::new()
        .layer(from_fn_with_state(state.gate.clone(), request_gate_middleware))
        .layer(from_fn_with_state(state.sites.clone(), site_rewrite_middleware))
        .service(routes::router(state.sites.clone()));

    Router::new()
        .fallback_service(gated)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<Body>| {
                    let rid = req
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("n/a");
                    tracing::info_span!(
                        "http_request",
                        method = %req.method(),
                        uri = %req.uri().path(),
                        request_id = %rid,
                        status = Empty,
                        latency_ms = Empty,
                    )
                })
                .on_response(
                    |res: &Response<Body>, latency: std::time::Duration, span: &tracing::Span| {
                        span.record("status", res.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                    },
                ),
        )
        // If missing, generate x-request-id first; then propagate it to the response.
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
