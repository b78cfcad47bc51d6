use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kampus_security::SecurityContext;

use crate::classifier::PathVerdict;
use crate::gate::{GateDecision, RequestGate};
use crate::problem::Problem;
use crate::session::SessionState;

const REDIRECT_CACHE_CONTROL: &str = "no-store, private";
const REDIRECT_VARY: &str = "Cookie, Authorization";

/// Axum middleware applying the [`RequestGate`] to every request.
///
/// Forwarded requests carry two extensions: the [`PathVerdict`] and a
/// [`SecurityContext`] (anonymous unless a session was resolved).
pub async fn request_gate_middleware(
    State(gate): State<Arc<RequestGate>>,
    mut req: Request,
    next: Next,
) -> Response {
    let decision = gate
        .evaluate(req.method(), req.uri().path(), req.headers())
        .await;

    match decision {
        Ok(GateDecision::Forward { verdict, session }) => {
            if let Some(state) = &session {
                tracing::debug!(
                    path = %req.uri().path(),
                    area = verdict_label(verdict),
                    session = state.as_str(),
                    "Request gate forward"
                );
            }
            let ctx = match session {
                Some(SessionState::Authenticated(resolved)) => resolved.security_context,
                _ => SecurityContext::anonymous(),
            };
            req.extensions_mut().insert(verdict);
            req.extensions_mut().insert(ctx);
            next.run(req).await
        }
        Ok(GateDecision::Redirect { target, status }) => {
            tracing::debug!(
                path = %req.uri().path(),
                method = %req.method(),
                ?target,
                status = status.as_u16(),
                "Request gate redirect"
            );
            redirect_response(status, gate.location(target).clone())
        }
        Err(err) => {
            tracing::warn!(error = %err, "Request gate rejected malformed path");
            Problem::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                "Request path could not be classified",
            )
            .into_response()
        }
    }
}

fn verdict_label(verdict: PathVerdict) -> &'static str {
    match verdict {
        PathVerdict::Passthrough => "passthrough",
        PathVerdict::Gated(class) => class.as_str(),
    }
}

/// Bodyless redirect that neither browsers nor shared caches may store.
fn redirect_response(status: StatusCode, location: HeaderValue) -> Response {
    let mut response = status.into_response();
    let headers = response.headers_mut();
    headers.insert(header::LOCATION, location);
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(REDIRECT_CACHE_CONTROL),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::VARY, HeaderValue::from_static(REDIRECT_VARY));
    response
}
