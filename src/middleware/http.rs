//! Request plumbing shared by every route.
//!
//! - `x-request-id`: taken from the client or generated, echoed on the response
//!   and recorded on the request span
//! - body cap via axum's `DefaultBodyLimit`, so an oversized note surfaces as a
//!   `Json` rejection and is answered with the usual JSON error (413)
//!
//! Handlers run to completion; there is no timeout layer here.

use axum::Router;
use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, Request};
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::Span;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

fn request_span(req: &Request<Body>) -> Span {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %req.method(),
        path = %req.uri().path(),
        request_id
    )
}

pub fn apply(router: Router, body_limit_bytes: usize) -> Router {
    let header = HeaderName::from_static(REQUEST_ID_HEADER);

    // Outermost first: the id must exist before the span is opened.
    let layers = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(header.clone(), MakeRequestUuid))
        .layer(PropagateRequestIdLayer::new(header))
        .layer(TraceLayer::new_for_http().make_span_with(request_span));

    router
        .layer(DefaultBodyLimit::max(body_limit_bytes))
        .layer(layers)
}
