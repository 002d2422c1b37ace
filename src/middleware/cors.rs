//! CORS for browser clients of the note API.
//!
//! - development: any origin
//! - production: only `CORS_ALLOWED_ORIGINS` (validated in `Config`), none when empty
//!
//! Credentials travel in the `Authorization` header, never in cookies, so
//! `allow_credentials` stays off in both modes.

use std::time::Duration;

use axum::Router;
use axum::http::{HeaderName, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::Config;
use crate::middleware::http::REQUEST_ID_HEADER;

const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(600);

// Every verb the /note routes answer to.
const NOTE_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::PUT, Method::DELETE];

pub fn apply(router: Router, config: &Config) -> Router {
    let origins = if config.app_env.is_production() {
        AllowOrigin::list(config.cors_allowed_origins.iter().cloned())
    } else {
        AllowOrigin::any()
    };

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    router.layer(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(NOTE_METHODS)
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, request_id.clone()])
            // Lets browser code correlate failures with server logs.
            .expose_headers([request_id])
            .max_age(PREFLIGHT_MAX_AGE),
    )
}
