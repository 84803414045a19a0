//! CORS policy for the browser UI.
//!
//! The UI is normally served by this process, so no origins are configured
//! and the permissive policy applies. When the UI is hosted elsewhere, the
//! listed origins get credentialed access so the session cookie is sent.

use std::time::Duration;

use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(600);

fn parse_origins(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim_end_matches('/')) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect()
}

/// Build the CORS layer for `origins`.
pub fn create_cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .max_age(PREFLIGHT_MAX_AGE);

    let allowed = parse_origins(origins);
    if allowed.is_empty() {
        return base.allow_origin(Any).allow_headers(Any);
    }

    base.allow_origin(allowed)
        .allow_headers([CONTENT_TYPE, ACCEPT])
        .allow_credentials(true)
}
