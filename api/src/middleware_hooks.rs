use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{debug, info};

use crate::AppState;

/// Header carrying the running board version on every response.
pub const VERSION_HEADER: &str = "x-board-version";

/// Request processing middleware hook
///
/// Logs each incoming request and how long the handler chain took.
pub async fn request_middleware(
    State(_state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    info!("REQUEST: {} {}", method, uri);

    let response = next.run(request).await;

    info!(
        "REQUEST: {} {} -> {} in {:?}",
        method,
        uri,
        response.status(),
        start.elapsed()
    );

    response
}

/// Response processing middleware hook
///
/// Stamps the board version on outgoing responses.
pub async fn response_middleware(
    State(_state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    response.headers_mut().insert(
        VERSION_HEADER,
        HeaderValue::from_static(env!("CARGO_PKG_VERSION")),
    );

    debug!("RESPONSE: version header added");
    response
}
