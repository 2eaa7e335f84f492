//! Request logging and panic recovery.

use std::any::Any;
use std::time::Instant;

use axum::Json;
use axum::Router;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use tower_http::catch_panic::CatchPanicLayer;
use tracing::Instrument;

use super::dto::Status;

/// Wrap every route of `router` with logging and panic recovery.
///
/// A panicking handler becomes a 500 response, which the logger then
/// records like any other failed request.
pub fn apply<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(log_requests))
}

/// Run the request inside a span carrying a fresh span id, then log the
/// outcome with its status and duration.
async fn log_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let span = tracing::info_span!(
        "http_request",
        span_id = %uuid::Uuid::new_v4(),
        method = %request.method(),
        url = %request.uri(),
    );

    let response = next.run(request).instrument(span.clone()).await;

    let status = response.status().as_u16();
    let duration = start.elapsed();
    span.in_scope(|| {
        if status >= 400 {
            tracing::error!(status, ?duration, "HTTP request completed with error");
        } else {
            tracing::info!(status, ?duration, "HTTP request completed successfully");
        }
    });
    response
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = detail, "Recovered from panic");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(Status::error("Internal Server Error")),
    )
        .into_response()
}
