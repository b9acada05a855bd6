//! Request ID middleware.
//!
//! # Design Decisions
//! - Request ID added as early as possible so every log line carries it
//! - A caller-supplied ID is kept; otherwise a UUID v4 is generated
//! - The ID is reflected on the response for client-side correlation

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Header carrying the request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

pub async fn request_id_middleware(mut request: Request<Body>, next: Next) -> Response {
    let id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    match HeaderValue::from_str(&id) {
        Ok(value) => {
            request.headers_mut().insert(X_REQUEST_ID, value.clone());
            let mut response = next.run(request).await;
            response.headers_mut().insert(X_REQUEST_ID, value);
            response
        }
        // Unrepresentable caller-supplied ID; pass the request through.
        Err(_) => next.run(request).await,
    }
}
