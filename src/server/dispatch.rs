//! Dispatch server setup and request handling.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Buffer request bodies up to the configured limit
//! - Resolve every request through the mapping registry
//! - Map resolution outcomes to HTTP responses

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::RouterConfig;
use crate::mapping::{MappingRegistry, ResolveError};
use crate::observability::metrics;
use crate::request::RouteRequest;
use crate::route::RouteMappingStrategy;
use crate::server::middleware::request_id_middleware;

/// Application state injected into the dispatch handler.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<MappingRegistry<RouteMappingStrategy>>,
    pub max_body_bytes: usize,
}

/// HTTP server dispatching every request through the mapping registry.
pub struct DispatchServer {
    router: Router,
    config: RouterConfig,
}

impl DispatchServer {
    /// Create a new dispatch server around a frozen registry.
    pub fn new(
        config: RouterConfig,
        registry: Arc<MappingRegistry<RouteMappingStrategy>>,
    ) -> Self {
        let state = AppState {
            registry,
            max_body_bytes: config.server.max_body_bytes,
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &RouterConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch_handler))
            .route("/", any(dispatch_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs,
            )))
            .layer(axum::middleware::from_fn(request_id_middleware))
            .layer(TraceLayer::new_for_http())
    }

    /// The assembled router, for in-process testing without a socket.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "dispatch server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("dispatch server stopped");
        Ok(())
    }
}

/// Main dispatch handler: buffers the body, resolves the handler method and
/// invokes it.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method_str = request.method().to_string();
    let path = request.uri().path().to_string();

    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(path = %path, error = %e, "failed to buffer request body");
            metrics::record_request(&method_str, 413, "none", start_time);
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let mut route_request = RouteRequest::from_parts(&parts, body_bytes);

    match state.registry.resolve(&mut route_request) {
        Ok(Some(handler)) => {
            let handler_name = handler.to_string();
            metrics::record_resolution("matched");
            let response = handler.invoke(route_request).await;
            metrics::record_request(
                &method_str,
                response.status().as_u16(),
                &handler_name,
                start_time,
            );
            response
        }
        Ok(None) => {
            tracing::debug!(path = %path, method = %method_str, "no handler method matched");
            metrics::record_resolution("no_match");
            metrics::record_request(&method_str, 404, "none", start_time);
            (StatusCode::NOT_FOUND, "No matching handler method").into_response()
        }
        Err(ResolveError::MethodNotAllowed { allowed, .. }) => {
            metrics::record_resolution("method_not_allowed");
            metrics::record_request(&method_str, 405, "none", start_time);
            let mut response =
                (StatusCode::METHOD_NOT_ALLOWED, "Request method not supported").into_response();
            if let Ok(value) = HeaderValue::from_str(&allowed.join(", ")) {
                response.headers_mut().insert(header::ALLOW, value);
            }
            response
        }
        Err(err @ ResolveError::UnsatisfiedCondition { .. }) => {
            metrics::record_resolution("unsatisfied_condition");
            metrics::record_request(&method_str, 400, "none", start_time);
            (StatusCode::BAD_REQUEST, err.to_string()).into_response()
        }
        Err(err @ ResolveError::Ambiguous { .. }) => {
            tracing::error!(path = %path, error = %err, "ambiguous handler methods");
            metrics::record_resolution("ambiguous");
            metrics::record_request(&method_str, 500, "none", start_time);
            (StatusCode::INTERNAL_SERVER_ERROR, "Ambiguous handler methods").into_response()
        }
    }
}
