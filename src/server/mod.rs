//! Request dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → dispatch.rs (Axum setup, middleware, body buffering)
//!     → mapping registry (resolve handler method)
//!     → handler invocation
//!     → response (resolution failures mapped to 404/405/400/500)
//! ```
//!
//! # Responsibilities
//! - Create the Axum router with a catch-all route into the registry
//! - Wire up middleware (tracing, timeout, request ID)
//! - Translate resolution outcomes into HTTP responses
//! - Serve with graceful shutdown

pub mod dispatch;
pub mod middleware;

pub use dispatch::{AppState, DispatchServer};
pub use middleware::X_REQUEST_ID;
