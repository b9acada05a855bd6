//! Handler method identity and invocation.

use std::fmt;
use std::future::Future;
use std::hash::{Hash, Hasher};
use std::pin::Pin;
use std::sync::Arc;

use axum::response::Response;

use crate::request::RouteRequest;

/// Boxed future produced by invoking a handler method.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Type-erased handler callable.
pub type HandlerFn = dyn Fn(RouteRequest) -> HandlerFuture + Send + Sync;

/// A registered handler method: component name, method name, callable.
///
/// Identity is the `component#method` pair; the callable never participates
/// in equality or hashing. Clones share the callable through `Arc`.
#[derive(Clone)]
pub struct HandlerMethod {
    component: Arc<str>,
    method: Arc<str>,
    callable: Arc<HandlerFn>,
}

impl HandlerMethod {
    pub fn new(component: &str, method: &str, callable: Arc<HandlerFn>) -> Self {
        Self {
            component: Arc::from(component),
            method: Arc::from(method),
            callable,
        }
    }

    /// Wraps an async closure as a handler method.
    pub fn from_fn<F, Fut>(component: &str, method: &str, f: F) -> Self
    where
        F: Fn(RouteRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        Self::new(component, method, Arc::new(move |req| Box::pin(f(req))))
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Invokes the handler with the resolved request.
    pub fn invoke(&self, request: RouteRequest) -> HandlerFuture {
        (self.callable)(request)
    }
}

impl PartialEq for HandlerMethod {
    fn eq(&self, other: &Self) -> bool {
        self.component == other.component && self.method == other.method
    }
}

impl Eq for HandlerMethod {}

impl Hash for HandlerMethod {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.component.hash(state);
        self.method.hash(state);
    }
}

impl fmt::Debug for HandlerMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerMethod")
            .field("component", &self.component)
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for HandlerMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.component, self.method)
    }
}
