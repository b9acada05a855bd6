//! Handler components and their declared methods.

use std::future::Future;
use std::sync::Arc;

use axum::response::Response;

use super::handler::HandlerFn;
use crate::request::RouteRequest;

/// One handler method as declared by a component, before any mapping is
/// derived for it. `A` is the strategy's attribute type.
pub struct HandlerMethodDef<A> {
    method_name: &'static str,
    attributes: A,
    callable: Arc<HandlerFn>,
}

impl<A> HandlerMethodDef<A> {
    pub fn new<F, Fut>(method_name: &'static str, attributes: A, f: F) -> Self
    where
        F: Fn(RouteRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        Self {
            method_name,
            attributes,
            callable: Arc::new(move |req| Box::pin(f(req))),
        }
    }

    /// Builds a def around an already-boxed callable.
    pub fn from_callable(method_name: &'static str, attributes: A, callable: Arc<HandlerFn>) -> Self {
        Self {
            method_name,
            attributes,
            callable,
        }
    }

    pub fn method_name(&self) -> &'static str {
        self.method_name
    }

    pub fn attributes(&self) -> &A {
        &self.attributes
    }

    pub fn callable(&self) -> Arc<HandlerFn> {
        Arc::clone(&self.callable)
    }
}

/// A component that contributes handler methods to the registry.
///
/// Components are detected once at startup; the registry asks the strategy
/// whether a component qualifies, then derives one mapping per declared
/// method.
pub trait HandlerComponent<A>: Send + Sync {
    /// Stable component name, part of every handler method's identity.
    fn name(&self) -> &str;

    /// Component-level attributes, combined into each method's mapping.
    fn base_attributes(&self) -> Option<A> {
        None
    }

    /// The handler methods this component declares.
    fn handler_methods(&self) -> Vec<HandlerMethodDef<A>>;
}

