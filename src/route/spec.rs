//! Declarative route attributes.

use axum::http::Method;

/// The route attributes a component declares for a handler method, or at
/// component level as a base for all of its methods.
///
/// Everything is optional. No paths means the route matches any path, no
/// methods means any method; parameter and header expressions only constrain
/// when present.
#[derive(Debug, Clone, Default)]
pub struct RouteSpec {
    pub(crate) paths: Vec<String>,
    pub(crate) methods: Vec<Method>,
    pub(crate) params: Vec<String>,
    pub(crate) headers: Vec<String>,
}

impl RouteSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a single-path GET route.
    pub fn get(path: &str) -> Self {
        Self::new().path(path).method(Method::GET)
    }

    /// Shorthand for a single-path POST route.
    pub fn post(path: &str) -> Self {
        Self::new().path(path).method(Method::POST)
    }

    /// Shorthand for a single-path PUT route.
    pub fn put(path: &str) -> Self {
        Self::new().path(path).method(Method::PUT)
    }

    /// Shorthand for a single-path DELETE route.
    pub fn delete(path: &str) -> Self {
        Self::new().path(path).method(Method::DELETE)
    }

    pub fn path(mut self, path: &str) -> Self {
        self.paths.push(path.to_string());
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    /// Query parameter expression: `name`, `!name`, `name=value` or
    /// `name!=value`.
    pub fn param(mut self, expression: &str) -> Self {
        self.params.push(expression.to_string());
        self
    }

    /// Header expression, same grammar as [`RouteSpec::param`]. Header names
    /// are case-insensitive.
    pub fn header(mut self, expression: &str) -> Self {
        self.headers.push(expression.to_string());
        self
    }
}
