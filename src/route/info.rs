//! The composite route mapping key.

use std::cmp::Ordering;
use std::fmt;

use super::conditions::{HeadersCondition, MethodsCondition, ParamsCondition, PatternsCondition};
use super::spec::RouteSpec;
use crate::config::PathMatchConfig;
use crate::request::RouteRequest;

/// A route mapping: the conjunction of pattern, method, parameter and header
/// conditions. Serves as the registry's mapping key, so equality and hashing
/// cover all four conditions in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteInfo {
    patterns: PatternsCondition,
    methods: MethodsCondition,
    params: ParamsCondition,
    headers: HeadersCondition,
}

impl RouteInfo {
    pub fn new(
        patterns: PatternsCondition,
        methods: MethodsCondition,
        params: ParamsCondition,
        headers: HeadersCondition,
    ) -> Self {
        Self {
            patterns,
            methods,
            params,
            headers,
        }
    }

    pub fn from_spec(spec: &RouteSpec) -> Self {
        Self {
            patterns: PatternsCondition::new(spec.paths.clone()),
            methods: MethodsCondition::new(spec.methods.clone()),
            params: ParamsCondition::new(spec.params.clone()),
            headers: HeadersCondition::new(spec.headers.clone()),
        }
    }

    pub fn patterns(&self) -> &PatternsCondition {
        &self.patterns
    }

    pub fn methods(&self) -> &MethodsCondition {
        &self.methods
    }

    pub fn params(&self) -> &ParamsCondition {
        &self.params
    }

    pub fn headers(&self) -> &HeadersCondition {
        &self.headers
    }

    /// Combines a component-level mapping (`self`) with a method-level one.
    /// Patterns combine pairwise, the other conditions take the union.
    pub fn combine(&self, other: &RouteInfo) -> RouteInfo {
        RouteInfo {
            patterns: self.patterns.combine(&other.patterns),
            methods: self.methods.combine(&other.methods),
            params: self.params.combine(&other.params),
            headers: self.headers.combine(&other.headers),
        }
    }

    /// Checks all conditions against the request. On success returns a
    /// mapping narrowed to what matched; the cheap conditions run first so
    /// pattern matching is skipped for requests that fail on method alone.
    pub fn matching_route(
        &self,
        lookup_path: &str,
        request: &RouteRequest,
        config: &PathMatchConfig,
    ) -> Option<RouteInfo> {
        let methods = self.methods.matching(request)?;
        let params = self.params.matching(request)?;
        let headers = self.headers.matching(request)?;
        let patterns = self.patterns.matching(lookup_path, config)?;
        Some(RouteInfo {
            patterns,
            methods,
            params,
            headers,
        })
    }

    /// Orders two narrowed mappings: patterns dominate, then parameter and
    /// header specificity, with methods as the final tiebreaker.
    pub fn compare(&self, other: &RouteInfo, lookup_path: &str) -> Ordering {
        let result = self.patterns.compare(&other.patterns, lookup_path);
        if result != Ordering::Equal {
            return result;
        }
        let result = self.params.compare(&other.params);
        if result != Ordering::Equal {
            return result;
        }
        let result = self.headers.compare(&other.headers);
        if result != Ordering::Equal {
            return result;
        }
        self.methods.compare(&other.methods)
    }
}

impl fmt::Display for RouteInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{},methods={},params={},headers={}}}",
            self.patterns, self.methods, self.params, self.headers
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use axum::http::{HeaderMap, Method};

    fn request(method: Method, uri: &str) -> RouteRequest {
        RouteRequest::new(method, uri.parse().unwrap(), HeaderMap::new(), Bytes::new())
    }

    #[test]
    fn test_from_spec_display() {
        let info = RouteInfo::from_spec(&RouteSpec::get("/notes/{id}"));
        assert_eq!(
            info.to_string(),
            "{[/notes/{id}],methods=[GET],params=[],headers=[]}"
        );
    }

    #[test]
    fn test_equality_is_declaration_order_independent() {
        let a = RouteInfo::from_spec(
            &RouteSpec::new()
                .path("/a")
                .path("/b")
                .method(Method::GET)
                .method(Method::POST),
        );
        let b = RouteInfo::from_spec(
            &RouteSpec::new()
                .path("/b")
                .path("/a")
                .method(Method::POST)
                .method(Method::GET),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_combine_component_and_method_level() {
        let base = RouteInfo::from_spec(&RouteSpec::new().path("/api").header("x-tenant"));
        let method = RouteInfo::from_spec(&RouteSpec::get("/users/{id}").param("full"));
        let combined = base.combine(&method);

        assert_eq!(combined.patterns().patterns(), ["/api/users/{id}"]);
        assert_eq!(combined.methods().methods(), [Method::GET]);
        assert_eq!(combined.params().expressions().len(), 1);
        assert_eq!(combined.headers().expressions().len(), 1);
    }

    #[test]
    fn test_matching_route_narrows() {
        let info = RouteInfo::from_spec(
            &RouteSpec::new()
                .path("/users/{id}")
                .path("/users/**")
                .method(Method::GET)
                .method(Method::POST),
        );
        let config = PathMatchConfig::default();
        let req = request(Method::GET, "/users/42");
        let narrowed = info.matching_route("/users/42", &req, &config).unwrap();

        assert_eq!(narrowed.methods().methods(), [Method::GET]);
        assert_eq!(narrowed.patterns().first(), Some("/users/{id}"));
    }

    #[test]
    fn test_matching_route_rejects_on_any_condition() {
        let info = RouteInfo::from_spec(&RouteSpec::get("/users").param("active"));
        let config = PathMatchConfig::default();

        assert!(info
            .matching_route("/users", &request(Method::POST, "/users?active"), &config)
            .is_none());
        assert!(info
            .matching_route("/users", &request(Method::GET, "/users"), &config)
            .is_none());
        assert!(info
            .matching_route("/users", &request(Method::GET, "/users?active"), &config)
            .is_some());
    }

    #[test]
    fn test_compare_patterns_dominate() {
        let config = PathMatchConfig::default();
        let req = request(Method::GET, "/users/42");
        let literalish = RouteInfo::from_spec(&RouteSpec::new().path("/users/{id}"))
            .matching_route("/users/42", &req, &config)
            .unwrap();
        let wild = RouteInfo::from_spec(&RouteSpec::get("/users/*"))
            .matching_route("/users/42", &req, &config)
            .unwrap();
        // Stronger method condition cannot save the weaker pattern.
        assert_eq!(literalish.compare(&wild, "/users/42"), Ordering::Less);
    }

    #[test]
    fn test_compare_params_break_pattern_ties() {
        let config = PathMatchConfig::default();
        let req = request(Method::GET, "/users?full");
        let plain = RouteInfo::from_spec(&RouteSpec::get("/users"))
            .matching_route("/users", &req, &config)
            .unwrap();
        let with_param = RouteInfo::from_spec(&RouteSpec::get("/users").param("full"))
            .matching_route("/users", &req, &config)
            .unwrap();
        assert_eq!(with_param.compare(&plain, "/users"), Ordering::Less);
    }
}
