//! Route semantics plugged into the mapping registry.

use std::cmp::Ordering;

use crate::config::PathMatchConfig;
use crate::mapping::{
    HandlerComponent, HandlerMethod, HandlerMethodDef, MappingStrategy, ResolveError,
};
use crate::pattern;
use crate::request::RouteRequest;
use crate::route::info::RouteInfo;
use crate::route::spec::RouteSpec;

/// The HTTP route mapping strategy: mappings are [`RouteInfo`]s derived from
/// the [`RouteSpec`] attributes components declare.
pub struct RouteMappingStrategy {
    path_match: PathMatchConfig,
}

impl RouteMappingStrategy {
    pub fn new() -> Self {
        Self::with_config(PathMatchConfig::default())
    }

    pub fn with_config(path_match: PathMatchConfig) -> Self {
        Self { path_match }
    }
}

impl Default for RouteMappingStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl MappingStrategy for RouteMappingStrategy {
    type Mapping = RouteInfo;
    type Attributes = RouteSpec;

    /// A component is a handler when it declares at least one method.
    fn is_handler(&self, component: &dyn HandlerComponent<RouteSpec>) -> bool {
        !component.handler_methods().is_empty()
    }

    /// Component-level attributes are combined into every method's mapping;
    /// methods without a component base stand alone.
    fn mapping_for_method(
        &self,
        component: &dyn HandlerComponent<RouteSpec>,
        def: &HandlerMethodDef<RouteSpec>,
    ) -> Option<RouteInfo> {
        let info = RouteInfo::from_spec(def.attributes());
        match component.base_attributes() {
            Some(base) => Some(RouteInfo::from_spec(&base).combine(&info)),
            None => Some(info),
        }
    }

    fn direct_paths(&self, mapping: &RouteInfo) -> Vec<String> {
        mapping.patterns().direct_paths()
    }

    fn matching_mapping(
        &self,
        mapping: &RouteInfo,
        lookup_path: &str,
        request: &RouteRequest,
    ) -> Option<RouteInfo> {
        mapping.matching_route(lookup_path, request, &self.path_match)
    }

    fn compare_mappings(
        &self,
        left: &RouteInfo,
        right: &RouteInfo,
        lookup_path: &str,
        _request: &RouteRequest,
    ) -> Ordering {
        left.compare(right, lookup_path)
    }

    /// Deposits the template variables of the best matched pattern.
    fn on_match(&self, mapping: &RouteInfo, lookup_path: &str, request: &mut RouteRequest) {
        if let Some(best) = mapping.patterns().first() {
            if let Some(vars) = pattern::extract_vars(best, lookup_path) {
                request.set_path_vars(vars);
            }
        }
    }

    /// Distinguishes near misses from plain not-found: a path that matched
    /// with the wrong method reports the allowed methods; a path and method
    /// that matched with failing parameter or header expectations reports
    /// the unsatisfied condition.
    fn on_no_match(
        &self,
        mappings: &[&RouteInfo],
        lookup_path: &str,
        request: &RouteRequest,
    ) -> Result<Option<HandlerMethod>, ResolveError> {
        let mut allowed: Vec<String> = Vec::new();
        let mut pattern_matches: Vec<&RouteInfo> = Vec::new();
        let mut pattern_and_method: Vec<&RouteInfo> = Vec::new();

        for info in mappings.iter().copied() {
            if info.patterns().matching(lookup_path, &self.path_match).is_none() {
                continue;
            }
            pattern_matches.push(info);
            if info.methods().matching(request).is_some() {
                pattern_and_method.push(info);
            } else {
                allowed.extend(info.methods().methods().iter().map(|m| m.to_string()));
            }
        }

        if pattern_matches.is_empty() {
            return Ok(None);
        }
        if pattern_and_method.is_empty() && !allowed.is_empty() {
            allowed.sort();
            allowed.dedup();
            return Err(ResolveError::MethodNotAllowed {
                path: lookup_path.to_string(),
                method: request.method().to_string(),
                allowed,
            });
        }
        for info in &pattern_and_method {
            if info.params().matching(request).is_none() {
                return Err(ResolveError::UnsatisfiedCondition {
                    path: lookup_path.to_string(),
                    condition: info.params().to_string(),
                });
            }
            if info.headers().matching(request).is_none() {
                return Err(ResolveError::UnsatisfiedCondition {
                    path: lookup_path.to_string(),
                    condition: info.headers().to_string(),
                });
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{MappingRegistry, MappingRegistryBuilder};
    use axum::body::Bytes;
    use axum::http::{HeaderMap, Method, StatusCode};
    use axum::response::IntoResponse;

    struct Users;

    impl HandlerComponent<RouteSpec> for Users {
        fn name(&self) -> &str {
            "users"
        }

        fn base_attributes(&self) -> Option<RouteSpec> {
            Some(RouteSpec::new().path("/users"))
        }

        fn handler_methods(&self) -> Vec<HandlerMethodDef<RouteSpec>> {
            vec![
                HandlerMethodDef::new("list", RouteSpec::new().method(Method::GET), |_| async {
                    StatusCode::OK.into_response()
                }),
                HandlerMethodDef::new("create", RouteSpec::new().method(Method::POST), |_| async {
                    StatusCode::CREATED.into_response()
                }),
                HandlerMethodDef::new("show", RouteSpec::get("/{id}"), |_| async {
                    StatusCode::OK.into_response()
                }),
            ]
        }
    }

    fn registry() -> MappingRegistry<RouteMappingStrategy> {
        let mut builder = MappingRegistryBuilder::new(RouteMappingStrategy::new());
        builder.detect(&Users).unwrap();
        builder.freeze()
    }

    fn request(method: Method, uri: &str) -> RouteRequest {
        RouteRequest::new(method, uri.parse().unwrap(), HeaderMap::new(), Bytes::new())
    }

    #[test]
    fn test_component_base_combines_into_methods() {
        let registry = registry();
        let mut req = request(Method::GET, "/users");
        let resolved = registry.resolve(&mut req).unwrap().unwrap();
        assert_eq!(resolved.to_string(), "users#list");

        let mut req = request(Method::POST, "/users");
        let resolved = registry.resolve(&mut req).unwrap().unwrap();
        assert_eq!(resolved.to_string(), "users#create");
    }

    #[test]
    fn test_path_vars_deposited_on_match() {
        let registry = registry();
        let mut req = request(Method::GET, "/users/42");
        let resolved = registry.resolve(&mut req).unwrap().unwrap();
        assert_eq!(resolved.to_string(), "users#show");
        assert_eq!(req.path_var("id"), Some("42"));
    }

    #[test]
    fn test_method_not_allowed_lists_alternatives() {
        let registry = registry();
        let mut req = request(Method::DELETE, "/users");
        let err = registry.resolve(&mut req).unwrap_err();
        match err {
            ResolveError::MethodNotAllowed { path, method, allowed } => {
                assert_eq!(path, "/users");
                assert_eq!(method, "DELETE");
                assert_eq!(allowed, ["GET", "POST"]);
            }
            other => panic!("expected method rejection, got {other}"),
        }
    }

    #[test]
    fn test_unknown_path_is_plain_no_match() {
        let registry = registry();
        let mut req = request(Method::GET, "/orders");
        assert!(registry.resolve(&mut req).unwrap().is_none());
    }

    #[test]
    fn test_unsatisfied_param_condition_reported() {
        struct Search;
        impl HandlerComponent<RouteSpec> for Search {
            fn name(&self) -> &str {
                "search"
            }
            fn handler_methods(&self) -> Vec<HandlerMethodDef<RouteSpec>> {
                vec![HandlerMethodDef::new(
                    "query",
                    RouteSpec::get("/search").param("q"),
                    |_| async { StatusCode::OK.into_response() },
                )]
            }
        }

        let mut builder = MappingRegistryBuilder::new(RouteMappingStrategy::new());
        builder.detect(&Search).unwrap();
        let registry = builder.freeze();

        let mut req = request(Method::GET, "/search");
        let err = registry.resolve(&mut req).unwrap_err();
        match err {
            ResolveError::UnsatisfiedCondition { path, condition } => {
                assert_eq!(path, "/search");
                assert_eq!(condition, "[q]");
            }
            other => panic!("expected condition rejection, got {other}"),
        }
    }

    #[test]
    fn test_duplicate_mapping_across_components_fails() {
        struct CopyCat;
        impl HandlerComponent<RouteSpec> for CopyCat {
            fn name(&self) -> &str {
                "copycat"
            }
            fn base_attributes(&self) -> Option<RouteSpec> {
                Some(RouteSpec::new().path("/users"))
            }
            fn handler_methods(&self) -> Vec<HandlerMethodDef<RouteSpec>> {
                vec![HandlerMethodDef::new(
                    "list",
                    RouteSpec::new().method(Method::GET),
                    |_| async { StatusCode::OK.into_response() },
                )]
            }
        }

        let mut builder = MappingRegistryBuilder::new(RouteMappingStrategy::new());
        builder.detect(&Users).unwrap();
        let err = builder.detect(&CopyCat).unwrap_err();
        assert!(err.to_string().contains("users#list"));
        assert!(err.to_string().contains("copycat#list"));
    }
}
