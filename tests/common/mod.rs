//! Shared fixtures for integration tests.

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::IntoResponse;

use request_mapping::config::RouterConfig;
use request_mapping::mapping::{
    HandlerComponent, HandlerMethodDef, MappingRegistry, MappingRegistryBuilder,
};
use request_mapping::request::{LookupPathHelper, RouteRequest};
use request_mapping::route::{RouteMappingStrategy, RouteSpec};

/// REST-style resource exercising literal, template, parameter and header
/// routes under one base path. Every handler answers with its own name so
/// tests can assert which one won.
pub struct UsersComponent;

impl HandlerComponent<RouteSpec> for UsersComponent {
    fn name(&self) -> &str {
        "users"
    }

    fn base_attributes(&self) -> Option<RouteSpec> {
        Some(RouteSpec::new().path("/users"))
    }

    fn handler_methods(&self) -> Vec<HandlerMethodDef<RouteSpec>> {
        vec![
            HandlerMethodDef::new("list", RouteSpec::new().method(Method::GET), |_req| async {
                "users#list".into_response()
            }),
            HandlerMethodDef::new(
                "create",
                RouteSpec::new().method(Method::POST),
                |req| async move {
                    let size = req.body().len();
                    (StatusCode::CREATED, format!("users#create:{size}")).into_response()
                },
            ),
            HandlerMethodDef::new("new_form", RouteSpec::get("/new"), |_req| async {
                "users#new_form".into_response()
            }),
            HandlerMethodDef::new("show", RouteSpec::get("/{id}"), |req| async move {
                match req.path_var("id") {
                    Some(id) => format!("users#show:{id}").into_response(),
                    None => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "missing path variable")
                            .into_response()
                    }
                }
            }),
            HandlerMethodDef::new("update", RouteSpec::put("/{id}"), |_req| async {
                "users#update".into_response()
            }),
            HandlerMethodDef::new(
                "search",
                RouteSpec::get("/search").param("q"),
                |req| async move {
                    let q = req.query_value("q").unwrap_or_default().to_string();
                    format!("users#search:{q}").into_response()
                },
            ),
            HandlerMethodDef::new(
                "admin_show",
                RouteSpec::get("/{id}").header("x-role=admin"),
                |_req| async { "users#admin_show".into_response() },
            ),
        ]
    }
}

/// Catch-all fallback; ranks below everything else.
#[allow(dead_code)]
pub struct FallbackComponent;

impl HandlerComponent<RouteSpec> for FallbackComponent {
    fn name(&self) -> &str {
        "fallback"
    }

    fn handler_methods(&self) -> Vec<HandlerMethodDef<RouteSpec>> {
        vec![HandlerMethodDef::new(
            "any",
            RouteSpec::new().path("/**").method(Method::GET),
            |_req| async { "fallback#any".into_response() },
        )]
    }
}

/// Two equally specific templates over the same paths; registration succeeds
/// but resolution of a matching request is ambiguous.
pub struct ReportsComponent;

impl HandlerComponent<RouteSpec> for ReportsComponent {
    fn name(&self) -> &str {
        "reports"
    }

    fn handler_methods(&self) -> Vec<HandlerMethodDef<RouteSpec>> {
        vec![
            HandlerMethodDef::new("by_year", RouteSpec::get("/reports/{year}"), |_req| async {
                "reports#by_year".into_response()
            }),
            HandlerMethodDef::new("by_name", RouteSpec::get("/reports/{name}"), |_req| async {
                "reports#by_name".into_response()
            }),
        ]
    }
}

/// Frozen registry over the given components, configured like the server
/// would configure it.
pub fn registry_of(
    config: &RouterConfig,
    components: &[&dyn HandlerComponent<RouteSpec>],
) -> MappingRegistry<RouteMappingStrategy> {
    let strategy = RouteMappingStrategy::with_config(config.path_match.clone());
    let helper = LookupPathHelper::from_config(&config.path_match);
    let mut builder = MappingRegistryBuilder::with_path_helper(strategy, helper);
    for component in components {
        builder.detect(*component).expect("fixture registration");
    }
    builder.freeze()
}

/// Standard fixture registry with just the users resource.
pub fn users_registry(config: &RouterConfig) -> MappingRegistry<RouteMappingStrategy> {
    registry_of(config, &[&UsersComponent])
}

#[allow(dead_code)]
pub fn request(method: Method, uri: &str) -> RouteRequest {
    RouteRequest::new(
        method,
        uri.parse().expect("test uri"),
        HeaderMap::new(),
        Bytes::new(),
    )
}

#[allow(dead_code)]
pub fn get(uri: &str) -> RouteRequest {
    request(Method::GET, uri)
}

#[allow(dead_code)]
pub fn get_with_header(uri: &str, name: &'static str, value: &str) -> RouteRequest {
    let mut headers = HeaderMap::new();
    headers.insert(name, value.parse().expect("header value"));
    RouteRequest::new(
        Method::GET,
        uri.parse().expect("test uri"),
        headers,
        Bytes::new(),
    )
}
