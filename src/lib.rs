//! Handler Method Mapping & Dispatch Library

pub mod config;
pub mod lifecycle;
pub mod mapping;
pub mod observability;
pub mod pattern;
pub mod request;
pub mod route;
pub mod server;

pub use config::schema::RouterConfig;
pub use lifecycle::Shutdown;
pub use mapping::{
    HandlerComponent, HandlerMethod, HandlerMethodDef, MappingRegistry, MappingRegistryBuilder,
    MappingStrategy, RegistrationError, ResolveError,
};
pub use request::{LookupPathHelper, RouteRequest};
pub use route::{RouteInfo, RouteMappingStrategy, RouteSpec};
pub use server::DispatchServer;
