//! HTTP route mapping semantics.
//!
//! # Responsibilities
//! - Define the declarative route attributes components annotate methods with
//! - Evaluate pattern, method, parameter and header conditions per request
//! - Plug those semantics into the registry as a `MappingStrategy`
//!
//! # Design Decisions
//! - A mapping is the conjunction of its conditions; all must accept
//! - Matching narrows: the matched mapping keeps only what was relevant to
//!   this request (one method out of several, matched patterns best-first),
//!   so comparison operates on what actually matched
//! - Condition types are plain data with canonical ordering inside, so
//!   mapping equality is declaration-order independent
//!
//! # Data Flow
//! ```text
//! RouteSpec ──RouteInfo::from_spec──> RouteInfo (mapping key)
//!                                        │ matching_route(request)
//!                                        ▼
//!                              narrowed RouteInfo ──compare──> best
//! ```

pub mod conditions;
pub mod info;
pub mod spec;
pub mod strategy;

pub use conditions::{
    HeadersCondition, MethodsCondition, NameValueExpression, ParamsCondition, PatternsCondition,
};
pub use info::RouteInfo;
pub use spec::RouteSpec;
pub use strategy::RouteMappingStrategy;
