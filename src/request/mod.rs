//! Request-side input to mapping resolution.
//!
//! # Responsibilities
//! - Carry the parts of an HTTP request that conditions inspect
//!   (method, path, query, headers) plus the buffered body
//! - Derive the lookup path used for pattern matching from the raw URI
//!
//! # Design Decisions
//! - `RouteRequest` owns its data; resolution never touches the wire types
//!   beyond construction, so it is equally usable from tests
//! - Path variables live on the request and are filled in by the matched
//!   mapping, not by the caller

pub mod lookup_path;
pub mod route_request;

pub use lookup_path::LookupPathHelper;
pub use route_request::RouteRequest;
