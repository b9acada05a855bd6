//! Handler method registry and resolution core.
//!
//! # Responsibilities
//! - Detect handler methods on components and register them under mapping keys
//! - Reject conflicting registrations while the registry is still mutable
//! - Resolve a request to the single best-matching handler method
//!
//! # Design Decisions
//! - Mapping semantics are pluggable: the registry only does bookkeeping,
//!   a `MappingStrategy` defines derivation, matching and ordering
//! - Two-phase lifecycle: a mutable builder is frozen into an immutable
//!   registry, so resolution needs no locks
//! - Literal request paths are indexed for direct candidate lookup; the
//!   full scan is the fallback for pattern-only paths
//!
//! # Data Flow
//! ```text
//! components ──detect──> builder (mapping → handler, path → mappings)
//!                           │ freeze
//!                           ▼
//! request ──lookup path──> registry ──narrow/sort──> best handler method
//! ```

pub mod component;
pub mod error;
pub mod handler;
pub mod registry;
pub mod strategy;

pub use component::{HandlerComponent, HandlerMethodDef};
pub use error::{RegistrationError, ResolveError};
pub use handler::{HandlerFn, HandlerFuture, HandlerMethod};
pub use registry::{MappingRegistry, MappingRegistryBuilder};
pub use strategy::MappingStrategy;
