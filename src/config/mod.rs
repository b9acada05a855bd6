//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RouterConfig (validated, immutable)
//!     → shared with the dispatch server and path helper
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no hot reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::ObservabilityConfig;
pub use schema::PathMatchConfig;
pub use schema::RouterConfig;
pub use schema::ServerConfig;
