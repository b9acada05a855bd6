//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the dispatch server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Server configuration (bind address, limits).
    pub server: ServerConfig,

    /// Request path interpretation settings.
    pub path_match: PathMatchConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            request_timeout_secs: 30,
            max_body_bytes: 1_048_576,
        }
    }
}

/// Settings controlling how request paths are interpreted during lookup
/// and how patterns are applied to them.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathMatchConfig {
    /// Percent-decode the request path before matching.
    pub url_decode: bool,

    /// Strip `;jsessionid=...` style matrix parameters before matching.
    pub remove_semicolon_content: bool,

    /// Let `/users` patterns also match `/users/`.
    pub use_trailing_slash_match: bool,

    /// Let `/users` patterns also match `/users.json` via an implicit `.*`.
    pub use_suffix_pattern_match: bool,
}

impl Default for PathMatchConfig {
    fn default() -> Self {
        Self {
            url_decode: true,
            remove_semicolon_content: true,
            use_trailing_slash_match: true,
            use_suffix_pattern_match: false,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics exporter.
    pub metrics_enabled: bool,

    /// Metrics exporter bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
