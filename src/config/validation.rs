//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, body limit > 0)
//! - Check that addresses parse before anything tries to bind them
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::RouterConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `server.bind_address`.
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration, collecting every failure.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "server.bind_address".to_string(),
            message: format!("not a valid socket address: {}", config.server.bind_address),
        });
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "server.request_timeout_secs".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }
    if config.server.max_body_bytes == 0 {
        errors.push(ValidationError {
            field: "server.max_body_bytes".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.as_str()) {
        errors.push(ValidationError {
            field: "observability.log_level".to_string(),
            message: format!(
                "unknown level {:?}, expected one of {}",
                config.observability.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError {
            field: "observability.metrics_address".to_string(),
            message: format!(
                "not a valid socket address: {}",
                config.observability.metrics_address
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
