//! Registry and resolution error types.

use thiserror::Error;

/// Fatal registration-time failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// The same mapping key was registered for two different handler methods.
    #[error("ambiguous mapping: cannot map {incoming} to {mapping}, already mapped to {existing}")]
    DuplicateMapping {
        mapping: String,
        existing: String,
        incoming: String,
    },
}

/// Resolution-time failures surfaced to the caller.
///
/// `Ok(None)` from resolution means plain not-found; these variants carry the
/// cases that deserve a more specific answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Two mappings matched the request and the comparator could not order
    /// them. Always a registration bug, never a client error.
    #[error("ambiguous handler methods mapped for path '{path}': {first} and {second}")]
    Ambiguous {
        path: String,
        first: String,
        second: String,
    },

    /// A mapping matched the path but not the request method.
    #[error("request method {method} not supported for path '{path}'")]
    MethodNotAllowed {
        path: String,
        method: String,
        /// Methods that would have been accepted, sorted and deduplicated.
        allowed: Vec<String>,
    },

    /// A mapping matched the path and method but a parameter or header
    /// expectation failed.
    #[error("request conditions not met for path '{path}': {condition}")]
    UnsatisfiedCondition { path: String, condition: String },
}
