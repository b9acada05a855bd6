//! Ant-style path pattern support.
//!
//! # Syntax
//! - `?` matches exactly one character within a segment
//! - `*` matches zero or more characters within a segment
//! - `**` matches zero or more whole segments
//! - `{var}` matches one segment and captures it as a template variable
//!
//! # Design Decisions
//! - Segment-wise matching; `/` is never consumed by `?`, `*` or `{var}`
//! - Patterns are matched on demand, no compilation cache (route tables are
//!   small and resolution is bounded by the candidate set anyway)
//! - Specificity ordering is a total order over patterns for a given request
//!   path, so matched patterns can be sorted best-first

pub mod matcher;
pub mod rank;

pub use matcher::{combine, extract_vars, is_pattern, matches};
pub use rank::compare_specificity;
