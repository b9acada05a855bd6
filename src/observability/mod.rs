//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! dispatch & registry produce:
//!     → structured log events (tracing crate, initialized in main)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through all log events via the dispatch middleware
//! - Metrics are cheap (atomic increments behind the recorder)
//! - The exporter runs its own listener; the dispatch server is untouched

pub mod metrics;
