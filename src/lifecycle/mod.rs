//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main):
//!     Load config → Validate → Register components → Freeze registry
//!     → Start dispatch server
//!
//! Shutdown (shutdown.rs):
//!     Ctrl-C / trigger() → broadcast → server stops accepting → drain → exit
//! ```
//!
//! # Design Decisions
//! - Registration happens strictly before serving; the frozen registry is
//!   the startup/runtime boundary
//! - One broadcast channel fans the shutdown signal out to every task

pub mod shutdown;

pub use shutdown::Shutdown;
