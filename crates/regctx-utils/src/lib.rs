//! # regctx Utilities
//!
//! Shared logging and configuration helpers for the regctx workspace.
//!
//! The library crate `regctx-core` only emits `tracing` events; binaries use
//! this crate to decide where those events go.

pub mod logging;

// Re-export commonly used logging functions for convenience
pub use logging::{
    init_logging, init_logging_with_config, init_logging_with_level, LogConfig, LogFormat, LogLevel, LoggingError,
    LoggingGuard,
};
pub use tracing::{debug, error, info, trace, warn};
