//! Shared utilities for the mongo-init workspace
//!
//! - Structured logging initialization
//! - Environment variable parsing helpers
//! - Telemetry for reporting bootstrap events

pub mod config;
pub mod logging;
pub mod telemetry;

pub use config::ConfigExt;
pub use logging::{init_logging, LogGuard};
pub use telemetry::{Telemetry, TelemetryEvent};
