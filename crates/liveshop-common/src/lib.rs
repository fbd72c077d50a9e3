//! # liveshop-common
//!
//! Shared infrastructure for the synchronization engine: environment-based
//! configuration and tracing setup.

pub mod config;
pub mod telemetry;

pub use config::{ConfigError, SyncConfig};
pub use telemetry::{init_tracing, try_init_tracing, TracingConfig};
