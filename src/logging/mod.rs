//! Logging infrastructure for ACDEF
//!
//! Routes `tracing` events to a per-system log file and the console.

pub mod bootstrap;

pub use bootstrap::{attached_sinks, configure, resolve_level, LoggerHandle, SinkKind};
