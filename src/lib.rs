//! ACDEF - Autonomous Cross-Domain Evolutionary Fabric
//!
//! Configuration and document-store connection layer. Everything else in the
//! fabric is configured by the record built here and persists through the
//! connection bootstrapped here.
//!
//! ## Components
//!
//! - **Config**: validated, read-only configuration record with defaults
//! - **Logging**: file + console sinks, attached once per system name
//! - **ConnectionManager**: idempotent, retry-bounded store initialization
//! - **DocumentShape**: normalization of records before they are written

pub mod cli;
pub mod config;
pub mod db;
pub mod logging;
pub mod types;

pub use config::Config;
pub use db::{ConnectionManager, DocumentShape};
pub use types::{AcdefError, Result};
