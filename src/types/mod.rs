//! Shared types for ACDEF

pub mod error;

pub use error::{AcdefError, Result};
