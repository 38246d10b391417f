//! Database schemas for ACDEF
//!
//! Document shapes written through the connection manager.

mod metadata;
mod system_status;

pub use metadata::{canonical_timestamp, DocumentMap, DocumentMetadata, DocumentShape, FieldMap};
pub use system_status::{SystemStatusDoc, SYSTEM_STATUS_COLLECTION};
