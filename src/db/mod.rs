//! Database layer for ACDEF
//!
//! Credential loading, the store traits, the MongoDB backend and the
//! connection manager that bootstraps it.

pub mod credentials;
pub mod manager;
pub mod mongo;
pub mod schemas;
pub mod store;

pub use credentials::Credentials;
pub use manager::{ConnectionManager, ConnectionState, ConnectionStatus};
pub use mongo::{MongoConnector, MongoStore};
pub use schemas::{DocumentMap, DocumentMetadata, DocumentShape, SystemStatusDoc};
pub use store::{DocumentStore, StoreConnector};
