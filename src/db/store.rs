//! Document store seams
//!
//! The connection manager only needs to open a store and hand it normalized
//! documents. MongoDB implements both traits in [`crate::db::mongo`].

use async_trait::async_trait;
use std::sync::Arc;

use crate::db::credentials::Credentials;
use crate::db::schemas::DocumentMap;
use crate::types::Result;

/// An established connection to the document store
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug {
    /// Round-trip to verify the connection is alive
    async fn ping(&self) -> Result<()>;

    /// Insert a normalized document, returning the store-assigned id
    async fn insert(&self, collection: &str, document: DocumentMap) -> Result<String>;
}

/// Opens connections to the document store
#[async_trait]
pub trait StoreConnector: Send + Sync {
    async fn connect(&self, credentials: &Credentials) -> Result<Arc<dyn DocumentStore>>;
}
