//! MongoDB document store
//!
//! One client per store, a `ping` on connect so unreachable servers fail
//! fast, and explicit error mapping on every driver call.

use async_trait::async_trait;
use bson::{doc, Bson, Document};
use mongodb::{
    options::{ClientOptions, Credential},
    Client,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::Config;
use crate::db::credentials::Credentials;
use crate::db::schemas::DocumentMap;
use crate::db::store::{DocumentStore, StoreConnector};
use crate::types::{AcdefError, Result};

/// Opens [`MongoStore`] connections using settings from the [`Config`]
#[derive(Debug, Clone)]
pub struct MongoConnector {
    app_name: String,
    project_id: String,
    timeout: Duration,
}

impl MongoConnector {
    pub fn new(config: &Config) -> Self {
        Self {
            app_name: config.system().name.clone(),
            project_id: config.store().project_id.clone(),
            timeout: config.network().timeout(),
        }
    }

    /// Driver options for the given credentials
    pub async fn client_options(&self, credentials: &Credentials) -> Result<ClientOptions> {
        let mut options = ClientOptions::parse(credentials.uri.as_str())
            .await
            .map_err(|e| AcdefError::Database(format!("Invalid MongoDB URI: {}", e)))?;

        options.app_name = Some(self.app_name.clone());
        // Bound server selection so an unreachable MongoDB fails the attempt
        if !self.timeout.is_zero() {
            options.server_selection_timeout = Some(self.timeout);
            options.connect_timeout = Some(self.timeout);
        }

        if let Some(username) = &credentials.username {
            let mut credential = Credential::default();
            credential.username = Some(username.clone());
            credential.password = credentials.password.clone();
            options.credential = Some(credential);
        }

        Ok(options)
    }
}

#[async_trait]
impl StoreConnector for MongoConnector {
    async fn connect(&self, credentials: &Credentials) -> Result<Arc<dyn DocumentStore>> {
        let db_name = credentials.database_or(&self.project_id).to_string();
        info!("Connecting to MongoDB database '{}'", db_name);

        let options = self.client_options(credentials).await?;
        let client = Client::with_options(options)
            .map_err(|e| AcdefError::Database(format!("Failed to connect to MongoDB: {}", e)))?;

        let store = MongoStore { client, db_name };
        store.ping().await?;

        info!("Connected to MongoDB database '{}'", store.db_name);
        Ok(Arc::new(store))
    }
}

/// Connected MongoDB database
#[derive(Clone, Debug)]
pub struct MongoStore {
    client: Client,
    db_name: String,
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn ping(&self) -> Result<()> {
        self.client
            .database(&self.db_name)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| AcdefError::Database(format!("MongoDB ping failed: {}", e)))?;
        Ok(())
    }

    async fn insert(&self, collection: &str, document: DocumentMap) -> Result<String> {
        let document = to_bson_document(&document)?;

        let result = self
            .client
            .database(&self.db_name)
            .collection::<Document>(collection)
            .insert_one(document)
            .await
            .map_err(|e| AcdefError::Database(format!("Insert failed: {}", e)))?;

        Ok(match result.inserted_id {
            Bson::ObjectId(oid) => oid.to_hex(),
            Bson::String(id) => id,
            other => other.to_string(),
        })
    }
}

/// Convert a normalized document to BSON; a present `id` becomes `_id`
pub fn to_bson_document(document: &DocumentMap) -> Result<Document> {
    let mut bson_doc = bson::to_document(document)?;
    if let Some(id) = bson_doc.remove("id") {
        bson_doc.insert("_id", id);
    }
    Ok(bson_doc)
}
