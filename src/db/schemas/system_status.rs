//! System status documents
//!
//! One record per process start, written once the store connection is ready.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::metadata::{DocumentMetadata, DocumentShape, FieldMap};
use crate::config::Config;
use crate::db::manager::ConnectionStatus;

/// Collection name (before the configured prefix)
pub const SYSTEM_STATUS_COLLECTION: &str = "system_status";

/// Startup record for a running ACDEF process
#[derive(Clone, Debug)]
pub struct SystemStatusDoc {
    pub metadata: DocumentMetadata,
    pub session_id: Uuid,
    pub system_name: String,
    pub version: String,
    pub connection_state: String,
    pub connection_attempts: u32,
    pub last_heartbeat: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

impl SystemStatusDoc {
    pub fn new(config: &Config, status: &ConnectionStatus) -> Self {
        Self {
            metadata: DocumentMetadata::new(),
            session_id: Uuid::new_v4(),
            system_name: config.system().name.clone(),
            version: config.system().version.clone(),
            connection_state: status.state.as_str().to_string(),
            connection_attempts: status.attempts,
            last_heartbeat: status.last_heartbeat,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

impl DocumentShape for SystemStatusDoc {
    fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    fn write_fields(&self, fields: &mut FieldMap) {
        fields
            .insert("session_id", self.session_id.to_string())
            .insert("system_name", self.system_name.clone())
            .insert("version", self.version.clone())
            .insert("connection_state", self.connection_state.clone())
            .insert("connection_attempts", self.connection_attempts)
            .optional("note", self.note.clone());
        if let Some(ts) = &self.last_heartbeat {
            fields.timestamp("last_heartbeat", ts);
        }
    }
}
