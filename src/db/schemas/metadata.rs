//! Common metadata and normalization for all documents
//!
//! Documents are written as flat maps: identity and timestamps first, then
//! the record's own fields. Absent values are omitted, never written as null.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

/// Persistence-ready document body
pub type DocumentMap = Map<String, Value>;

/// Render a timestamp as fixed-precision, lexicographically sortable UTC text
pub fn canonical_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Identity and timestamps shared by every document kind
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentMetadata {
    /// Assigned by the store on first write
    pub id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentMetadata {
    /// Create new metadata with current timestamp
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Builder for a document's field map that drops absent values
#[derive(Debug, Default)]
pub struct FieldMap {
    fields: DocumentMap,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value; `null` counts as absent
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        if !value.is_null() {
            self.fields.insert(key.to_string(), value);
        }
        self
    }

    /// Insert only when the value is present
    pub fn optional<V: Into<Value>>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.insert(key, value);
        }
        self
    }

    pub fn timestamp(&mut self, key: &str, ts: &DateTime<Utc>) -> &mut Self {
        self.insert(key, canonical_timestamp(ts))
    }

    pub fn into_map(self) -> DocumentMap {
        self.fields
    }
}

/// A record kind that can be written to the document store
pub trait DocumentShape {
    fn metadata(&self) -> &DocumentMetadata;

    /// Add the record's own fields (metadata is handled by `normalize`)
    fn write_fields(&self, fields: &mut FieldMap);

    /// Persistence-ready map of every present field
    fn normalize(&self) -> DocumentMap {
        let metadata = self.metadata();
        let mut fields = FieldMap::new();
        fields
            .optional("id", metadata.id.clone())
            .timestamp("created_at", &metadata.created_at)
            .timestamp("updated_at", &metadata.updated_at);
        self.write_fields(&mut fields);
        fields.into_map()
    }
}
