//! Generic resource record
//!
//! A probe describes each discovered resource as an open mapping of named
//! fields. The aggregation engine only recognizes a small reserved set of
//! keys; everything else is carried through untouched into the raw JSON
//! report.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reserved key: resource type label (e.g. "instance", "bucket", "table")
pub const KEY_RESOURCE_TYPE: &str = "resource_type";
/// Reserved key: provider-side resource identifier
pub const KEY_RESOURCE_ID: &str = "resource_id";
/// Reserved key: human-readable name, when the provider has one
pub const KEY_NAME: &str = "name";
/// Reserved key: region the resource belongs to
pub const KEY_REGION: &str = "region";

/// One discovered cloud resource, as an open field mapping
///
/// Serialized transparently, so a record is exactly its field map in the
/// JSON report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceRecord {
    fields: BTreeMap<String, serde_json::Value>,
}

impl ResourceRecord {
    /// Create a record with the two reserved keys every probe must fill
    pub fn new(resource_type: impl Into<String>, resource_id: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(
            KEY_RESOURCE_TYPE.to_string(),
            serde_json::Value::String(resource_type.into()),
        );
        fields.insert(
            KEY_RESOURCE_ID.to_string(),
            serde_json::Value::String(resource_id.into()),
        );
        Self { fields }
    }

    /// Builder-style field setter
    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Builder-style setter that skips `None`
    pub fn with_opt(
        self,
        key: impl Into<String>,
        value: Option<impl Into<serde_json::Value>>,
    ) -> Self {
        match value {
            Some(v) => self.with(key, v),
            None => self,
        }
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.fields.get(key)
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(|v| v.as_str())
    }

    pub fn resource_type(&self) -> Option<&str> {
        self.get_str(KEY_RESOURCE_TYPE)
    }

    pub fn resource_id(&self) -> Option<&str> {
        self.get_str(KEY_RESOURCE_ID)
    }

    pub fn name(&self) -> Option<&str> {
        self.get_str(KEY_NAME)
    }

    pub fn region(&self) -> Option<&str> {
        self.get_str(KEY_REGION)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.fields.iter()
    }
}
