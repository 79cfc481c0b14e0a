//! Untyped resource handles
//!
//! The host hands resources around as dynamic objects: an `apiVersion`, a
//! `kind`, and an arbitrary body. Typed access goes through `TryFrom`, which
//! checks the kind first. Status conditions can be read and written without
//! knowing the kind, because every managed resource carries them at
//! `status.conditions`.

use super::condition::{Condition, Conditions};
use super::resource_kind::GroupVersionKind;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A resource of any kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicObject {
    #[serde(default)]
    pub api_version: String,

    #[serde(default)]
    pub kind: String,

    /// Everything else: metadata, spec, status
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl DynamicObject {
    pub fn gvk(&self) -> GroupVersionKind {
        GroupVersionKind::from_api_version(&self.api_version, &self.kind)
    }

    pub fn name(&self) -> Option<&str> {
        self.metadata_field("name").and_then(Value::as_str)
    }

    pub fn creation_timestamp(&self) -> Option<DateTime<Utc>> {
        self.metadata_field("creationTimestamp")
            .and_then(|ts| serde_json::from_value(ts.clone()).ok())
    }

    /// Stamp a creation timestamp unless one is already set
    ///
    /// Returns true if the timestamp was written.
    pub fn ensure_creation_timestamp(&mut self, now: DateTime<Utc>) -> bool {
        if self.metadata_field("creationTimestamp").is_some_and(|ts| !ts.is_null()) {
            return false;
        }
        let metadata = object_entry(&mut self.data, "metadata");
        metadata.insert("creationTimestamp".to_string(), Value::String(now.to_rfc3339()));
        true
    }

    /// Read `status.conditions`
    pub fn conditions(&self) -> Result<Conditions> {
        match self.data.get("status").and_then(|s| s.get("conditions")) {
            None | Some(Value::Null) => Ok(Conditions::new()),
            Some(raw) => serde_json::from_value(raw.clone()).map_err(|e| {
                Error::InvalidManifest(format!("malformed status.conditions: {}", e))
            }),
        }
    }

    /// Insert or overwrite one condition in `status.conditions`
    pub fn set_condition(&mut self, condition: Condition) -> Result<()> {
        let mut conditions = self.conditions()?;
        conditions.upsert(condition);
        let raw = serde_json::to_value(&conditions)
            .map_err(|e| Error::InvalidManifest(format!("cannot encode conditions: {}", e)))?;
        let status = object_entry(&mut self.data, "status");
        status.insert("conditions".to_string(), raw);
        Ok(())
    }

    fn metadata_field(&self, field: &str) -> Option<&Value> {
        self.data.get("metadata").and_then(|m| m.get(field))
    }
}

/// Get a nested object, replacing anything that is not an object
fn object_entry<'a>(data: &'a mut Map<String, Value>, key: &str) -> &'a mut Map<String, Value> {
    let entry = data
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() {
        *entry = Value::Object(Map::new());
    }
    match entry {
        Value::Object(map) => map,
        _ => unreachable!("entry was just replaced with an object"),
    }
}
