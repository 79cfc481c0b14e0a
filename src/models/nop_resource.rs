//! The NopResource managed resource
//!
//! A NopResource describes a pretend external resource: a list of condition
//! rules saying which condition should appear how long after creation, and a
//! list of connection details to publish every reconcile.

use super::condition::{ConditionStatus, Conditions};
use super::dynamic::DynamicObject;
use super::resource_kind::{GroupVersionKind, KIND};
use crate::controller::ManagedResource;
use crate::duration::serde_duration;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// A condition that should be set a fixed time after creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionRule {
    /// How long after creation the rule becomes eligible
    #[serde(rename = "time", with = "serde_duration")]
    pub delay: Duration,

    /// Condition type to set - e.g. Ready
    pub condition_type: String,

    /// Condition status to set - e.g. True
    pub condition_status: ConditionStatus,

    #[serde(
        rename = "conditionReason",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub reason: Option<String>,
}

impl ConditionRule {
    pub fn new(
        delay: Duration,
        condition_type: impl Into<String>,
        condition_status: ConditionStatus,
    ) -> Self {
        Self {
            delay,
            condition_type: condition_type.into(),
            condition_status,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// A connection detail to emit on every reconcile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDetail {
    #[serde(rename = "key")]
    pub name: String,
    pub value: String,
}

/// Configurable fields of a NopResource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NopResourceParameters {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub condition_after: Vec<ConditionRule>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connection_details: Vec<ConnectionDetail>,

    /// Arbitrary schemaless object; carried but never interpreted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NopResourceSpec {
    pub for_provider: NopResourceParameters,
}

/// Observable fields of a NopResource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NopResourceObservation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<serde_json::Value>,
}

impl NopResourceObservation {
    fn is_empty(&self) -> bool {
        self.fields.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NopResourceStatus {
    #[serde(default, skip_serializing_if = "Conditions::is_empty")]
    pub conditions: Conditions,

    #[serde(default, skip_serializing_if = "NopResourceObservation::is_empty")]
    pub at_provider: NopResourceObservation,
}

/// Object metadata the provider cares about
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletion_timestamp: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

/// A managed resource that does nothing but report scheduled conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NopResource {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: NopResourceSpec,
    #[serde(default)]
    pub status: NopResourceStatus,
}

impl NopResource {
    pub fn new(name: impl Into<String>, created: DateTime<Utc>) -> Self {
        Self {
            api_version: GroupVersionKind::nop_resource().api_version(),
            kind: KIND.to_string(),
            metadata: ObjectMeta {
                name: name.into(),
                creation_timestamp: Some(created),
                ..Default::default()
            },
            spec: NopResourceSpec::default(),
            status: NopResourceStatus::default(),
        }
    }

    pub fn with_rules(mut self, rules: Vec<ConditionRule>) -> Self {
        self.spec.for_provider.condition_after = rules;
        self
    }

    pub fn with_connection_details(mut self, details: Vec<ConnectionDetail>) -> Self {
        self.spec.for_provider.connection_details = details;
        self
    }
}

impl ManagedResource for NopResource {
    fn name(&self) -> &str {
        &self.metadata.name
    }

    fn creation_timestamp(&self) -> Option<DateTime<Utc>> {
        self.metadata.creation_timestamp
    }

    fn is_deleted(&self) -> bool {
        self.metadata.deletion_timestamp.is_some()
    }

    fn condition_rules(&self) -> &[ConditionRule] {
        &self.spec.for_provider.condition_after
    }

    fn connection_detail_rules(&self) -> &[ConnectionDetail] {
        &self.spec.for_provider.connection_details
    }

    fn conditions(&self) -> &Conditions {
        &self.status.conditions
    }

    fn conditions_mut(&mut self) -> &mut Conditions {
        &mut self.status.conditions
    }
}

impl TryFrom<DynamicObject> for NopResource {
    type Error = Error;

    fn try_from(obj: DynamicObject) -> Result<Self> {
        let expected = GroupVersionKind::nop_resource();
        let found = obj.gvk();
        if found != expected {
            return Err(Error::UnexpectedKind {
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }

        let name = obj.name().unwrap_or("<unnamed>").to_string();
        let raw = serde_json::to_value(&obj)
            .map_err(|e| Error::InvalidManifest(format!("{}: {}", name, e)))?;
        serde_json::from_value(raw).map_err(|e| Error::InvalidManifest(format!("{}: {}", name, e)))
    }
}

impl TryFrom<&NopResource> for DynamicObject {
    type Error = Error;

    fn try_from(resource: &NopResource) -> Result<Self> {
        serde_json::to_value(resource)
            .and_then(serde_json::from_value)
            .map_err(|e| Error::InvalidManifest(format!("{}: {}", resource.metadata.name, e)))
    }
}
