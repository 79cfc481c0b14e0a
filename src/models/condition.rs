//! Status conditions
//!
//! A condition is one named status dimension of a managed resource (e.g.
//! `Ready`, `Synced`). Condition types are open-ended strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Condition type reporting whether the resource is ready for use
pub const TYPE_READY: &str = "Ready";

/// Condition type reporting whether the last reconcile succeeded
pub const TYPE_SYNCED: &str = "Synced";

/// Reason set by the host after a successful reconcile
pub const REASON_RECONCILE_SUCCESS: &str = "ReconcileSuccess";

/// Reason set by the host after a failed reconcile
pub const REASON_RECONCILE_ERROR: &str = "ReconcileError";

/// Status of a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
}

impl ConditionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionStatus::True => "True",
            ConditionStatus::False => "False",
            ConditionStatus::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConditionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "True" => Ok(ConditionStatus::True),
            "False" => Ok(ConditionStatus::False),
            "Unknown" => Ok(ConditionStatus::Unknown),
            _ => Err(format!("Unknown condition status: {}", s)),
        }
    }
}

/// The observed value of one condition type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: String,

    pub status: ConditionStatus,

    /// When this status was last computed and applied
    pub last_transition_time: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Condition {
    pub fn new(
        condition_type: impl Into<String>,
        status: ConditionStatus,
        last_transition_time: DateTime<Utc>,
    ) -> Self {
        Self {
            condition_type: condition_type.into(),
            status,
            last_transition_time,
            reason: None,
            message: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// `Synced=True` after a reconcile that completed without error
    pub fn reconcile_success(now: DateTime<Utc>) -> Self {
        Self::new(TYPE_SYNCED, ConditionStatus::True, now).with_reason(REASON_RECONCILE_SUCCESS)
    }

    /// `Synced=False` carrying the error that failed the reconcile
    pub fn reconcile_error(now: DateTime<Utc>, message: impl Into<String>) -> Self {
        Self::new(TYPE_SYNCED, ConditionStatus::False, now)
            .with_reason(REASON_RECONCILE_ERROR)
            .with_message(message)
    }

    /// True if both conditions carry the same value, ignoring transition time
    pub fn same_state(&self, other: &Condition) -> bool {
        self.condition_type == other.condition_type
            && self.status == other.status
            && self.reason == other.reason
            && self.message == other.message
    }
}

/// The conditions of a resource, at most one per condition type
///
/// Serialized as a plain list so it reads like any other Kubernetes
/// `status.conditions` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conditions(Vec<Condition>);

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the condition of the same type
    ///
    /// Conditions of other types are left untouched and keep their position.
    pub fn upsert(&mut self, condition: Condition) {
        match self
            .0
            .iter_mut()
            .find(|existing| existing.condition_type == condition.condition_type)
        {
            Some(existing) => *existing = condition,
            None => self.0.push(condition),
        }
    }

    pub fn get(&self, condition_type: &str) -> Option<&Condition> {
        self.0
            .iter()
            .find(|condition| condition.condition_type == condition_type)
    }

    /// Status of the given condition type, if present
    pub fn status_of(&self, condition_type: &str) -> Option<ConditionStatus> {
        self.get(condition_type).map(|condition| condition.status)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Condition> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Condition> for Conditions {
    fn from_iter<I: IntoIterator<Item = Condition>>(iter: I) -> Self {
        let mut conditions = Conditions::new();
        for condition in iter {
            conditions.upsert(condition);
        }
        conditions
    }
}

impl<'a> IntoIterator for &'a Conditions {
    type Item = &'a Condition;
    type IntoIter = std::slice::Iter<'a, Condition>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
