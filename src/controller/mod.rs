//! Reconciliation step
//!
//! One observation cycle for a managed resource: work out the resource's age,
//! ask the scheduler which conditions are due, upsert them into the status,
//! and report the pretend external resource as existing and up to date.
//!
//! There is no external system behind a NopResource, so nothing is ever
//! created, updated or deleted. The observation only exists so the host
//! sees a lifecycle status every cycle.

mod external;

pub use external::*;

use crate::models::{ConditionRule, Conditions, ConnectionDetail};
use crate::scheduler;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::time::Duration;

/// Connection details published for a resource, keyed by name
pub type ConnectionDetails = BTreeMap<String, Vec<u8>>;

/// Poll interval used when none is configured
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Capabilities the reconciliation step needs from a managed resource
pub trait ManagedResource {
    fn name(&self) -> &str;

    /// When the resource was created, if the host has recorded it yet
    fn creation_timestamp(&self) -> Option<DateTime<Utc>>;

    /// True once the host has marked the resource for deletion
    fn is_deleted(&self) -> bool;

    fn condition_rules(&self) -> &[ConditionRule];

    fn connection_detail_rules(&self) -> &[ConnectionDetail];

    fn conditions(&self) -> &Conditions;

    fn conditions_mut(&mut self) -> &mut Conditions;
}

/// Source of the current time
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock stopped at one instant
///
/// Evaluates resources at a chosen time, e.g. creation plus a given age.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Result of observing the pretend external resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Observation {
    pub resource_exists: bool,
    pub resource_up_to_date: bool,
    /// How long the host should wait before the next cycle
    pub requeue_after: Duration,
    pub connection_details: ConnectionDetails,
}

/// Age of a resource at `now`
///
/// A resource the host has not stamped yet was created just now. A creation
/// time in the future means clock skew and counts as zero age.
pub fn resource_age(created: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Duration {
    created
        .and_then(|created| (now - created).to_std().ok())
        .unwrap_or(Duration::ZERO)
}

/// Connection details emitted verbatim from the resource's declared list
pub fn connection_details<R: ManagedResource + ?Sized>(resource: &R) -> ConnectionDetails {
    resource
        .connection_detail_rules()
        .iter()
        .map(|detail| (detail.name.clone(), detail.value.clone().into_bytes()))
        .collect()
}

/// Run one observation cycle at `now`
///
/// A deleted resource is reported as gone without computing any conditions,
/// which lets the host finish deletion. Otherwise every condition the
/// scheduler returns is upserted into the resource's status; condition types
/// the scheduler does not return are left as they are.
pub fn observe<R: ManagedResource + ?Sized>(
    resource: &mut R,
    now: DateTime<Utc>,
    poll_interval: Duration,
) -> Observation {
    if resource.is_deleted() {
        tracing::debug!(resource = resource.name(), "Resource was deleted");
        return Observation {
            resource_exists: false,
            requeue_after: poll_interval,
            ..Default::default()
        };
    }

    let age = resource_age(resource.creation_timestamp(), now);
    let due = scheduler::resolve_at(resource.condition_rules(), age, now);

    tracing::debug!(
        resource = resource.name(),
        age = ?age,
        due = due.len(),
        "Observed resource"
    );

    let conditions = resource.conditions_mut();
    for condition in due {
        conditions.upsert(condition);
    }

    Observation {
        resource_exists: true,
        resource_up_to_date: true,
        requeue_after: poll_interval,
        connection_details: connection_details(resource),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Condition, ConditionStatus, NopResource};

    fn created() -> DateTime<Utc> {
        "2024-01-01T12:00:00Z".parse().unwrap()
    }

    fn secs(n: i64) -> chrono::Duration {
        chrono::Duration::seconds(n)
    }

    fn example() -> NopResource {
        NopResource::new("example", created())
            .with_rules(vec![
                ConditionRule::new(Duration::from_secs(2), "Ready", ConditionStatus::False),
                ConditionRule::new(Duration::from_secs(6), "Ready", ConditionStatus::True),
            ])
            .with_connection_details(vec![ConnectionDetail {
                name: "password".to_string(),
                value: "hunter2".to_string(),
            }])
    }

    #[test]
    fn test_resource_age() {
        let now = created() + secs(8);
        assert_eq!(resource_age(Some(created()), now), Duration::from_secs(8));
        assert_eq!(resource_age(Some(now + secs(1)), now), Duration::ZERO);
        assert_eq!(resource_age(None, now), Duration::ZERO);
    }

    #[test]
    fn test_observe_upserts_due_conditions() {
        let mut nop = example();
        let now = created() + secs(7);

        let observation = observe(&mut nop, now, DEFAULT_POLL_INTERVAL);

        assert!(observation.resource_exists);
        assert!(observation.resource_up_to_date);
        assert_eq!(observation.requeue_after, DEFAULT_POLL_INTERVAL);
        assert_eq!(
            observation.connection_details.get("password"),
            Some(&b"hunter2".to_vec())
        );
        let ready = nop.conditions().get("Ready").unwrap();
        assert_eq!(ready.status, ConditionStatus::True);
        assert_eq!(ready.last_transition_time, now);
    }

    #[test]
    fn test_observe_deleted_short_circuits() {
        let mut nop = example();
        nop.metadata.deletion_timestamp = Some(created() + secs(1));

        let observation = observe(&mut nop, created() + secs(10), Duration::from_secs(5));

        assert!(!observation.resource_exists);
        assert!(!observation.resource_up_to_date);
        assert!(observation.connection_details.is_empty());
        assert!(nop.conditions().is_empty());
    }

    #[test]
    fn test_observe_leaves_unrelated_conditions() {
        let mut nop = example();
        nop.conditions_mut()
            .upsert(Condition::reconcile_success(created()));

        observe(&mut nop, created() + secs(3), DEFAULT_POLL_INTERVAL);

        assert_eq!(nop.conditions().len(), 2);
        assert_eq!(
            nop.conditions().status_of("Synced"),
            Some(ConditionStatus::True)
        );
        assert_eq!(
            nop.conditions().status_of("Ready"),
            Some(ConditionStatus::False)
        );
    }

    #[test]
    fn test_observe_with_mock_clock() {
        let mut clock = MockClock::new();
        clock.expect_now().times(1).return_const(created() + secs(1));

        let mut nop = example();
        observe(&mut nop, clock.now(), DEFAULT_POLL_INTERVAL);

        // Nothing is due one second in
        assert!(nop.conditions().is_empty());
    }
}
