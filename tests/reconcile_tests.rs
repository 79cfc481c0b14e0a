//! Tests for the reconciliation step
//!
//! Covers both the typed `observe` entry point and the dynamic-object path
//! the host uses through `NopConnector`.

use chrono::{DateTime, Utc};
use provider_nop::controller::{DEFAULT_POLL_INTERVAL, resource_age};
use provider_nop::{
    ConditionRule, ConditionStatus, ConnectionDetail, DynamicObject, Error, ExternalConnector,
    FixedClock, ManagedResource, NopConnector, NopResource, observe,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn created() -> DateTime<Utc> {
    "2024-01-01T12:00:00Z".parse().unwrap()
}

fn after(secs: i64) -> DateTime<Utc> {
    created() + chrono::Duration::seconds(secs)
}

fn flapping() -> NopResource {
    NopResource::new("flapping", created())
        .with_rules(vec![
            ConditionRule::new(Duration::from_secs(2), "Ready", ConditionStatus::False),
            ConditionRule::new(Duration::from_secs(5), "Ready", ConditionStatus::True)
                .with_reason("Available"),
            ConditionRule::new(Duration::from_secs(5), "Synced", ConditionStatus::True),
        ])
        .with_connection_details(vec![
            ConnectionDetail {
                name: "username".to_string(),
                value: "admin".to_string(),
            },
            ConnectionDetail {
                name: "password".to_string(),
                value: "hunter2".to_string(),
            },
        ])
}

fn manifest(rules: serde_json::Value) -> DynamicObject {
    serde_json::from_value(json!({
        "apiVersion": "nop.crossplane.io/v1alpha1",
        "kind": "NopResource",
        "metadata": { "name": "example", "creationTimestamp": "2024-01-01T12:00:00Z" },
        "spec": { "forProvider": { "conditionAfter": rules } }
    }))
    .unwrap()
}

#[test]
fn test_conditions_progress_over_cycles() {
    let mut nop = flapping();

    observe(&mut nop, after(1), DEFAULT_POLL_INTERVAL);
    assert!(nop.conditions().is_empty());

    observe(&mut nop, after(3), DEFAULT_POLL_INTERVAL);
    assert_eq!(
        nop.conditions().status_of("Ready"),
        Some(ConditionStatus::False)
    );
    assert_eq!(nop.conditions().status_of("Synced"), None);

    observe(&mut nop, after(6), DEFAULT_POLL_INTERVAL);
    let ready = nop.conditions().get("Ready").unwrap();
    assert_eq!(ready.status, ConditionStatus::True);
    assert_eq!(ready.reason.as_deref(), Some("Available"));
    assert_eq!(
        nop.conditions().status_of("Synced"),
        Some(ConditionStatus::True)
    );
    assert_eq!(nop.conditions().len(), 2);
}

#[test]
fn test_each_cycle_restamps_transition_time() {
    let mut nop = flapping();

    observe(&mut nop, after(6), DEFAULT_POLL_INTERVAL);
    observe(&mut nop, after(66), DEFAULT_POLL_INTERVAL);

    assert_eq!(
        nop.conditions().get("Ready").unwrap().last_transition_time,
        after(66)
    );
}

#[test]
fn test_connection_details_every_cycle() {
    let mut nop = flapping();

    for secs in [0, 3, 30] {
        let observation = observe(&mut nop, after(secs), DEFAULT_POLL_INTERVAL);
        assert_eq!(observation.connection_details.len(), 2);
        assert_eq!(
            observation.connection_details.get("username"),
            Some(&b"admin".to_vec())
        );
        assert_eq!(
            observation.connection_details.get("password"),
            Some(&b"hunter2".to_vec())
        );
    }
}

#[test]
fn test_observation_always_exists_and_up_to_date() {
    let mut nop = NopResource::new("empty", created());
    let poll = Duration::from_secs(15);

    let observation = observe(&mut nop, after(100), poll);

    assert!(observation.resource_exists);
    assert!(observation.resource_up_to_date);
    assert_eq!(observation.requeue_after, poll);
    assert!(observation.connection_details.is_empty());
    assert!(nop.conditions().is_empty());
}

#[test]
fn test_future_creation_time_counts_as_age_zero() {
    let mut nop = NopResource::new("skewed", after(60)).with_rules(vec![
        ConditionRule::new(Duration::ZERO, "Ready", ConditionStatus::Unknown),
        ConditionRule::new(Duration::from_secs(1), "Ready", ConditionStatus::True),
    ]);

    observe(&mut nop, created(), DEFAULT_POLL_INTERVAL);

    assert_eq!(resource_age(nop.creation_timestamp(), created()), Duration::ZERO);
    assert_eq!(
        nop.conditions().status_of("Ready"),
        Some(ConditionStatus::Unknown)
    );
}

#[test]
fn test_deleted_resource_reports_gone() {
    let mut nop = flapping();
    nop.metadata.deletion_timestamp = Some(after(1));

    let observation = observe(&mut nop, after(10), DEFAULT_POLL_INTERVAL);

    assert!(!observation.resource_exists);
    assert!(nop.conditions().is_empty());
}

#[tokio::test]
async fn test_connector_observes_dynamic_object() {
    let connector = NopConnector::new(Arc::new(FixedClock(after(8))), Duration::from_secs(20));
    let mut obj = manifest(json!([
        { "time": "5s", "conditionType": "Ready", "conditionStatus": "False" },
        { "time": "7s", "conditionType": "Ready", "conditionStatus": "True" },
    ]));

    let client = connector.connect(&obj).await.unwrap();
    let observation = client.observe(&mut obj).await.unwrap();

    assert_eq!(observation.requeue_after, Duration::from_secs(20));
    let conditions = obj.conditions().unwrap();
    assert_eq!(conditions.status_of("Ready"), Some(ConditionStatus::True));
    assert_eq!(conditions.get("Ready").unwrap().last_transition_time, after(8));
}

#[tokio::test]
async fn test_connector_only_touches_status_conditions() {
    let connector = NopConnector::new(Arc::new(FixedClock(after(8))), DEFAULT_POLL_INTERVAL);
    let mut obj = manifest(json!([
        { "time": "5s", "conditionType": "Ready", "conditionStatus": "True" },
    ]));
    obj.data["metadata"]["uid"] = json!("0b6c5f7e-7d1a-4f43-a7a5-1d2b9f1c3e4a");
    obj.data["metadata"]["finalizers"] = json!(["finalizer.managedresource.crossplane.io"]);
    obj.data["spec"]["providerConfigRef"] = json!({ "name": "default" });
    obj.data["spec"]["deletionPolicy"] = json!("Orphan");

    let client = connector.connect(&obj).await.unwrap();
    client.observe(&mut obj).await.unwrap();

    assert_eq!(obj.data["metadata"]["uid"], "0b6c5f7e-7d1a-4f43-a7a5-1d2b9f1c3e4a");
    assert_eq!(
        obj.data["metadata"]["finalizers"],
        json!(["finalizer.managedresource.crossplane.io"])
    );
    assert_eq!(obj.data["spec"]["providerConfigRef"]["name"], "default");
    assert_eq!(obj.data["spec"]["deletionPolicy"], "Orphan");
    assert_eq!(
        obj.conditions().unwrap().status_of("Ready"),
        Some(ConditionStatus::True)
    );
}

#[tokio::test]
async fn test_connector_rejects_other_kinds() {
    let connector = NopConnector::new(Arc::new(FixedClock(after(8))), DEFAULT_POLL_INTERVAL);
    let mut obj: DynamicObject = serde_json::from_value(json!({
        "apiVersion": "v1",
        "kind": "ConfigMap",
        "metadata": { "name": "not-nop" },
        "data": {}
    }))
    .unwrap();
    let before = obj.clone();

    let client = connector.connect(&obj).await.unwrap();
    let err = client.observe(&mut obj).await.unwrap_err();

    assert!(matches!(err, Error::UnexpectedKind { .. }));
    assert!(err.to_string().contains("ConfigMap"));
    assert_eq!(obj, before);
}

#[tokio::test]
async fn test_negative_delay_is_rejected_not_coerced() {
    let connector = NopConnector::new(Arc::new(FixedClock(after(8))), DEFAULT_POLL_INTERVAL);
    let mut obj = manifest(json!([
        { "time": "-5s", "conditionType": "Ready", "conditionStatus": "True" },
    ]));

    let client = connector.connect(&obj).await.unwrap();
    let err = client.observe(&mut obj).await.unwrap_err();

    assert!(matches!(err, Error::InvalidManifest(_)));
    assert!(obj.conditions().unwrap().is_empty());
}

#[tokio::test]
async fn test_unparseable_delay_is_rejected() {
    let connector = NopConnector::new(Arc::new(FixedClock(after(8))), DEFAULT_POLL_INTERVAL);
    let mut obj = manifest(json!([
        { "time": "soon", "conditionType": "Ready", "conditionStatus": "True" },
    ]));

    let client = connector.connect(&obj).await.unwrap();
    assert!(client.observe(&mut obj).await.is_err());
}

#[tokio::test]
async fn test_create_update_delete_do_nothing() {
    let connector = NopConnector::new(Arc::new(FixedClock(after(8))), DEFAULT_POLL_INTERVAL);
    let mut obj = manifest(json!([]));
    let before = obj.clone();

    let client = connector.connect(&obj).await.unwrap();

    assert!(client.create(&mut obj).await.unwrap().is_empty());
    assert!(client.update(&mut obj).await.unwrap().is_empty());
    client.delete(&mut obj).await.unwrap();
    assert_eq!(obj, before);
}
