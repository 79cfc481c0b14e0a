//! Simulation host
//!
//! A stand-in for the managed-resource framework that normally drives the
//! reconciliation step. It keeps resources in an in-memory store, runs one
//! reconcile loop per resource and publishes what happened on a channel.
//!
//! Each resource gets exactly one loop task, so reconciles of the same
//! resource never overlap while different resources run concurrently.

mod store;

pub use store::ResourceStore;

use crate::controller::{Clock, ConnectionDetails, ExternalConnector, Observation};
use crate::error::{Error, Result};
use crate::models::condition::{REASON_RECONCILE_ERROR, TYPE_SYNCED};
use crate::models::{Condition, Conditions, DynamicObject};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Event emitted after every reconcile
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileEvent {
    /// Resource was observed and its status persisted
    Observed {
        name: String,
        conditions: Conditions,
        connection_details: ConnectionDetails,
    },
    /// Resource was reported gone and removed from the store
    Deleted { name: String },
    /// Reconcile failed; it will be retried on the next poll
    Error { name: String, message: String },
}

/// Runs single reconcile cycles against stored resources
#[derive(Clone)]
pub struct Reconciler {
    store: ResourceStore,
    connector: Arc<dyn ExternalConnector>,
    clock: Arc<dyn Clock>,
    poll_interval: Duration,
    event_tx: mpsc::UnboundedSender<ReconcileEvent>,
}

impl Reconciler {
    /// Create a new Reconciler and the receiver for its events
    pub fn new(
        store: ResourceStore,
        connector: Arc<dyn ExternalConnector>,
        clock: Arc<dyn Clock>,
        poll_interval: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<ReconcileEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                store,
                connector,
                clock,
                poll_interval,
                event_tx: tx,
            },
            rx,
        )
    }

    pub fn store(&self) -> &ResourceStore {
        &self.store
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Reconcile one stored resource and persist the outcome
    ///
    /// After a successful observation the resource gets a `Synced=True`
    /// condition unless it already has a `Synced` condition of its own;
    /// an error left behind by an earlier failed cycle is replaced. A failed
    /// observation records `Synced=False` with the error and returns the
    /// error unchanged; it is not retried here.
    pub async fn reconcile_once(&self, name: &str) -> Result<Observation> {
        let Some(mut resource) = self.store.get(name) else {
            return Err(Error::NotFound(name.to_string()));
        };
        let before = resource.conditions().unwrap_or_default();

        match self.observe(&mut resource).await {
            Ok(observation) if !observation.resource_exists => {
                self.store.remove(name);
                tracing::info!(resource = name, "Resource deleted");
                let _ = self.event_tx.send(ReconcileEvent::Deleted {
                    name: name.to_string(),
                });
                Ok(observation)
            }
            Ok(observation) => {
                let needs_success = resource
                    .conditions()?
                    .get(TYPE_SYNCED)
                    .is_none_or(is_reconcile_error);
                if needs_success {
                    resource.set_condition(Condition::reconcile_success(self.clock.now()))?;
                }
                let conditions = resource.conditions()?;
                log_transitions(name, &before, &conditions);

                self.store.upsert(name, resource);
                let _ = self.event_tx.send(ReconcileEvent::Observed {
                    name: name.to_string(),
                    conditions,
                    connection_details: observation.connection_details.clone(),
                });
                Ok(observation)
            }
            Err(error) => {
                tracing::warn!(resource = name, error = %error, "Reconcile failed");
                let failed = Condition::reconcile_error(self.clock.now(), error.to_string());
                match resource.set_condition(failed) {
                    Ok(()) => self.store.upsert(name, resource),
                    Err(e) => {
                        tracing::debug!(resource = name, error = %e, "Cannot record reconcile error")
                    }
                }
                let _ = self.event_tx.send(ReconcileEvent::Error {
                    name: name.to_string(),
                    message: error.to_string(),
                });
                Err(error)
            }
        }
    }

    async fn observe(&self, resource: &mut DynamicObject) -> Result<Observation> {
        let client = self.connector.connect(resource).await?;
        client.observe(resource).await
    }
}

/// True for the `Synced=False` condition recorded after a failed reconcile
///
/// Scheduled conditions never carry a message, so a `ReconcileError` with a
/// message can only have been written by the host.
fn is_reconcile_error(condition: &Condition) -> bool {
    condition.reason.as_deref() == Some(REASON_RECONCILE_ERROR) && condition.message.is_some()
}

/// Log every condition whose state differs from before the reconcile
fn log_transitions(name: &str, before: &Conditions, after: &Conditions) {
    for condition in after {
        let changed = before
            .get(&condition.condition_type)
            .is_none_or(|previous| !previous.same_state(condition));
        if changed {
            tracing::info!(
                resource = name,
                condition = %condition.condition_type,
                status = %condition.status,
                reason = condition.reason.as_deref().unwrap_or(""),
                "Condition transitioned"
            );
        }
    }
}

/// Runs a reconcile loop per resource
///
/// Every loop requeues after the interval the observation asks for. A loop
/// ends when its resource is deleted or removed from the store, or after
/// `max_cycles` reconciles when a limit is set. A resource never has more
/// than one loop.
pub struct Manager {
    reconciler: Reconciler,
    max_cycles: Option<u32>,
    started: HashSet<String>,
    handles: Vec<JoinHandle<()>>,
}

impl Manager {
    pub fn new(reconciler: Reconciler, max_cycles: Option<u32>) -> Self {
        Self {
            reconciler,
            max_cycles,
            started: HashSet::new(),
            handles: Vec::new(),
        }
    }

    /// Start the reconcile loop for one resource
    ///
    /// Returns false, without starting anything, if the resource already
    /// has a loop.
    pub fn start(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if !self.started.insert(name.clone()) {
            tracing::debug!(resource = %name, "Reconcile loop already running");
            return false;
        }
        let reconciler = self.reconciler.clone();
        let max_cycles = self.max_cycles;

        let handle = tokio::spawn(async move {
            let mut cycles = 0u32;
            loop {
                if max_cycles.is_some_and(|max| cycles >= max) {
                    break;
                }
                let wait = match reconciler.reconcile_once(&name).await {
                    Ok(observation) if !observation.resource_exists => break,
                    Ok(observation) => observation.requeue_after,
                    Err(Error::NotFound(_)) => break,
                    Err(_) => reconciler.poll_interval(),
                };

                cycles += 1;
                if max_cycles.is_some_and(|max| cycles >= max) {
                    break;
                }
                tokio::time::sleep(wait).await;
            }
            tracing::debug!(resource = %name, cycles, "Reconcile loop finished");
        });

        self.handles.push(handle);
        true
    }

    /// Start a reconcile loop for every stored resource
    pub fn start_all(&mut self) {
        for name in self.reconciler.store().names() {
            self.start(name);
        }
    }

    /// Wait until every loop has finished
    pub async fn join(&mut self) {
        while let Some(handle) = self.handles.last_mut() {
            let _ = handle.await;
            self.handles.pop();
        }
        self.started.clear();
    }

    /// Abort all reconcile loops
    pub fn stop(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
        self.handles.clear();
        self.started.clear();
    }
}
