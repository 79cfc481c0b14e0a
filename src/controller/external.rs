//! External client seam
//!
//! The host drives every managed resource through the same contract: connect
//! to the external system for a resource, then observe (and, when needed,
//! create, update or delete) it. For NopResources the "external system" is
//! the resource's own rule list, and the only operation that does anything
//! is `observe`.

use super::{Clock, ConnectionDetails, ManagedResource, Observation, observe};
use crate::error::Result;
use crate::models::{DynamicObject, NopResource};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Operations on the external resource behind a managed resource
#[async_trait]
pub trait ExternalClient: Send + Sync {
    /// Observe the external resource, updating the managed resource's status
    async fn observe(&self, resource: &mut DynamicObject) -> Result<Observation>;

    /// Create the external resource
    async fn create(&self, _resource: &mut DynamicObject) -> Result<ConnectionDetails> {
        Ok(ConnectionDetails::new())
    }

    /// Bring the external resource in line with the managed resource
    async fn update(&self, _resource: &mut DynamicObject) -> Result<ConnectionDetails> {
        Ok(ConnectionDetails::new())
    }

    /// Delete the external resource
    async fn delete(&self, _resource: &mut DynamicObject) -> Result<()> {
        Ok(())
    }
}

/// Produces an external client for a managed resource
#[async_trait]
pub trait ExternalConnector: Send + Sync {
    async fn connect(&self, resource: &DynamicObject) -> Result<Box<dyn ExternalClient>>;
}

/// Connector for NopResources; needs no credentials
#[derive(Clone)]
pub struct NopConnector {
    clock: Arc<dyn Clock>,
    poll_interval: Duration,
}

impl NopConnector {
    pub fn new(clock: Arc<dyn Clock>, poll_interval: Duration) -> Self {
        Self {
            clock,
            poll_interval,
        }
    }
}

#[async_trait]
impl ExternalConnector for NopConnector {
    async fn connect(&self, _resource: &DynamicObject) -> Result<Box<dyn ExternalClient>> {
        Ok(Box::new(NopClient {
            clock: self.clock.clone(),
            poll_interval: self.poll_interval,
        }))
    }
}

/// Client that only observes; create, update and delete keep their no-op defaults
pub struct NopClient {
    clock: Arc<dyn Clock>,
    poll_interval: Duration,
}

#[async_trait]
impl ExternalClient for NopClient {
    async fn observe(&self, resource: &mut DynamicObject) -> Result<Observation> {
        let mut nop = NopResource::try_from(resource.clone())?;
        let observation = observe(&mut nop, self.clock.now(), self.poll_interval);

        // Only status conditions change; fields the typed view does not model stay put
        for condition in nop.conditions() {
            resource.set_condition(condition.clone())?;
        }
        Ok(observation)
    }
}
