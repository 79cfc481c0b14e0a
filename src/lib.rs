//! provider-nop library
//!
//! A managed resource provider whose external resources do not exist. A
//! NopResource declares which status conditions should appear how long after
//! it was created; every reconcile derives the conditions that are due and
//! reports the pretend external resource as existing and up to date.
//!
//! The library can be driven by any host framework through
//! [`controller::ExternalConnector`], or by the bundled in-process
//! [`host::Manager`].

pub mod config;
pub mod controller;
pub mod duration;
pub mod error;
pub mod host;
pub mod manifest;
pub mod models;
pub mod printer;
pub mod scheduler;

// Re-export commonly used types for convenience
pub use controller::{
    Clock, ConnectionDetails, ExternalClient, ExternalConnector, FixedClock, ManagedResource,
    NopConnector, Observation, SystemClock, observe,
};
pub use error::{Error, Result};
pub use models::{
    Condition, ConditionRule, ConditionStatus, Conditions, ConnectionDetail, DynamicObject,
    NopResource,
};
pub use scheduler::{resolve, resolve_at};
