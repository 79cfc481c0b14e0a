//! Model layer
//!
//! Rust types for the NopResource managed resource and the pieces every
//! managed resource shares.
//!
//! Structure:
//! - `condition.rs` - Status conditions and the per-type condition set
//! - `dynamic.rs` - Untyped resource handles as the host sees them
//! - `nop_resource.rs` - The NopResource schema
//! - `resource_kind.rs` - Group/version/kind identity

pub mod condition;
pub mod dynamic;
pub mod nop_resource;
pub mod resource_kind;

pub use condition::{Condition, ConditionStatus, Conditions};
pub use dynamic::DynamicObject;
pub use nop_resource::{
    ConditionRule, ConnectionDetail, NopResource, NopResourceObservation, NopResourceParameters,
    NopResourceSpec, NopResourceStatus, ObjectMeta,
};
pub use resource_kind::GroupVersionKind;
