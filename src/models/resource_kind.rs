//! Group/version/kind identity of managed resources
//!
//! Centralizes the API group, version and kind strings so the kind check on
//! incoming resource handles never relies on hardcoded literals.

use std::fmt;

/// API group served by this provider
pub const GROUP: &str = "nop.crossplane.io";

/// API version of the NopResource schema
pub const VERSION: &str = "v1alpha1";

/// Kind name of the NopResource
pub const KIND: &str = "NopResource";

/// Identity of a resource type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupVersionKind {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl GroupVersionKind {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }

    /// The NopResource kind served by this provider
    pub fn nop_resource() -> Self {
        Self::new(GROUP, VERSION, KIND)
    }

    /// Build from the `apiVersion` and `kind` fields of a manifest
    ///
    /// Core group versions such as `v1` carry no group.
    pub fn from_api_version(api_version: &str, kind: &str) -> Self {
        match api_version.split_once('/') {
            Some((group, version)) => Self::new(group, version, kind),
            None => Self::new("", api_version, kind),
        }
    }

    /// The `apiVersion` field value for this kind
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

impl fmt::Display for GroupVersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, Kind={}", self.api_version(), self.kind)
    }
}
