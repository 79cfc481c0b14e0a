//! Resource store
//!
//! Holds the persisted copy of every managed resource the host reconciles.

use crate::models::DynamicObject;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Thread-safe resource store keyed by resource name
#[derive(Clone, Default)]
pub struct ResourceStore {
    inner: Arc<RwLock<BTreeMap<String, DynamicObject>>>,
}

impl ResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a resource
    pub fn upsert(&self, name: impl Into<String>, resource: DynamicObject) {
        let mut state = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        state.insert(name.into(), resource);
    }

    /// Remove a resource, returning it if it was stored
    pub fn remove(&self, name: &str) -> Option<DynamicObject> {
        let mut state = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        state.remove(name)
    }

    /// Get a copy of a stored resource
    pub fn get(&self, name: &str) -> Option<DynamicObject> {
        let state = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        state.get(name).cloned()
    }

    /// Names of all stored resources, sorted
    pub fn names(&self) -> Vec<String> {
        let state = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        state.keys().cloned().collect()
    }

    /// Copies of all stored resources, sorted by name
    pub fn all(&self) -> Vec<DynamicObject> {
        let state = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        state.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        let state = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resource(name: &str) -> DynamicObject {
        serde_json::from_value(json!({
            "apiVersion": "nop.crossplane.io/v1alpha1",
            "kind": "NopResource",
            "metadata": { "name": name }
        }))
        .unwrap()
    }

    #[test]
    fn test_store_new() {
        let store = ResourceStore::new();
        assert!(store.is_empty());
        assert!(store.all().is_empty());
    }

    #[test]
    fn test_store_upsert_and_get() {
        let store = ResourceStore::new();
        store.upsert("b", resource("b"));
        store.upsert("a", resource("a"));
        store.upsert("a", resource("a"));

        assert_eq!(store.len(), 2);
        assert_eq!(store.names(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(store.get("a").unwrap().name(), Some("a"));
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn test_store_remove() {
        let store = ResourceStore::new();
        store.upsert("a", resource("a"));

        assert!(store.remove("a").is_some());
        assert!(store.remove("a").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_clones_share_state() {
        let store = ResourceStore::new();
        let other = store.clone();
        other.upsert("a", resource("a"));
        assert_eq!(store.len(), 1);
    }
}
