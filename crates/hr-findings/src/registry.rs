//! Registry of known tracker adapters.
//!
//! The registry is built once at startup and never mutated afterwards, so a
//! single instance can be shared across concurrent report generations.

use crate::{FindingsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// The tracking company an adapter belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tracker {
    pub slug: String,
    pub name: String,
}

/// A tracker-detection adapter descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adapter {
    pub tracker: Tracker,
    pub slug: String,
    pub name: String,
}

impl Adapter {
    /// Composite `trackerSlug/adapterSlug` key.
    pub fn id(&self) -> String {
        format!("{}/{}", self.tracker.slug, self.slug)
    }
}

/// Immutable lookup table of adapters by composite key.
#[derive(Debug, Default)]
pub struct AdapterRegistry {
    adapters: Vec<Adapter>,
    by_id: HashMap<String, usize>,
}

impl AdapterRegistry {
    /// Build a registry, rejecting duplicate composite keys.
    pub fn new(adapters: Vec<Adapter>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(adapters.len());
        for (i, adapter) in adapters.iter().enumerate() {
            let id = adapter.id();
            if by_id.insert(id.clone(), i).is_some() {
                return Err(FindingsError::DuplicateAdapter(id));
            }
        }
        debug!(adapters = adapters.len(), "Adapter registry built");
        Ok(Self { adapters, by_id })
    }

    /// Load the registry from a JSON array of descriptors.
    pub fn from_json(json: &str) -> Result<Self> {
        let adapters: Vec<Adapter> = serde_json::from_str(json)?;
        Self::new(adapters)
    }

    /// Exact-match lookup by `trackerSlug/adapterSlug`.
    pub fn get(&self, id: &str) -> Option<&Adapter> {
        self.by_id.get(id).map(|&i| &self.adapters[i])
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Adapter> {
        self.adapters.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGISTRY: &str = r#"[
        {"tracker": {"slug": "exampleTracker", "name": "Example Tracker Inc."},
         "slug": "exampleAdapter", "name": "Example SDK"},
        {"tracker": {"slug": "other", "name": "Other Ltd."},
         "slug": "events", "name": "Other events"}
    ]"#;

    #[test]
    fn test_lookup_by_composite_key() {
        let registry = AdapterRegistry::from_json(REGISTRY).unwrap();
        assert_eq!(registry.len(), 2);
        let adapter = registry.get("exampleTracker/exampleAdapter").unwrap();
        assert_eq!(adapter.name, "Example SDK");
        assert_eq!(adapter.id(), "exampleTracker/exampleAdapter");
    }

    #[test]
    fn test_lookup_is_exact() {
        let registry = AdapterRegistry::from_json(REGISTRY).unwrap();
        assert!(registry.get("exampleTracker").is_none());
        assert!(registry.get("exampletracker/exampleadapter").is_none());
        assert!(registry.get("nonexistent/slug").is_none());
    }

    #[test]
    fn test_duplicate_rejected() {
        let adapter = Adapter {
            tracker: Tracker {
                slug: "t".into(),
                name: "T".into(),
            },
            slug: "a".into(),
            name: "A".into(),
        };
        let err = AdapterRegistry::new(vec![adapter.clone(), adapter]).unwrap_err();
        assert!(matches!(err, FindingsError::DuplicateAdapter(id) if id == "t/a"));
    }

    #[test]
    fn test_registry_is_shareable() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<AdapterRegistry>();
    }
}
