//! Topology cache: eventually-consistent store of topology records.
//!
//! An external watcher keeps the cache in step with the control plane by
//! calling [`TopologyCache::upsert`] / [`TopologyCache::remove`]. Plugins
//! only see the [`TopologyLister`] side; a lookup hands out the `Arc` of the
//! record current at that instant, which may trail the control plane by the
//! watcher's propagation delay.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::types::TopologyResource;

/// Read-only access to topology records.
pub trait TopologyLister: Send + Sync {
    /// The record `namespace/name`, if the cache holds one.
    fn get(&self, namespace: &str, name: &str) -> Option<Arc<TopologyResource>>;
}

/// In-memory topology cache. Cheap to clone.
#[derive(Clone, Default)]
pub struct TopologyCache {
    records: Arc<RwLock<HashMap<String, Arc<TopologyResource>>>>,
}

impl TopologyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record.
    pub fn upsert(&self, resource: TopologyResource) {
        let key = record_key(&resource.namespace, &resource.name);
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        debug!(
            topology = %key,
            keys = resource.topologies.len(),
            "topology record updated"
        );
        records.insert(key, Arc::new(resource));
    }

    /// Drop a record. Returns whether it was present.
    pub fn remove(&self, namespace: &str, name: &str) -> bool {
        let key = record_key(namespace, name);
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let removed = records.remove(&key).is_some();
        if removed {
            debug!(topology = %key, "topology record removed");
        }
        removed
    }

    /// Full resync: replace every record at once.
    pub fn replace_all(&self, resources: impl IntoIterator<Item = TopologyResource>) {
        let fresh: HashMap<String, Arc<TopologyResource>> = resources
            .into_iter()
            .map(|r| (record_key(&r.namespace, &r.name), Arc::new(r)))
            .collect();
        let count = fresh.len();
        *self.records.write().unwrap_or_else(PoisonError::into_inner) = fresh;
        debug!(records = count, "topology cache resynced");
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TopologyLister for TopologyCache {
    fn get(&self, namespace: &str, name: &str) -> Option<Arc<TopologyResource>> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        records.get(&record_key(namespace, name)).cloned()
    }
}

fn record_key(namespace: &str, name: &str) -> String {
    format!("{namespace}/{name}")
}
