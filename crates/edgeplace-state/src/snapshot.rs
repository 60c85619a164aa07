//! Cluster snapshot: the host's per-cycle view of node resources.
//!
//! The host replaces the whole snapshot between cycles; a cycle keeps
//! reading the `Arc` it started with, so concurrent scorers never see a
//! half-updated view.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::error::{StateError, StateResult};
use crate::types::NodeSnapshot;

/// Immutable node-name → snapshot map.
#[derive(Debug, Clone, Default)]
pub struct ClusterSnapshot {
    nodes: HashMap<String, NodeSnapshot>,
}

impl ClusterSnapshot {
    pub fn new(nodes: impl IntoIterator<Item = NodeSnapshot>) -> Self {
        Self {
            nodes: nodes.into_iter().map(|n| (n.name.clone(), n)).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&NodeSnapshot> {
        self.nodes.get(name)
    }

    /// Node names in sorted order.
    pub fn node_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.nodes.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Read access to node snapshots, as handed to plugins by the host.
pub trait SnapshotLister: Send + Sync {
    /// Resolve a node by name.
    fn node(&self, name: &str) -> StateResult<NodeSnapshot>;
}

impl SnapshotLister for ClusterSnapshot {
    fn node(&self, name: &str) -> StateResult<NodeSnapshot> {
        self.get(name)
            .cloned()
            .ok_or_else(|| StateError::NodeNotFound(name.to_string()))
    }
}

/// A snapshot slot the host swaps wholesale. Cheap to clone.
#[derive(Clone, Default)]
pub struct SharedSnapshot {
    current: Arc<RwLock<Arc<ClusterSnapshot>>>,
}

impl SharedSnapshot {
    pub fn new(snapshot: ClusterSnapshot) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(snapshot))),
        }
    }

    /// The snapshot in effect right now.
    pub fn load(&self) -> Arc<ClusterSnapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Install a new snapshot. Readers holding the old one keep it.
    pub fn replace(&self, snapshot: ClusterSnapshot) {
        let nodes = snapshot.len();
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(snapshot);
        debug!(nodes, "cluster snapshot replaced");
    }
}

impl SnapshotLister for SharedSnapshot {
    fn node(&self, name: &str) -> StateResult<NodeSnapshot> {
        self.load().node(name)
    }
}
