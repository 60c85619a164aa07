//! Domain types shared by the host and the placement plugins.
//!
//! Topology records keep the field names of the cluster topology custom
//! resource (`topologyKey`, `originList`, ...) so exported records can be
//! loaded as-is.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique identifier for a node in the cluster.
pub type NodeName = String;

/// Annotation naming the node a workload exchanges data with.
pub const DATA_SOURCE_ANNOTATION: &str = "dataSourceNode";

// ── Placement request ──────────────────────────────────────────────

/// A workload waiting to be placed. Immutable for the whole cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlacementRequest {
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub annotations: HashMap<String, String>,
}

impl PlacementRequest {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            annotations: HashMap::new(),
        }
    }

    /// Builder method: set an annotation.
    pub fn with_annotation(mut self, key: &str, value: &str) -> Self {
        self.annotations.insert(key.to_string(), value.to_string());
        self
    }

    /// The data-source node named by the request, if any.
    pub fn data_source_node(&self) -> Option<&str> {
        self.annotations
            .get(DATA_SOURCE_ANNOTATION)
            .map(String::as_str)
    }

    /// `{namespace}/{name}`, used in log fields.
    pub fn key(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

// ── Node snapshot ──────────────────────────────────────────────────

/// CPU (millicores) and memory (bytes) quantities.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resources {
    pub milli_cpu: i64,
    pub memory: i64,
}

/// Point-in-time resource view of one node. May lag the real node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeSnapshot {
    pub name: NodeName,
    pub allocatable: Resources,
    pub requested: Resources,
}

impl NodeSnapshot {
    pub fn new(name: &str, allocatable: Resources, requested: Resources) -> Self {
        Self {
            name: name.to_string(),
            allocatable,
            requested,
        }
    }

    /// Requested over allocatable CPU. Not clamped: an overcommitted node
    /// reports more than 1.0 and a zero-capacity node reports inf or NaN.
    pub fn cpu_usage(&self) -> f32 {
        self.requested.milli_cpu as f32 / self.allocatable.milli_cpu as f32
    }

    /// Requested over allocatable memory, with the same caveats as
    /// [`NodeSnapshot::cpu_usage`].
    pub fn memory_usage(&self) -> f32 {
        self.requested.memory as f32 / self.allocatable.memory as f32
    }
}

// ── Network topology ───────────────────────────────────────────────

/// Network cost from an origin to one destination node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CostInfo {
    pub destination: NodeName,
    pub network_cost: i64,
}

/// Ordered costs from one origin node.
pub type CostList = Vec<CostInfo>;

/// All costs measured from one origin node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Origin {
    pub origin: NodeName,
    #[serde(default)]
    pub cost_list: CostList,
}

/// Costs for a single topology key (e.g. `network`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Topology {
    pub topology_key: String,
    #[serde(default)]
    pub origin_list: Vec<Origin>,
}

/// A named cluster topology record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopologyResource {
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub topologies: Vec<Topology>,
}

impl TopologyResource {
    /// Look up the cost list for `origin` under `topology_key`.
    ///
    /// Scans topologies in order and returns the first origin match;
    /// duplicate keys or origins after the first are ignored.
    pub fn cost_list(&self, topology_key: &str, origin: &str) -> Option<&CostList> {
        self.topologies
            .iter()
            .filter(|t| t.topology_key == topology_key)
            .flat_map(|t| t.origin_list.iter())
            .find(|o| o.origin == origin)
            .map(|o| &o.cost_list)
    }
}
