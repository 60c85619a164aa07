//! JSON loaders for snapshots, topology records and requests.
//!
//! Accept either a single object or an array where a collection is
//! expected, since exported records come both ways.

use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::StateResult;
use crate::snapshot::ClusterSnapshot;
use crate::types::{NodeSnapshot, PlacementRequest, TopologyResource};

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(v) => v,
            OneOrMany::One(t) => vec![t],
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> StateResult<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Load a cluster snapshot from a JSON array of node snapshots.
pub fn load_snapshot(path: &Path) -> StateResult<ClusterSnapshot> {
    let nodes: OneOrMany<NodeSnapshot> = read_json(path)?;
    Ok(ClusterSnapshot::new(nodes.into_vec()))
}

/// Load one or more topology records.
pub fn load_topologies(path: &Path) -> StateResult<Vec<TopologyResource>> {
    let records: OneOrMany<TopologyResource> = read_json(path)?;
    Ok(records.into_vec())
}

/// Load a single placement request.
pub fn load_request(path: &Path) -> StateResult<PlacementRequest> {
    read_json(path)
}
