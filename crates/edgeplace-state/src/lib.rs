//! edgeplace-state: the data a scheduling cycle reads.
//!
//! Everything in this crate is owned by the host orchestrator or by an
//! external synchronizer; the placement plugins only ever read it.
//!
//! # Components
//!
//! - **`types`**: placement requests, node snapshots, topology records
//! - **`snapshot`**: the host's cluster snapshot and its lister
//! - **`topology`**: eventually-consistent cache of topology records
//! - **`load`**: JSON loaders used by the command-line dry run

pub mod error;
pub mod load;
pub mod snapshot;
pub mod topology;
pub mod types;

pub use error::{StateError, StateResult};
pub use snapshot::{ClusterSnapshot, SharedSnapshot, SnapshotLister};
pub use topology::{TopologyCache, TopologyLister};
pub use types::*;
