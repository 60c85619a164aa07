//! Placement error types.

use thiserror::Error;

use edgeplace_framework::Status;
use edgeplace_state::StateError;

pub type PlacementResult<T> = Result<T, PlacementError>;

/// Errors raised by the network-aware plugins.
#[derive(Debug, Error)]
pub enum PlacementError {
    #[error("no dataSourceNode annotation on request {0}")]
    MissingAnnotation(String),

    #[error("getting node {node:?} from snapshot: {source}")]
    NodeNotFound {
        node: String,
        #[source]
        source: StateError,
    },

    #[error("no cost data for origin {origin:?} under key {key:?} in topology {topology}")]
    NoCostData {
        topology: String,
        key: String,
        origin: String,
    },

    #[error("scheduling cycle cancelled")]
    Cancelled,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("plugin {0:?} is already registered")]
    DuplicatePlugin(String),

    #[error("unknown plugin {0:?}")]
    UnknownPlugin(String),
}

impl From<PlacementError> for Status {
    fn from(err: PlacementError) -> Self {
        Status::as_status(err)
    }
}
