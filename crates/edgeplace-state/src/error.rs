//! Error types for the edgeplace data model.

use thiserror::Error;

/// Result type alias for state lookups.
pub type StateResult<T> = Result<T, StateError>;

/// Errors that can occur while reading cluster state.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("node {0:?} not found in snapshot")]
    NodeNotFound(String),

    #[error("read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
}
