//! Predictor client error types.

use std::time::Duration;

use thiserror::Error;

pub type PredictorResult<T> = Result<T, PredictorError>;

/// Ways a prediction call can fail.
#[derive(Debug, Error)]
pub enum PredictorError {
    #[error("invalid predictor endpoint {0:?}")]
    InvalidEndpoint(String),

    #[error("unsupported endpoint scheme {0:?} (only http is supported)")]
    UnsupportedScheme(String),

    #[error("payload field {0} is not a finite number")]
    NonFinite(&'static str),

    #[error("encoding payload: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("connecting to predictor: {0}")]
    Connect(#[source] std::io::Error),

    #[error("predictor handshake failed: {0}")]
    Handshake(#[source] hyper::Error),

    #[error("building request: {0}")]
    Build(#[source] http::Error),

    #[error("sending request: {0}")]
    Send(#[source] hyper::Error),

    #[error("reading response body: {0}")]
    Body(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("predictor returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("decoding response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("predictor did not answer within {0:?}")]
    Timeout(Duration),
}
