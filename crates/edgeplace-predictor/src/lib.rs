//! edgeplace-predictor: client for the bandwidth-prediction service.
//!
//! The service takes the CPU and memory utilization of a source and a
//! destination node and predicts the sustainable concurrency between them.
//!
//! ```text
//! POST /predict  {"s_cpu_usage":..,"s_mem_usage":..,"d_cpu_usage":..,"d_mem_usage":..}
//!   ◄── 200      {"latencyMS":..,"concurrency":..}
//! ```

pub mod client;
pub mod error;
pub mod types;

pub use client::{DEFAULT_ENDPOINT, MAX_RESPONSE_BODY, predict};
pub use error::{PredictorError, PredictorResult};
pub use types::{PredictorPayload, PredictorResponse};
