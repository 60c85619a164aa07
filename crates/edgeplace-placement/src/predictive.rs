//! Predictive-bandwidth strategy.
//!
//! Sends the utilization of the data-source node and the candidate to the
//! bandwidth predictor and scores the candidate by the predicted
//! concurrency, in thousandths. A predictor that is down, slow or talking
//! nonsense costs the candidate a low score, never the cycle.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use edgeplace_framework::CycleContext;
use edgeplace_predictor::{PredictorPayload, predict};
use edgeplace_state::{NodeSnapshot, SnapshotLister};

use crate::config::NetworkAwareConfig;
use crate::error::{PlacementError, PlacementResult};
use crate::strategy::{CostStrategy, PreFilterState};

/// Score given to a candidate whose prediction failed.
pub const FAILED_PREDICTION_SCORE: i64 = -1;

pub struct PredictiveBandwidth {
    snapshot: Arc<dyn SnapshotLister>,
    endpoint: String,
    timeout: Duration,
}

impl PredictiveBandwidth {
    pub fn new(snapshot: Arc<dyn SnapshotLister>, endpoint: &str, timeout: Duration) -> Self {
        Self {
            snapshot,
            endpoint: endpoint.to_string(),
            timeout,
        }
    }

    pub fn from_config(
        snapshot: Arc<dyn SnapshotLister>,
        config: &NetworkAwareConfig,
    ) -> PlacementResult<Self> {
        Ok(Self::new(
            snapshot,
            &config.predictor_endpoint,
            config.predictor_timeout()?,
        ))
    }
}

/// Build the predictor payload from the two nodes' snapshots.
pub fn utilization_payload(source: &NodeSnapshot, destination: &NodeSnapshot) -> PredictorPayload {
    PredictorPayload {
        s_cpu_usage: source.cpu_usage(),
        s_mem_usage: source.memory_usage(),
        d_cpu_usage: destination.cpu_usage(),
        d_mem_usage: destination.memory_usage(),
    }
}

/// Concurrency in thousandths, truncated toward zero.
pub fn concurrency_score(concurrency: f32) -> i64 {
    (concurrency * 1000.0) as i64
}

#[async_trait]
impl CostStrategy for PredictiveBandwidth {
    const NAME: &'static str = "device-app-plugin";
    const STATE_KEY: &'static str = "PreFilter-bandwidth";

    /// Predictor endpoint in effect for this cycle.
    type Data = String;

    fn prepare(&self, _source: &NodeSnapshot) -> PlacementResult<String> {
        Ok(self.endpoint.clone())
    }

    async fn raw_score(
        &self,
        ctx: &CycleContext,
        state: &PreFilterState<String>,
        candidate: &str,
    ) -> PlacementResult<i64> {
        let destination = self
            .snapshot
            .node(candidate)
            .map_err(|source| PlacementError::NodeNotFound {
                node: candidate.to_string(),
                source,
            })?;

        let payload = utilization_payload(&state.source, &destination);
        let budget = ctx.bound(self.timeout);

        let result = tokio::select! {
            biased;
            _ = ctx.cancelled() => return Err(PlacementError::Cancelled),
            result = predict(&state.data, &payload, budget) => result,
        };

        match result {
            Ok(prediction) => {
                let score = concurrency_score(prediction.concurrency);
                debug!(
                    source = %state.source.name,
                    node = candidate,
                    concurrency = prediction.concurrency,
                    score,
                    "predicted bandwidth score"
                );
                Ok(score)
            }
            Err(e) => {
                warn!(
                    source = %state.source.name,
                    node = candidate,
                    endpoint = %state.data,
                    error = %e,
                    "bandwidth prediction failed, using fallback score"
                );
                Ok(FAILED_PREDICTION_SCORE)
            }
        }
    }
}
