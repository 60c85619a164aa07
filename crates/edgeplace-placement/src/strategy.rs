//! The seam between the shared plugin lifecycle and a scoring method.

use async_trait::async_trait;

use edgeplace_framework::CycleContext;
use edgeplace_state::NodeSnapshot;

use crate::error::PlacementResult;

/// What PreFilter records for the rest of the cycle.
#[derive(Debug, Clone)]
pub struct PreFilterState<D> {
    /// The data-source node as seen at PreFilter time.
    pub source: NodeSnapshot,
    /// Strategy-specific data resolved once per cycle.
    pub data: D,
}

/// A way of turning (data-source node, candidate) into a raw score.
///
/// Higher raw scores are better; the range is arbitrary and is rescaled
/// after all candidates are scored.
#[async_trait]
pub trait CostStrategy: Send + Sync + 'static {
    /// Name the plugin registers under.
    const NAME: &'static str;
    /// Cycle-state key for this strategy's [`PreFilterState`].
    const STATE_KEY: &'static str;

    type Data: Send + Sync + 'static;

    /// Resolve per-cycle data for `source`. An error aborts the cycle.
    fn prepare(&self, source: &NodeSnapshot) -> PlacementResult<Self::Data>;

    /// Raw score for one candidate. An error drops only that candidate.
    async fn raw_score(
        &self,
        ctx: &CycleContext,
        state: &PreFilterState<Self::Data>,
        candidate: &str,
    ) -> PlacementResult<i64>;
}
