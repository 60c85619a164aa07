//! Topology-cost strategy.
//!
//! Scores a candidate by the negated network cost from the data-source
//! node, as recorded in the synchronized topology record. Lower cost means
//! a higher score.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use edgeplace_framework::CycleContext;
use edgeplace_state::{CostList, NodeSnapshot, TopologyLister};

use crate::config::{MissingCostData, NetworkAwareConfig, UnmeasuredLink};
use crate::error::{PlacementError, PlacementResult};
use crate::strategy::{CostStrategy, PreFilterState};

/// Score of a candidate with no measured cost under the neutral policy.
pub const NEUTRAL_SCORE: i64 = 0;

pub struct TopologyCost {
    topology: Arc<dyn TopologyLister>,
    namespace: String,
    name: String,
    key: String,
    missing: MissingCostData,
    unmeasured: UnmeasuredLink,
}

impl TopologyCost {
    pub fn from_config(topology: Arc<dyn TopologyLister>, config: &NetworkAwareConfig) -> Self {
        Self {
            topology,
            namespace: config.topology_namespace.clone(),
            name: config.topology_name.clone(),
            key: config.topology_key.clone(),
            missing: config.missing_cost_data,
            unmeasured: config.unmeasured_link,
        }
    }

    fn topology_ref(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

/// Raw score for `candidate` against `costs`.
///
/// A measured link scores `-cost`; an unmeasured one scores per `policy`.
pub fn cost_score(costs: &CostList, candidate: &str, policy: UnmeasuredLink) -> i64 {
    if let Some(info) = costs.iter().find(|c| c.destination == candidate) {
        return info.network_cost.saturating_neg();
    }
    match policy {
        UnmeasuredLink::Neutral => NEUTRAL_SCORE,
        UnmeasuredLink::Average if costs.is_empty() => NEUTRAL_SCORE,
        UnmeasuredLink::Average => {
            let total: i128 = costs.iter().map(|c| i128::from(c.network_cost)).sum();
            let mean = total / costs.len() as i128;
            i64::try_from(-mean).unwrap_or(i64::MIN)
        }
    }
}

#[async_trait]
impl CostStrategy for TopologyCost {
    const NAME: &'static str = "NetworkOverhead";
    const STATE_KEY: &'static str = "PreFilter-overhead";

    /// Costs from the data-source node, copied out of the record current at
    /// PreFilter time.
    type Data = CostList;

    fn prepare(&self, source: &NodeSnapshot) -> PlacementResult<CostList> {
        let record = self.topology.get(&self.namespace, &self.name);
        let costs = record
            .as_deref()
            .and_then(|r| r.cost_list(&self.key, &source.name))
            .cloned();

        match (costs, self.missing) {
            (Some(costs), _) => {
                debug!(
                    topology = %self.topology_ref(),
                    origin = %source.name,
                    destinations = costs.len(),
                    "loaded network costs"
                );
                Ok(costs)
            }
            (None, MissingCostData::Abort) => Err(PlacementError::NoCostData {
                topology: self.topology_ref(),
                key: self.key.clone(),
                origin: source.name.clone(),
            }),
            (None, MissingCostData::Neutral) => {
                warn!(
                    topology = %self.topology_ref(),
                    key = %self.key,
                    origin = %source.name,
                    record_present = record.is_some(),
                    "no network costs for data-source node, scoring all candidates neutral"
                );
                Ok(CostList::new())
            }
        }
    }

    async fn raw_score(
        &self,
        _ctx: &CycleContext,
        state: &PreFilterState<CostList>,
        candidate: &str,
    ) -> PlacementResult<i64> {
        let score = cost_score(&state.data, candidate, self.unmeasured);
        debug!(source = %state.source.name, node = candidate, score, "network cost score");
        Ok(score)
    }
}
