//! Plugin phase traits.
//!
//! Mirrors the host's extension points. Filter and Score run once per
//! candidate and may run concurrently within a cycle, so they only get
//! `&CycleState`; PreFilter is the single writer.

use async_trait::async_trait;

use edgeplace_state::{NodeSnapshot, PlacementRequest};

use crate::context::CycleContext;
use crate::cycle_state::CycleState;
use crate::status::Status;

/// Highest score a normalized candidate can receive.
pub const MAX_NODE_SCORE: i64 = 100;

/// Lowest score a normalized candidate can receive.
pub const MIN_NODE_SCORE: i64 = 0;

/// Score of one candidate within one cycle.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct NodeScore {
    pub name: String,
    pub score: i64,
}

impl NodeScore {
    pub fn new(name: &str, score: i64) -> Self {
        Self {
            name: name.to_string(),
            score,
        }
    }
}

/// Every plugin registers under a stable name.
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;
}

#[async_trait]
pub trait PreFilterPlugin: Plugin {
    /// Extract placement intent and record it in `state`, or abort the cycle.
    async fn pre_filter(
        &self,
        ctx: &CycleContext,
        state: &mut CycleState,
        request: &PlacementRequest,
    ) -> Result<(), Status>;
}

pub trait FilterPlugin: Plugin {
    /// Approve or reject one candidate.
    fn filter(
        &self,
        ctx: &CycleContext,
        state: &CycleState,
        request: &PlacementRequest,
        node: &NodeSnapshot,
    ) -> Result<(), Status>;
}

#[async_trait]
pub trait ScorePlugin: Plugin {
    /// Raw score for one candidate. An error drops only that candidate.
    async fn score(
        &self,
        ctx: &CycleContext,
        state: &CycleState,
        request: &PlacementRequest,
        node_name: &str,
    ) -> Result<i64, Status>;

    /// Normalization hook, if the plugin rescales its own scores.
    fn score_extensions(&self) -> Option<&dyn ScoreExtensions> {
        None
    }
}

pub trait ScoreExtensions: Send + Sync {
    /// Rescale every candidate's raw score in place.
    fn normalize_score(
        &self,
        ctx: &CycleContext,
        state: &CycleState,
        request: &PlacementRequest,
        scores: &mut [NodeScore],
    ) -> Result<(), Status>;
}

/// A plugin taking part in every phase of the cycle.
pub trait CyclePlugin: PreFilterPlugin + FilterPlugin + ScorePlugin {}

impl<T: PreFilterPlugin + FilterPlugin + ScorePlugin> CyclePlugin for T {}
