//! The network-aware plugin lifecycle, shared by every cost strategy.
//!
//! - **PreFilter** resolves the request's data-source node and lets the
//!   strategy prepare its per-cycle data; both go into the cycle state.
//! - **Filter** approves every candidate.
//! - **Score** hands the frozen cycle state to the strategy.
//! - **NormalizeScore** rescales the cycle's raw scores onto `0..=100`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use edgeplace_framework::{
    CycleContext, CycleState, FilterPlugin, NodeScore, Plugin, PreFilterPlugin, ScoreExtensions,
    ScorePlugin, Status,
};
use edgeplace_state::{NodeSnapshot, PlacementRequest, SnapshotLister};

use crate::error::PlacementError;
use crate::normalize::normalize_scores;
use crate::strategy::{CostStrategy, PreFilterState};

pub struct NetworkAware<S: CostStrategy> {
    strategy: S,
    snapshot: Arc<dyn SnapshotLister>,
}

impl<S: CostStrategy> NetworkAware<S> {
    pub fn new(strategy: S, snapshot: Arc<dyn SnapshotLister>) -> Self {
        Self { strategy, snapshot }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    fn read_state(state: &CycleState) -> Result<Arc<PreFilterState<S::Data>>, Status> {
        state
            .read::<PreFilterState<S::Data>>(S::STATE_KEY)
            .map_err(|status| {
                status.with_reason("pre-filter state missing, was PreFilter skipped?")
            })
    }
}

impl<S: CostStrategy> Plugin for NetworkAware<S> {
    fn name(&self) -> &str {
        S::NAME
    }
}

#[async_trait]
impl<S: CostStrategy> PreFilterPlugin for NetworkAware<S> {
    async fn pre_filter(
        &self,
        _ctx: &CycleContext,
        state: &mut CycleState,
        request: &PlacementRequest,
    ) -> Result<(), Status> {
        let source_name = request
            .data_source_node()
            .ok_or_else(|| PlacementError::MissingAnnotation(request.key()))?;

        let source = self
            .snapshot
            .node(source_name)
            .map_err(|source| PlacementError::NodeNotFound {
                node: source_name.to_string(),
                source,
            })?;

        let data = self.strategy.prepare(&source)?;

        info!(
            plugin = S::NAME,
            request = %request.key(),
            source = %source.name,
            "placement intent extracted"
        );
        state.write(S::STATE_KEY, PreFilterState { source, data });
        Ok(())
    }
}

impl<S: CostStrategy> FilterPlugin for NetworkAware<S> {
    /// Every candidate passes.
    // TODO: reject candidates with no route to the data-source node once the
    // topology record carries reachability.
    fn filter(
        &self,
        _ctx: &CycleContext,
        _state: &CycleState,
        _request: &PlacementRequest,
        _node: &NodeSnapshot,
    ) -> Result<(), Status> {
        Ok(())
    }
}

#[async_trait]
impl<S: CostStrategy> ScorePlugin for NetworkAware<S> {
    async fn score(
        &self,
        ctx: &CycleContext,
        state: &CycleState,
        _request: &PlacementRequest,
        node_name: &str,
    ) -> Result<i64, Status> {
        let pre = Self::read_state(state)?;
        let score = self.strategy.raw_score(ctx, &pre, node_name).await?;
        Ok(score)
    }

    fn score_extensions(&self) -> Option<&dyn ScoreExtensions> {
        Some(self as &dyn ScoreExtensions)
    }
}

impl<S: CostStrategy> ScoreExtensions for NetworkAware<S> {
    fn normalize_score(
        &self,
        _ctx: &CycleContext,
        _state: &CycleState,
        request: &PlacementRequest,
        scores: &mut [NodeScore],
    ) -> Result<(), Status> {
        normalize_scores(scores);
        debug!(
            plugin = S::NAME,
            request = %request.key(),
            candidates = scores.len(),
            "scores normalized"
        );
        Ok(())
    }
}
