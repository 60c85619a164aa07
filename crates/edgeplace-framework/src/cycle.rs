//! Cycle runner: drives one plugin through every phase for one request.
//!
//! Stands in for the host's scheduling loop: the real host also runs other
//! plugins, binds the winner and handles preemption, none of which is
//! modelled here.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::{Id, JoinSet};
use tracing::{debug, error, info, warn};

use edgeplace_state::{NodeSnapshot, PlacementRequest};

use crate::context::CycleContext;
use crate::cycle_state::CycleState;
use crate::plugin::{CyclePlugin, NodeScore};
use crate::status::{Code, Status};

/// What a completed cycle decided.
#[derive(Debug, Clone, Default)]
pub struct CycleOutcome {
    /// Final scores for every candidate that passed Filter and Score,
    /// in candidate order.
    pub scores: Vec<NodeScore>,
    /// Candidates dropped by Filter or Score, with the reason.
    pub rejected: Vec<(String, Status)>,
    /// The highest-scoring candidate; earlier candidates win ties.
    pub selected: Option<String>,
}

/// Run PreFilter → Filter → Score → NormalizeScore for `request`.
///
/// A PreFilter or NormalizeScore failure aborts the whole cycle and is
/// returned as-is; nothing is scored after a PreFilter abort. Filter and
/// Score failures only drop the affected candidate.
pub async fn run_cycle(
    plugin: Arc<dyn CyclePlugin>,
    ctx: &CycleContext,
    request: &PlacementRequest,
    candidates: &[NodeSnapshot],
) -> Result<CycleOutcome, Status> {
    let request_key = request.key();
    let mut state = CycleState::new();

    if let Err(status) = plugin.pre_filter(ctx, &mut state, request).await {
        warn!(
            plugin = plugin.name(),
            request = %request_key,
            reason = %status,
            "pre-filter aborted cycle"
        );
        return Err(status);
    }

    // Frozen from here on: Filter and Score only get shared access.
    let state = Arc::new(state);
    let mut outcome = CycleOutcome::default();

    let mut feasible = Vec::with_capacity(candidates.len());
    for node in candidates {
        match plugin.filter(ctx, &state, request, node) {
            Ok(()) => feasible.push(node.name.clone()),
            Err(status) => {
                debug!(node = %node.name, reason = %status, "candidate filtered out");
                outcome.rejected.push((node.name.clone(), status));
            }
        }
    }

    let shared_request = Arc::new(request.clone());
    let mut tasks = JoinSet::new();
    let mut in_flight: HashMap<Id, String> = HashMap::with_capacity(feasible.len());
    for (idx, name) in feasible.into_iter().enumerate() {
        let plugin = plugin.clone();
        let state = state.clone();
        let ctx = ctx.clone();
        let request = shared_request.clone();
        let task_name = name.clone();
        let handle = tasks.spawn(async move {
            let result = plugin.score(&ctx, &state, &request, &task_name).await;
            (idx, task_name, result)
        });
        in_flight.insert(handle.id(), name);
    }

    let mut scored: Vec<(usize, NodeScore)> = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((idx, name, Ok(score))) => scored.push((idx, NodeScore { name, score })),
            Ok((_, name, Err(status))) => {
                warn!(node = %name, reason = %status, "candidate scoring failed");
                outcome.rejected.push((name, status));
            }
            Err(e) => {
                let name = in_flight.remove(&e.id()).unwrap_or_default();
                error!(node = %name, error = %e, "score task did not complete");
                let status = Status::new(Code::Error, format!("score task did not complete: {e}"));
                outcome.rejected.push((name, status));
            }
        }
    }
    scored.sort_by_key(|(idx, _)| *idx);
    outcome.scores = scored.into_iter().map(|(_, s)| s).collect();

    if let Some(ext) = plugin.score_extensions() {
        ext.normalize_score(ctx, &state, request, &mut outcome.scores)?;
    }

    outcome.selected = select_highest(&outcome.scores);
    info!(
        plugin = plugin.name(),
        request = %request_key,
        candidates = candidates.len(),
        scored = outcome.scores.len(),
        selected = outcome.selected.as_deref().unwrap_or("<none>"),
        "scheduling cycle complete"
    );

    Ok(outcome)
}

/// First candidate holding the highest score.
fn select_highest(scores: &[NodeScore]) -> Option<String> {
    let mut best: Option<&NodeScore> = None;
    for s in scores {
        if best.is_none_or(|b| s.score > b.score) {
            best = Some(s);
        }
    }
    best.map(|s| s.name.clone())
}
