//! One scheduling cycle from files on disk.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use serde::Serialize;
use tracing::info;

use edgeplace_framework::{CycleContext, NodeScore, run_cycle};
use edgeplace_placement::config::parse_duration;
use edgeplace_placement::{NetworkAwareConfig, PluginHandle, Registry};
use edgeplace_state::{NodeSnapshot, TopologyCache, load};

pub struct ScoreArgs {
    pub plugin: String,
    pub snapshot: PathBuf,
    pub topology: Option<PathBuf>,
    pub request: PathBuf,
    pub config: Option<PathBuf>,
    pub candidates: Vec<String>,
    pub deadline: String,
}

#[derive(Debug, Serialize)]
pub struct ScoreReport {
    pub plugin: String,
    pub request: String,
    pub scores: Vec<NodeScore>,
    pub rejected: Vec<Rejection>,
    pub selected: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Rejection {
    pub node: String,
    pub reason: String,
}

pub async fn run(args: ScoreArgs) -> anyhow::Result<ScoreReport> {
    let config = match &args.config {
        Some(path) => NetworkAwareConfig::from_file(path)?,
        None => NetworkAwareConfig::default(),
    }
    .with_env_overrides();
    let deadline = parse_duration(&args.deadline)
        .with_context(|| format!("invalid deadline {:?}", args.deadline))?;

    let snapshot = load::load_snapshot(&args.snapshot)
        .with_context(|| format!("loading snapshot {}", args.snapshot.display()))?;
    let request = load::load_request(&args.request)
        .with_context(|| format!("loading request {}", args.request.display()))?;
    let topology = TopologyCache::new();
    if let Some(path) = &args.topology {
        let records = load::load_topologies(path)
            .with_context(|| format!("loading topology {}", path.display()))?;
        topology.replace_all(records);
    }
    info!(
        nodes = snapshot.len(),
        topologies = topology.len(),
        request = %request.key(),
        "dry-run inputs loaded"
    );

    let candidates = select_candidates(&snapshot, &args.candidates)?;

    let handle = PluginHandle {
        snapshot: Arc::new(snapshot),
        topology: Arc::new(topology),
        config,
    };
    let plugin = Registry::with_defaults().build(&args.plugin, &handle)?;

    let (ctx, _cancel) = CycleContext::new(Some(deadline));
    let outcome = run_cycle(plugin, &ctx, &request, &candidates)
        .await
        .map_err(|status| anyhow::anyhow!("scheduling cycle aborted: {status}"))?;

    Ok(ScoreReport {
        plugin: args.plugin,
        request: request.key(),
        scores: outcome.scores,
        rejected: outcome
            .rejected
            .into_iter()
            .map(|(node, status)| Rejection {
                node,
                reason: status.message(),
            })
            .collect(),
        selected: outcome.selected,
    })
}

/// Candidates in the order given, or every snapshot node sorted by name.
fn select_candidates(
    snapshot: &edgeplace_state::ClusterSnapshot,
    wanted: &[String],
) -> anyhow::Result<Vec<NodeSnapshot>> {
    let names = if wanted.is_empty() {
        snapshot.node_names()
    } else {
        wanted.to_vec()
    };
    let mut nodes = Vec::with_capacity(names.len());
    for name in names {
        match snapshot.get(&name) {
            Some(node) => nodes.push(node.clone()),
            None => bail!("candidate {name:?} is not in the snapshot"),
        }
    }
    Ok(nodes)
}
