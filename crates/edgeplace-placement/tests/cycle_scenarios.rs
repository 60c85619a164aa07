//! End-to-end scheduling cycles through the registry-built plugins.
//!
//! Each test builds the plugin the way the host would (by name, from a
//! handle), then drives it through a full cycle with `run_cycle`. The
//! predictor is served in-process by axum on an ephemeral port.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Router;
use axum::routing::post;

use edgeplace_framework::{
    Code, CycleContext, CycleOutcome, CyclePlugin, NodeScore, Status, run_cycle,
};
use edgeplace_placement::{
    MissingCostData, NetworkAwareConfig, PluginHandle, Registry, UnmeasuredLink,
};
use edgeplace_state::{
    ClusterSnapshot, CostInfo, DATA_SOURCE_ANNOTATION, NodeSnapshot, Origin, PlacementRequest,
    Resources, SharedSnapshot, Topology, TopologyCache, TopologyResource,
};

fn node(name: &str, used_cpu: i64, used_mem: i64) -> NodeSnapshot {
    NodeSnapshot::new(
        name,
        Resources { milli_cpu: 4000, memory: 8_000_000_000 },
        Resources { milli_cpu: used_cpu, memory: used_mem },
    )
}

fn cluster() -> Vec<NodeSnapshot> {
    vec![
        node("nodeA", 1000, 2_000_000_000),
        node("nodeB", 2000, 4_000_000_000),
        node("nodeC", 500, 1_000_000_000),
        node("nodeD", 0, 0),
    ]
}

fn topology_for_node_a() -> TopologyResource {
    TopologyResource {
        namespace: "kube-system".to_string(),
        name: "edge1".to_string(),
        topologies: vec![Topology {
            topology_key: "network".to_string(),
            origin_list: vec![Origin {
                origin: "nodeA".to_string(),
                cost_list: vec![
                    CostInfo { destination: "nodeB".to_string(), network_cost: 10 },
                    CostInfo { destination: "nodeC".to_string(), network_cost: 50 },
                ],
            }],
        }],
    }
}

fn handle(config: NetworkAwareConfig, topology: TopologyCache) -> PluginHandle {
    PluginHandle {
        snapshot: Arc::new(ClusterSnapshot::new(cluster())),
        topology: Arc::new(topology),
        config,
    }
}

fn request_from(source: &str) -> PlacementRequest {
    PlacementRequest::new("default", "reader").with_annotation(DATA_SOURCE_ANNOTATION, source)
}

/// Run one cycle with no deadline for a request reading from `source`.
async fn run_from(
    plugin: Arc<dyn CyclePlugin>,
    source: &str,
    candidates: &[NodeSnapshot],
) -> Result<CycleOutcome, Status> {
    run_cycle(plugin, &CycleContext::background(), &request_from(source), candidates).await
}

fn by_name(scores: &[NodeScore]) -> HashMap<&str, i64> {
    scores.iter().map(|s| (s.name.as_str(), s.score)).collect()
}

/// Serve a predictor answering `concurrency` and counting calls.
async fn predictor(concurrency: f32) -> (String, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let router = Router::new().route(
        "/predict",
        post(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                axum::Json(serde_json::json!({"latencyMS": 1.5, "concurrency": concurrency}))
            }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (format!("http://{addr}/predict"), calls)
}

// ── Topology cost ──────────────────────────────────────────────

#[tokio::test]
async fn topology_raw_scores_are_negated_costs() {
    let cache = TopologyCache::new();
    cache.upsert(topology_for_node_a());
    let h = handle(NetworkAwareConfig::default(), cache);
    let plugin = Registry::with_defaults().build("NetworkOverhead", &h).unwrap();

    let ctx = CycleContext::background();
    let req = request_from("nodeA");
    let mut state = edgeplace_framework::CycleState::new();
    plugin.pre_filter(&ctx, &mut state, &req).await.unwrap();

    assert_eq!(plugin.score(&ctx, &state, &req, "nodeB").await.unwrap(), -10);
    assert_eq!(plugin.score(&ctx, &state, &req, "nodeC").await.unwrap(), -50);
    assert_eq!(plugin.score(&ctx, &state, &req, "nodeD").await.unwrap(), 0);
    assert_eq!(plugin.score(&ctx, &state, &req, "not-in-snapshot").await.unwrap(), 0);
}

#[tokio::test]
async fn topology_cycle_with_neutral_unmeasured_links() {
    let cache = TopologyCache::new();
    cache.upsert(topology_for_node_a());
    let h = handle(NetworkAwareConfig::default(), cache);
    let plugin = Registry::with_defaults().build("NetworkOverhead", &h).unwrap();

    let candidates: Vec<NodeSnapshot> = cluster().into_iter().skip(1).collect();
    let outcome = run_from(plugin, "nodeA", &candidates).await.unwrap();

    // Raw -10 / -50 / 0: the unmeasured nodeD reads as a free link.
    let scores = by_name(&outcome.scores);
    assert_eq!(scores["nodeB"], 80);
    assert_eq!(scores["nodeC"], 0);
    assert_eq!(scores["nodeD"], 100);
    assert_eq!(outcome.selected.as_deref(), Some("nodeD"));
}

#[tokio::test]
async fn topology_cycle_with_average_unmeasured_links() {
    let cache = TopologyCache::new();
    cache.upsert(topology_for_node_a());
    let config = NetworkAwareConfig {
        unmeasured_link: UnmeasuredLink::Average,
        ..NetworkAwareConfig::default()
    };
    let plugin = Registry::with_defaults()
        .build("NetworkOverhead", &handle(config, cache))
        .unwrap();

    let candidates: Vec<NodeSnapshot> = cluster().into_iter().skip(1).collect();
    let outcome = run_from(plugin, "nodeA", &candidates).await.unwrap();

    // Raw -10 / -50 / -30: measured low cost beats unmeasured beats high cost.
    let scores = by_name(&outcome.scores);
    assert!(scores["nodeB"] > scores["nodeD"]);
    assert!(scores["nodeD"] > scores["nodeC"]);
    assert_eq!(scores["nodeB"], 100);
    assert_eq!(scores["nodeD"], 50);
    assert_eq!(scores["nodeC"], 0);
    assert_eq!(outcome.selected.as_deref(), Some("nodeB"));
}

#[tokio::test]
async fn topology_missing_record_aborts_cycle() {
    let h = handle(NetworkAwareConfig::default(), TopologyCache::new());
    let plugin = Registry::with_defaults().build("NetworkOverhead", &h).unwrap();

    let err = run_from(plugin, "nodeA", &cluster()).await.unwrap_err();
    assert_eq!(err.code(), Code::Error);
    assert!(err.message().contains("no cost data"));
}

#[tokio::test]
async fn topology_missing_record_neutral_policy_scores_uniformly() {
    let config = NetworkAwareConfig {
        missing_cost_data: MissingCostData::Neutral,
        ..NetworkAwareConfig::default()
    };
    let plugin = Registry::with_defaults()
        .build("NetworkOverhead", &handle(config, TopologyCache::new()))
        .unwrap();

    let outcome = run_from(plugin, "nodeA", &cluster()).await.unwrap();
    assert!(outcome.scores.iter().all(|s| s.score == 50));
    assert_eq!(outcome.selected.as_deref(), Some("nodeA"));
}

#[tokio::test]
async fn topology_updates_apply_to_later_cycles() {
    let cache = TopologyCache::new();
    cache.upsert(topology_for_node_a());
    let h = handle(NetworkAwareConfig::default(), cache.clone());
    let plugin = Registry::with_defaults().build("NetworkOverhead", &h).unwrap();
    let candidates: Vec<NodeSnapshot> = cluster().into_iter().skip(1).take(2).collect();

    let first = run_from(plugin.clone(), "nodeA", &candidates).await.unwrap();
    assert_eq!(first.selected.as_deref(), Some("nodeB"));

    let mut flipped = topology_for_node_a();
    flipped.topologies[0].origin_list[0].cost_list[0].network_cost = 90;
    cache.upsert(flipped);

    let second = run_from(plugin, "nodeA", &candidates).await.unwrap();
    assert_eq!(second.selected.as_deref(), Some("nodeC"));
}

// ── Predictive bandwidth ───────────────────────────────────────

#[tokio::test]
async fn predictive_scores_every_candidate_from_prediction() {
    let (url, calls) = predictor(0.35).await;
    let config = NetworkAwareConfig {
        predictor_endpoint: url,
        ..NetworkAwareConfig::default()
    };
    let h = handle(config, TopologyCache::new());
    let plugin = Registry::with_defaults().build("device-app-plugin", &h).unwrap();

    let ctx = CycleContext::background();
    let req = request_from("nodeA");
    let mut state = edgeplace_framework::CycleState::new();
    plugin.pre_filter(&ctx, &mut state, &req).await.unwrap();
    for candidate in ["nodeB", "nodeC", "nodeD"] {
        assert_eq!(plugin.score(&ctx, &state, &req, candidate).await.unwrap(), 350);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    // Equal raw scores normalize to the uniform midpoint.
    let outcome = run_cycle(plugin, &ctx, &req, &cluster()).await.unwrap();
    assert_eq!(outcome.scores.len(), 4);
    assert!(outcome.scores.iter().all(|s| s.score == 50));
}

#[tokio::test]
async fn predictive_failures_degrade_to_fallback_score() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead = format!("http://{}/predict", listener.local_addr().unwrap());
    drop(listener);

    let config = NetworkAwareConfig {
        predictor_endpoint: dead,
        ..NetworkAwareConfig::default()
    };
    let plugin = Registry::with_defaults()
        .build("device-app-plugin", &handle(config, TopologyCache::new()))
        .unwrap();

    let ctx = CycleContext::background();
    let req = request_from("nodeA");
    let mut state = edgeplace_framework::CycleState::new();
    plugin.pre_filter(&ctx, &mut state, &req).await.unwrap();
    assert_eq!(plugin.score(&ctx, &state, &req, "nodeB").await.unwrap(), -1);

    // The cycle still completes with every candidate scored.
    let outcome = run_cycle(plugin, &ctx, &req, &cluster()).await.unwrap();
    assert_eq!(outcome.scores.len(), 4);
    assert!(outcome.rejected.is_empty());
}

#[tokio::test]
async fn predictive_unknown_candidate_is_dropped_not_fatal() {
    let (url, _calls) = predictor(1.0).await;
    let config = NetworkAwareConfig {
        predictor_endpoint: url,
        ..NetworkAwareConfig::default()
    };
    let plugin = Registry::with_defaults()
        .build("device-app-plugin", &handle(config, TopologyCache::new()))
        .unwrap();

    let mut candidates = cluster();
    candidates.push(node("nodeZ", 0, 0)); // Not in the plugin's snapshot.

    let outcome = run_from(plugin, "nodeA", &candidates).await.unwrap();
    assert_eq!(outcome.scores.len(), 4);
    assert_eq!(outcome.rejected.len(), 1);
    assert_eq!(outcome.rejected[0].0, "nodeZ");
}

#[tokio::test]
async fn predictive_cycle_honours_deadline() {
    let router = Router::new().route(
        "/predict",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            axum::Json(serde_json::json!({"concurrency": 5.0}))
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let config = NetworkAwareConfig {
        predictor_endpoint: format!("http://{addr}/predict"),
        predictor_timeout: "60s".to_string(),
        ..NetworkAwareConfig::default()
    };
    let plugin = Registry::with_defaults()
        .build("device-app-plugin", &handle(config, TopologyCache::new()))
        .unwrap();

    let (ctx, _cancel) = CycleContext::new(Some(Duration::from_millis(200)));
    let started = std::time::Instant::now();
    let outcome = run_cycle(plugin, &ctx, &request_from("nodeA"), &cluster()).await.unwrap();

    assert!(started.elapsed() < Duration::from_secs(10));
    // Every call timed out to the fallback, so all scores are equal.
    assert!(outcome.scores.iter().all(|s| s.score == 50));
}

// ── Intent extraction ──────────────────────────────────────────

#[tokio::test]
async fn missing_annotation_aborts_before_any_scoring() {
    let (url, calls) = predictor(0.5).await;
    let config = NetworkAwareConfig {
        predictor_endpoint: url,
        ..NetworkAwareConfig::default()
    };
    let cache = TopologyCache::new();
    cache.upsert(topology_for_node_a());
    let h = handle(config, cache);
    let registry = Registry::with_defaults();

    for name in registry.names() {
        let plugin = registry.build(name, &h).unwrap();
        let err = run_cycle(
            plugin,
            &CycleContext::background(),
            &PlacementRequest::new("default", "reader"),
            &cluster(),
        )
        .await
        .unwrap_err();
        assert!(err.message().contains("no dataSourceNode annotation"), "{name}: {err}");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unknown_source_node_aborts_cycle() {
    let cache = TopologyCache::new();
    cache.upsert(topology_for_node_a());
    let h = handle(NetworkAwareConfig::default(), cache);
    let registry = Registry::with_defaults();

    for name in registry.names() {
        let plugin = registry.build(name, &h).unwrap();
        let err = run_from(plugin, "nodeQ", &cluster()).await.unwrap_err();
        assert!(err.message().contains("not found"), "{name}: {err}");
    }
}

#[tokio::test]
async fn shared_snapshot_replacement_is_seen_by_next_cycle() {
    let shared = SharedSnapshot::new(ClusterSnapshot::new(cluster()));
    let cache = TopologyCache::new();
    cache.upsert(topology_for_node_a());
    let h = PluginHandle {
        snapshot: Arc::new(shared.clone()),
        topology: Arc::new(cache),
        config: NetworkAwareConfig::default(),
    };
    let plugin = Registry::with_defaults().build("NetworkOverhead", &h).unwrap();

    shared.replace(ClusterSnapshot::new(cluster().into_iter().skip(1)));
    let err = run_from(plugin, "nodeA", &cluster()).await.unwrap_err();
    assert!(err.message().contains("nodeA"));
}
