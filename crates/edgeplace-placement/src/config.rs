//! Plugin configuration.
//!
//! Read once at startup from TOML, then overlaid with the two environment
//! overrides the deployment manifests set (`PredictURL`, `CLUSTERNAME`).
//! Plugins never consult the environment themselves.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use edgeplace_predictor::DEFAULT_ENDPOINT;

use crate::error::{PlacementError, PlacementResult};

/// Overrides `predictor_endpoint`.
pub const PREDICTOR_ENDPOINT_ENV: &str = "PredictURL";

/// Overrides `topology_name`.
pub const TOPOLOGY_NAME_ENV: &str = "CLUSTERNAME";

/// What PreFilter does when the topology record has no costs for the
/// data-source node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingCostData {
    /// Fail the cycle; the host retries the request later.
    #[default]
    Abort,
    /// Carry on with an empty cost list, so every candidate scores neutral.
    Neutral,
}

/// How a candidate absent from the source's cost list is scored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmeasuredLink {
    /// Score 0, as if the link were free.
    #[default]
    Neutral,
    /// Score as the mean of the measured costs from the source.
    Average,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkAwareConfig {
    /// Bandwidth predictor URL (plain http).
    pub predictor_endpoint: String,
    /// Upper bound per predictor call, e.g. "2s" or "500ms". Always further
    /// clamped to the time left in the cycle.
    pub predictor_timeout: String,
    /// Topology record consulted by the topology-cost plugin.
    pub topology_name: String,
    pub topology_namespace: String,
    /// Topology key whose origins hold the network costs.
    pub topology_key: String,
    pub missing_cost_data: MissingCostData,
    pub unmeasured_link: UnmeasuredLink,
}

impl Default for NetworkAwareConfig {
    fn default() -> Self {
        Self {
            predictor_endpoint: DEFAULT_ENDPOINT.to_string(),
            predictor_timeout: "2s".to_string(),
            topology_name: "edge1".to_string(),
            topology_namespace: "kube-system".to_string(),
            topology_key: "network".to_string(),
            missing_cost_data: MissingCostData::Abort,
            unmeasured_link: UnmeasuredLink::Neutral,
        }
    }
}

impl NetworkAwareConfig {
    pub fn from_toml_str(content: &str) -> PlacementResult<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| PlacementError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> PlacementResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PlacementError::Config(format!("reading {}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup` (an environment stand-in).
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(endpoint) = lookup(PREDICTOR_ENDPOINT_ENV) {
            info!(endpoint = %endpoint, "predictor endpoint overridden from environment");
            self.predictor_endpoint = endpoint;
        }
        if let Some(name) = lookup(TOPOLOGY_NAME_ENV) {
            info!(topology = %name, "topology name overridden from environment");
            self.topology_name = name;
        }
        self
    }

    pub fn validate(&self) -> PlacementResult<()> {
        self.predictor_timeout()?;
        if self.topology_key.is_empty() {
            return Err(PlacementError::Config("topology_key must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn predictor_timeout(&self) -> PlacementResult<Duration> {
        parse_duration(&self.predictor_timeout).ok_or_else(|| {
            PlacementError::Config(format!(
                "predictor_timeout {:?} is not a duration",
                self.predictor_timeout
            ))
        })
    }
}

/// Parse a duration string like "5s", "500ms", "1m".
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(secs) = s.strip_suffix('s') {
        if let Some(ms) = secs.strip_suffix('m') {
            ms.parse::<u64>().ok().map(Duration::from_millis)
        } else {
            secs.parse::<u64>().ok().map(Duration::from_secs)
        }
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
    } else {
        s.parse::<u64>().ok().map(Duration::from_secs)
    }
}
