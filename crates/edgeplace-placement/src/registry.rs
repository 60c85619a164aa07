//! Plugin registry: stable names to plugin factories.
//!
//! The host looks plugins up by the name in its scheduling profile, so the
//! names here are part of the deployment contract and must not change.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use edgeplace_framework::CyclePlugin;
use edgeplace_state::{SnapshotLister, TopologyLister};

use crate::config::NetworkAwareConfig;
use crate::error::{PlacementError, PlacementResult};
use crate::network_aware::NetworkAware;
use crate::predictive::PredictiveBandwidth;
use crate::strategy::CostStrategy;
use crate::topology_cost::TopologyCost;

/// What the host hands a plugin at construction time.
#[derive(Clone)]
pub struct PluginHandle {
    pub snapshot: Arc<dyn SnapshotLister>,
    pub topology: Arc<dyn TopologyLister>,
    pub config: NetworkAwareConfig,
}

/// Builds a plugin instance from a handle.
pub type PluginFactory = fn(&PluginHandle) -> PlacementResult<Arc<dyn CyclePlugin>>;

#[derive(Default)]
pub struct Registry {
    factories: BTreeMap<String, PluginFactory>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding both network-aware plugins.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.factories.insert(
            PredictiveBandwidth::NAME.to_string(),
            new_predictive_bandwidth as PluginFactory,
        );
        registry
            .factories
            .insert(TopologyCost::NAME.to_string(), new_topology_cost as PluginFactory);
        registry
    }

    pub fn register(&mut self, name: &str, factory: PluginFactory) -> PlacementResult<()> {
        if self.factories.contains_key(name) {
            return Err(PlacementError::DuplicatePlugin(name.to_string()));
        }
        self.factories.insert(name.to_string(), factory);
        Ok(())
    }

    /// Instantiate the plugin registered as `name`.
    pub fn build(
        &self,
        name: &str,
        handle: &PluginHandle,
    ) -> PlacementResult<Arc<dyn CyclePlugin>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| PlacementError::UnknownPlugin(name.to_string()))?;
        let plugin = factory(handle)?;
        info!(plugin = name, "plugin initialized");
        Ok(plugin)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }
}

fn new_predictive_bandwidth(handle: &PluginHandle) -> PlacementResult<Arc<dyn CyclePlugin>> {
    let strategy = PredictiveBandwidth::from_config(handle.snapshot.clone(), &handle.config)?;
    Ok(Arc::new(NetworkAware::new(strategy, handle.snapshot.clone())))
}

fn new_topology_cost(handle: &PluginHandle) -> PlacementResult<Arc<dyn CyclePlugin>> {
    handle.config.validate()?;
    let strategy = TopologyCost::from_config(handle.topology.clone(), &handle.config);
    Ok(Arc::new(NetworkAware::new(strategy, handle.snapshot.clone())))
}
