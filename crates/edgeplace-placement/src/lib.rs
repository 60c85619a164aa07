//! edgeplace-placement: network-aware placement plugins.
//!
//! Both plugins share one lifecycle ([`NetworkAware`]) and differ only in
//! their [`CostStrategy`]:
//!
//! - **`predictive`**: asks the bandwidth predictor for the concurrency
//!   sustainable between the data-source node and each candidate
//! - **`topology_cost`**: looks up the measured network cost from the
//!   data-source node in the synchronized topology record
//!
//! Scores from either strategy are rescaled onto `0..=100` by
//! [`normalize::normalize_scores`].

pub mod config;
pub mod error;
pub mod network_aware;
pub mod normalize;
pub mod predictive;
pub mod registry;
pub mod strategy;
pub mod topology_cost;

pub use config::{MissingCostData, NetworkAwareConfig, UnmeasuredLink};
pub use error::{PlacementError, PlacementResult};
pub use network_aware::NetworkAware;
pub use normalize::{UNIFORM_SCORE, normalize_scores};
pub use predictive::{FAILED_PREDICTION_SCORE, PredictiveBandwidth};
pub use registry::{PluginFactory, PluginHandle, Registry};
pub use strategy::{CostStrategy, PreFilterState};
pub use topology_cost::{NEUTRAL_SCORE, TopologyCost};
