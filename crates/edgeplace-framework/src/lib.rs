//! edgeplace-framework: the contract between the host orchestrator and
//! placement plugins.
//!
//! A scheduling cycle runs, for one placement request:
//!
//! ```text
//! PreFilter ──► Filter (per candidate) ──► Score (per candidate, concurrent)
//!     │                                           │
//!     └── writes CycleState ─────── read by ──────┘
//!                                                 ▼
//!                                         NormalizeScore ──► winner
//! ```
//!
//! The host side (candidate discovery, binding, preemption) is out of
//! scope; [`cycle::run_cycle`] drives the phases the way the host would so
//! plugins can be exercised end to end.

pub mod context;
pub mod cycle;
pub mod cycle_state;
pub mod plugin;
pub mod status;

pub use context::{CancelHandle, CycleContext};
pub use cycle::{CycleOutcome, run_cycle};
pub use cycle_state::CycleState;
pub use plugin::{
    CyclePlugin, FilterPlugin, MAX_NODE_SCORE, MIN_NODE_SCORE, NodeScore, Plugin,
    PreFilterPlugin, ScoreExtensions, ScorePlugin,
};
pub use status::{Code, Status};
