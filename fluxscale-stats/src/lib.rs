#![warn(missing_docs)]
//! FluxScale Statistical Engine
//!
//! Derives scaling metrics from a validated [`ResultStore`](fluxscale_core::ResultStore):
//! - Speedup and parallel efficiency per measurement
//! - Speedup and efficiency series across thread counts
//! - Chunk-size impact within one scheduling policy
//! - Cross-policy comparison at a fixed chunk size
//! - Deterministic best-configuration ranking
//!
//! Everything is recomputed per query from the immutable store; nothing is
//! cached and nothing is rounded.

mod ranking;
mod series;
mod speedup;

pub use ranking::{BestConfig, best_config_at, best_overall};
pub use series::{
    PolicySeries, ScalingPoint, chunk_impact, efficiency_series, policy_comparison,
    scaling_table, speedup_series,
};
pub use speedup::{efficiency, ideal_speedup, speedup};

/// Efficiency reported for perfectly linear scaling
pub const IDEAL_EFFICIENCY: f64 = 100.0;
