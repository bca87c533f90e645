#![warn(missing_docs)]
//! # FluxScale
//!
//! Speedup and parallel-efficiency analysis for thread-scaling benchmarks.
//!
//! FluxScale takes the raw timings a benchmark harness produces for a
//! parallel kernel (problem size × thread count × scheduling policy and
//! chunk size) and derives the numbers scaling plots are drawn from:
//! - **Validated store**: every size must carry a sequential baseline; bad
//!   times, duplicates and malformed labels are rejected on load
//! - **Speedup and efficiency**: relative to the sequential baseline, with
//!   unmeasured points reported as absent rather than zero
//! - **Series**: trend across thread counts, chunk-size impact, cross-policy
//!   comparison
//! - **Ranking**: best configuration at a thread count or overall, with
//!   deterministic tie-breaking
//! - **Reports**: JSON, CSV, Markdown and terminal output
//!
//! ## Quick Start
//!
//! ```
//! use fluxscale::{ConfigLabel, Measurement, ResultStore, best_config_at, speedup};
//!
//! let label: ConfigLabel = "static_16".parse()?;
//! let store = ResultStore::load(vec![
//!     Measurement::sequential(512, 0.12),
//!     Measurement::new(512, 8, label.clone(), 0.022),
//! ])?;
//!
//! assert!((speedup(&store, 512, 8, &label)? - 5.4545).abs() < 1e-4);
//! assert_eq!(best_config_at(&store, 512, 8)?, label);
//! # Ok::<(), fluxscale::ScaleError>(())
//! ```

// Re-export core types
pub use fluxscale_core::{
    BASELINE_THREADS, ConfigLabel, DEFAULT_BASELINE_LABEL, ErrorKind, Measurement,
    MeasurementRecord, ResultStore, ScaleError, Schedule, SchedulePolicy, read_csv, read_json,
    read_path,
};

// Re-export metrics
pub use fluxscale_stats::{
    BestConfig, IDEAL_EFFICIENCY, PolicySeries, ScalingPoint, best_config_at, best_overall,
    chunk_impact, efficiency, efficiency_series, ideal_speedup, policy_comparison, scaling_table,
    speedup, speedup_series,
};

// Re-export report
pub use fluxscale_report::{OutputFormat, Report};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        ConfigLabel, Measurement, ResultStore, ScaleError, Schedule, SchedulePolicy,
        best_config_at, best_overall, chunk_impact, efficiency, speedup, speedup_series,
    };
}

/// Run the FluxScale CLI.
///
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     fluxscale::run()
/// }
/// ```
pub use fluxscale_cli::run;
