//! Scaling Series
//!
//! Slices of the result table a report plots:
//! - one configuration across thread counts (trend)
//! - one policy across chunk sizes at fixed threads (chunk impact)
//! - every policy at a fixed chunk (cross-policy comparison)
//!
//! Points that were never measured are skipped, not interpolated.

use crate::speedup::{efficiency, ensure_threads, speedup};
use fluxscale_core::{ConfigLabel, ResultStore, ScaleError, SchedulePolicy};

/// Speedup curve of one policy in a cross-policy comparison
#[derive(Debug, Clone, PartialEq)]
pub struct PolicySeries {
    /// Scheduling policy
    pub policy: SchedulePolicy,
    /// Label the series was computed for (`<policy>_<chunk>`)
    pub config: ConfigLabel,
    /// `(threads, speedup)` ascending by threads
    pub points: Vec<(u32, f64)>,
}

/// Every derived value for one measurement
#[derive(Debug, Clone, PartialEq)]
pub struct ScalingPoint {
    /// Workload size
    pub size: u64,
    /// Thread count
    pub threads: u32,
    /// Configuration
    pub config: ConfigLabel,
    /// Measured wall-clock seconds
    pub time: f64,
    /// Speedup over the baseline
    pub speedup: f64,
    /// Parallel efficiency in percent
    pub efficiency: f64,
}

/// `(threads, speedup)` for `config` across every thread count recorded for `size`
pub fn speedup_series(
    store: &ResultStore,
    size: u64,
    config: &ConfigLabel,
) -> Result<Vec<(u32, f64)>, ScaleError> {
    series_with(store, size, config, speedup)
}

/// `(threads, efficiency%)` for `config`, same ordering and gaps as [`speedup_series`]
pub fn efficiency_series(
    store: &ResultStore,
    size: u64,
    config: &ConfigLabel,
) -> Result<Vec<(u32, f64)>, ScaleError> {
    series_with(store, size, config, efficiency)
}

fn series_with(
    store: &ResultStore,
    size: u64,
    config: &ConfigLabel,
    metric: fn(&ResultStore, u64, u32, &ConfigLabel) -> Result<f64, ScaleError>,
) -> Result<Vec<(u32, f64)>, ScaleError> {
    // Fails fast on an unknown size
    store.baseline_time(size)?;

    let mut points = Vec::new();
    for threads in store.thread_counts(size) {
        if store.time_for(size, threads, config).is_none() {
            tracing::trace!(size, threads, %config, "no measurement, skipping point");
            continue;
        }
        points.push((threads, metric(store, size, threads, config)?));
    }
    Ok(points)
}

/// `(chunk, speedup)` for one policy at `(size, threads)`, ascending by chunk
pub fn chunk_impact(
    store: &ResultStore,
    size: u64,
    threads: u32,
    policy: &SchedulePolicy,
) -> Result<Vec<(u32, f64)>, ScaleError> {
    ensure_threads(threads)?;
    store.baseline_time(size)?;

    let mut points = Vec::new();
    // Labels of one policy are ordered by chunk within the set
    for config in store.configs_for(size, threads) {
        let Some(schedule) = config.schedule() else {
            continue;
        };
        if schedule.policy() != policy {
            continue;
        }
        points.push((schedule.chunk(), speedup(store, size, threads, config)?));
    }
    Ok(points)
}

/// Speedup series of every policy recorded for `size` with the given `chunk`
///
/// Policies come back in ascending name order; a policy never measured at
/// that chunk is left out.
pub fn policy_comparison(
    store: &ResultStore,
    size: u64,
    chunk: u32,
) -> Result<Vec<PolicySeries>, ScaleError> {
    if chunk == 0 {
        return Err(ScaleError::InvalidArgument(
            "chunk size must be at least 1".to_string(),
        ));
    }
    store.baseline_time(size)?;

    let mut comparison = Vec::new();
    for policy in store.policies_for(size) {
        let config = ConfigLabel::parallel(policy.clone(), chunk)?;
        let points = speedup_series(store, size, &config)?;
        if points.is_empty() {
            continue;
        }
        comparison.push(PolicySeries {
            policy: policy.clone(),
            config,
            points,
        });
    }
    Ok(comparison)
}

/// Every measurement for `size` with its derived metrics
pub fn scaling_table(store: &ResultStore, size: u64) -> Result<Vec<ScalingPoint>, ScaleError> {
    store.baseline_time(size)?;

    store
        .iter()
        .filter(|m| m.size == size)
        .map(|m| {
            let s = speedup(store, m.size, m.threads, &m.config)?;
            Ok(ScalingPoint {
                size: m.size,
                threads: m.threads,
                time: m.time,
                speedup: s,
                efficiency: s / f64::from(m.threads) * 100.0,
                config: m.config,
            })
        })
        .collect()
}
