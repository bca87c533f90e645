//! Speedup and Efficiency
//!
//! Point metrics relative to a size's sequential baseline:
//! - `speedup = baseline_time / time`
//! - `efficiency = speedup / threads * 100`
//!
//! Values are returned unrounded. A missing measurement is an error, never a
//! default, so callers decide whether to drop the point or abort.

use fluxscale_core::{ConfigLabel, ResultStore, ScaleError};

/// Speedup of `config` at `threads` over the baseline for `size`
pub fn speedup(
    store: &ResultStore,
    size: u64,
    threads: u32,
    config: &ConfigLabel,
) -> Result<f64, ScaleError> {
    ensure_threads(threads)?;
    let baseline = store.baseline_time(size)?;
    let time = store
        .time_for(size, threads, config)
        .ok_or_else(|| ScaleError::MeasurementNotFound {
            size,
            threads,
            config: config.clone(),
        })?;
    Ok(baseline / time)
}

/// Parallel efficiency in percent
pub fn efficiency(
    store: &ResultStore,
    size: u64,
    threads: u32,
    config: &ConfigLabel,
) -> Result<f64, ScaleError> {
    ensure_threads(threads)?;
    let s = speedup(store, size, threads, config)?;
    Ok(s / f64::from(threads) * 100.0)
}

/// Linear reference speedup for `threads`
pub fn ideal_speedup(threads: u32) -> f64 {
    f64::from(threads)
}

pub(crate) fn ensure_threads(threads: u32) -> Result<(), ScaleError> {
    if threads == 0 {
        return Err(ScaleError::InvalidArgument(
            "thread count must be at least 1".to_string(),
        ));
    }
    Ok(())
}
