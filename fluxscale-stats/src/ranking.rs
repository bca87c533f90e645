//! Configuration Ranking
//!
//! Picks the fastest parallel configuration. Ties on speedup are broken
//! deterministically: fewer threads (overall ranking only), then the smaller
//! chunk, then the lexicographically smaller policy name. The baseline is
//! never a candidate.

use crate::speedup::{ensure_threads, speedup};
use fluxscale_core::{ConfigLabel, ResultStore, ScaleError};
use std::cmp::Ordering;

/// Winning configuration with its speedup
#[derive(Debug, Clone, PartialEq)]
pub struct BestConfig {
    /// Thread count the winner was measured at
    pub threads: u32,
    /// Winning configuration
    pub config: ConfigLabel,
    /// Its speedup over the baseline
    pub speedup: f64,
}

impl BestConfig {
    /// Parallel efficiency of the winner in percent
    pub fn efficiency(&self) -> f64 {
        self.speedup / f64::from(self.threads) * 100.0
    }
}

/// Parallel configuration with maximal speedup at `(size, threads)`
pub fn best_config_at(
    store: &ResultStore,
    size: u64,
    threads: u32,
) -> Result<ConfigLabel, ScaleError> {
    ensure_threads(threads)?;
    store.baseline_time(size)?;

    let mut candidates = Vec::new();
    for config in store.configs_for(size, threads) {
        if config.is_sequential() {
            continue;
        }
        candidates.push(BestConfig {
            threads,
            config: config.clone(),
            speedup: speedup(store, size, threads, config)?,
        });
    }

    candidates
        .into_iter()
        .min_by(rank)
        .map(|best| best.config)
        .ok_or(ScaleError::NoParallelConfig { size, threads })
}

/// Fastest parallel measurement for `size` across every thread count
pub fn best_overall(store: &ResultStore, size: u64) -> Result<BestConfig, ScaleError> {
    store.baseline_time(size)?;

    let mut best: Option<BestConfig> = None;
    for threads in store.thread_counts(size) {
        for config in store.configs_for(size, threads) {
            if config.is_sequential() {
                continue;
            }
            let candidate = BestConfig {
                threads,
                config: config.clone(),
                speedup: speedup(store, size, threads, config)?,
            };
            best = match best {
                Some(current) if rank(&current, &candidate) != Ordering::Greater => Some(current),
                _ => Some(candidate),
            };
        }
    }

    best.ok_or(ScaleError::NoParallelRuns { size })
}

/// `Less` when `a` ranks ahead of `b`
fn rank(a: &BestConfig, b: &BestConfig) -> Ordering {
    b.speedup
        .total_cmp(&a.speedup)
        .then_with(|| a.threads.cmp(&b.threads))
        .then_with(|| a.config.chunk().cmp(&b.config.chunk()))
        .then_with(|| a.config.policy().cmp(&b.config.policy()))
}
