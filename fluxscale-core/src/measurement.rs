//! Measurements
//!
//! [`Measurement`] is the typed form held by the store. [`MeasurementRecord`]
//! is what a benchmarking harness writes out: the schedule and chunk as loose
//! fields that still need to be checked against the label schema.

use crate::error::ScaleError;
use crate::label::{ConfigLabel, Schedule};
use serde::{Deserialize, Serialize};

/// One timing sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Linear dimension of the workload (e.g. matrix edge length)
    pub size: u64,
    /// Degree of parallelism
    pub threads: u32,
    /// Baseline marker or schedule
    pub config: ConfigLabel,
    /// Wall-clock seconds
    pub time: f64,
}

impl Measurement {
    /// Create a measurement
    pub fn new(size: u64, threads: u32, config: ConfigLabel, time: f64) -> Self {
        Self {
            size,
            threads,
            config,
            time,
        }
    }

    /// Sequential baseline for `size` (always one thread)
    pub fn sequential(size: u64, time: f64) -> Self {
        Self::new(size, 1, ConfigLabel::Sequential, time)
    }

    /// Parallel run under `schedule`
    pub fn parallel(size: u64, threads: u32, schedule: Schedule, time: f64) -> Self {
        Self::new(size, threads, ConfigLabel::Parallel(schedule), time)
    }
}

/// Measurement as supplied by the benchmarking collaborator
///
/// Columns beyond these (precomputed speedup or efficiency, for instance) are
/// ignored; derived values are always recomputed from times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    /// Workload size
    pub size: u64,
    /// Thread count
    pub threads: u32,
    /// Baseline marker, bare policy name, or `<policy>_<chunk>` label
    #[serde(alias = "config", alias = "label")]
    pub schedule: String,
    /// Chunk size when `schedule` is a bare policy name
    #[serde(default)]
    pub chunk: Option<u32>,
    /// Wall-clock seconds
    pub time: f64,
}

impl MeasurementRecord {
    /// Resolve the schedule fields into a typed measurement
    pub fn into_measurement(self, baseline_label: &str) -> Result<Measurement, ScaleError> {
        let config = ConfigLabel::from_parts(&self.schedule, self.chunk, baseline_label)?;
        Ok(Measurement::new(self.size, self.threads, config, self.time))
    }
}

impl From<&Measurement> for MeasurementRecord {
    fn from(m: &Measurement) -> Self {
        Self {
            size: m.size,
            threads: m.threads,
            schedule: m
                .config
                .policy()
                .map_or_else(|| m.config.to_string(), |p| p.to_string()),
            chunk: m.config.chunk(),
            time: m.time,
        }
    }
}
