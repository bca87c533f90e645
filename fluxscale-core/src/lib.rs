#![warn(missing_docs)]
//! FluxScale Core - Measurement Model
//!
//! Holds raw thread-scaling timings and guarantees the invariants the metrics
//! engine relies on:
//! - Every size has a sequential baseline at one thread
//! - Every time is finite and strictly positive
//! - Every parallel label decomposes into a scheduling policy and a chunk size
//!
//! Absent measurements are reported as absent (`None` or a not-found error),
//! never as a zero time.

mod error;
mod label;
mod measurement;
mod source;
mod store;

pub use error::{ErrorKind, ScaleError};
pub use label::{ConfigLabel, Schedule, SchedulePolicy};
pub use measurement::{Measurement, MeasurementRecord};
pub use source::{read_csv, read_json, read_path};
pub use store::ResultStore;

/// Label that marks the unparallelized baseline run
pub const DEFAULT_BASELINE_LABEL: &str = "sequential";

/// Thread count at which the baseline must be recorded
pub const BASELINE_THREADS: u32 = 1;
