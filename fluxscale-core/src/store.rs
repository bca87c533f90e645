//! Result Store
//!
//! Three-level table `size -> threads -> config -> time`, validated once on
//! load and read-only afterwards. Every level is a `BTreeMap`, so sizes,
//! thread counts and labels come back in ascending order without extra sorting.
//!
//! Load is all-or-nothing: the table is assembled locally and only returned
//! once every record has passed validation and every size has its baseline.

use crate::BASELINE_THREADS;
use crate::error::ScaleError;
use crate::label::{ConfigLabel, SchedulePolicy};
use crate::measurement::{Measurement, MeasurementRecord};
use std::collections::{BTreeMap, BTreeSet};

type ConfigTimes = BTreeMap<ConfigLabel, f64>;
type ThreadTable = BTreeMap<u32, ConfigTimes>;

/// Validated, immutable table of timing measurements
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    table: BTreeMap<u64, ThreadTable>,
    len: usize,
}

impl ResultStore {
    /// Build a store from typed measurements
    ///
    /// Fails if any size lacks a sequential baseline at one thread, if any
    /// time is not strictly positive, if a size or thread count is zero, or
    /// if the same `(size, threads, config)` appears twice.
    pub fn load(
        measurements: impl IntoIterator<Item = Measurement>,
    ) -> Result<Self, ScaleError> {
        let mut table: BTreeMap<u64, ThreadTable> = BTreeMap::new();
        let mut len = 0usize;

        for m in measurements {
            validate(&m)?;

            let slot = table
                .entry(m.size)
                .or_default()
                .entry(m.threads)
                .or_default();
            if slot.contains_key(&m.config) {
                return Err(ScaleError::DuplicateMeasurement {
                    size: m.size,
                    threads: m.threads,
                    config: m.config,
                });
            }
            slot.insert(m.config, m.time);
            len += 1;
        }

        for (&size, threads) in &table {
            let has_baseline = threads
                .get(&BASELINE_THREADS)
                .is_some_and(|configs| configs.contains_key(&ConfigLabel::Sequential));
            if !has_baseline {
                return Err(ScaleError::MissingBaseline { size });
            }
        }

        tracing::debug!(
            sizes = table.len(),
            measurements = len,
            "loaded result store"
        );

        Ok(Self { table, len })
    }

    /// Build a store from collaborator records, resolving labels against `baseline_label`
    ///
    /// Label problems surface as schema errors before any validation runs.
    pub fn load_records(
        records: impl IntoIterator<Item = MeasurementRecord>,
        baseline_label: &str,
    ) -> Result<Self, ScaleError> {
        let measurements = records
            .into_iter()
            .map(|r| r.into_measurement(baseline_label))
            .collect::<Result<Vec<_>, _>>()?;
        Self::load(measurements)
    }

    /// Sequential time for `size`
    pub fn baseline_time(&self, size: u64) -> Result<f64, ScaleError> {
        let threads = self
            .table
            .get(&size)
            .ok_or(ScaleError::SizeNotFound { size })?;
        threads
            .get(&BASELINE_THREADS)
            .and_then(|configs| configs.get(&ConfigLabel::Sequential))
            .copied()
            .ok_or(ScaleError::MissingBaseline { size })
    }

    /// Stored time, or `None` when the combination was never measured
    pub fn time_for(&self, size: u64, threads: u32, config: &ConfigLabel) -> Option<f64> {
        self.table
            .get(&size)?
            .get(&threads)?
            .get(config)
            .copied()
    }

    /// Labels recorded at exactly `(size, threads)`
    pub fn configs_for(&self, size: u64, threads: u32) -> BTreeSet<&ConfigLabel> {
        self.table
            .get(&size)
            .and_then(|t| t.get(&threads))
            .map(|configs| configs.keys().collect())
            .unwrap_or_default()
    }

    /// Labels recorded for `size` at any thread count
    pub fn configs_for_size(&self, size: u64) -> BTreeSet<&ConfigLabel> {
        self.table
            .get(&size)
            .map(|t| t.values().flat_map(|configs| configs.keys()).collect())
            .unwrap_or_default()
    }

    /// Scheduling policies recorded for `size`
    pub fn policies_for(&self, size: u64) -> BTreeSet<&SchedulePolicy> {
        self.configs_for_size(size)
            .into_iter()
            .filter_map(ConfigLabel::policy)
            .collect()
    }

    /// Distinct sizes, ascending
    pub fn sizes(&self) -> Vec<u64> {
        self.table.keys().copied().collect()
    }

    /// Distinct thread counts recorded for `size`, ascending
    pub fn thread_counts(&self, size: u64) -> Vec<u32> {
        self.table
            .get(&size)
            .map(|t| t.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Whether `size` is present
    pub fn contains(&self, size: u64) -> bool {
        self.table.contains_key(&size)
    }

    /// Total number of measurements
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the store holds no measurements
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// All measurements in ascending `(size, threads, config)` order
    pub fn iter(&self) -> impl Iterator<Item = Measurement> + '_ {
        self.table.iter().flat_map(|(&size, threads)| {
            threads.iter().flat_map(move |(&threads, configs)| {
                configs
                    .iter()
                    .map(move |(config, &time)| Measurement::new(size, threads, config.clone(), time))
            })
        })
    }
}

fn validate(m: &Measurement) -> Result<(), ScaleError> {
    if m.size == 0 {
        return Err(ScaleError::ZeroDimension { field: "size" });
    }
    if m.threads == 0 {
        return Err(ScaleError::ZeroDimension { field: "threads" });
    }
    if !(m.time.is_finite() && m.time > 0.0) {
        return Err(ScaleError::InvalidTime {
            size: m.size,
            threads: m.threads,
            config: m.config.clone(),
            time: m.time,
        });
    }
    if m.config.is_sequential() && m.threads != BASELINE_THREADS {
        return Err(ScaleError::MisplacedBaseline {
            size: m.size,
            threads: m.threads,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn label(s: &str) -> ConfigLabel {
        s.parse().unwrap()
    }

    fn sample() -> Vec<Measurement> {
        vec![
            Measurement::sequential(512, 0.12),
            Measurement::new(512, 8, label("static_16"), 0.022),
            Measurement::new(512, 8, label("static_1"), 0.028),
            Measurement::new(512, 8, label("static_64"), 0.026),
            Measurement::new(512, 4, label("dynamic_16"), 0.036),
            Measurement::sequential(128, 0.0009),
            Measurement::new(128, 2, label("static_16"), 0.0004),
        ]
    }

    #[test]
    fn test_load_and_query() {
        let store = ResultStore::load(sample()).unwrap();

        assert_eq!(store.len(), 7);
        assert_eq!(store.sizes(), vec![128, 512]);
        assert_eq!(store.thread_counts(512), vec![1, 4, 8]);
        assert!((store.baseline_time(512).unwrap() - 0.12).abs() < f64::EPSILON);
        assert_eq!(store.time_for(512, 8, &label("static_16")), Some(0.022));
    }

    #[test]
    fn test_absent_is_none_not_zero() {
        let store = ResultStore::load(sample()).unwrap();
        assert_eq!(store.time_for(512, 16, &label("static_16")), None);
        assert_eq!(store.time_for(512, 4, &label("static_16")), None);
        assert_eq!(store.time_for(2048, 1, &ConfigLabel::Sequential), None);
    }

    #[test]
    fn test_configs_for_is_point_local() {
        let store = ResultStore::load(sample()).unwrap();

        let at_8: Vec<String> = store
            .configs_for(512, 8)
            .into_iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(at_8, vec!["static_1", "static_16", "static_64"]);

        assert_eq!(store.configs_for(512, 4).len(), 1);
        assert!(store.configs_for(512, 2).is_empty());
        assert_eq!(store.configs_for_size(512).len(), 5);
        assert_eq!(store.policies_for(512).len(), 2);
    }

    #[test]
    fn test_missing_baseline_rejected() {
        let mut data = sample();
        data.push(Measurement::new(1024, 8, label("static_16"), 0.15));

        let err = ResultStore::load(data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(matches!(err, ScaleError::MissingBaseline { size: 1024 }));
    }

    #[test]
    fn test_non_positive_time_rejected() {
        for bad in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            let mut data = sample();
            data.push(Measurement::new(512, 2, label("static_16"), bad));
            let err = ResultStore::load(data).unwrap_err();
            assert!(matches!(err, ScaleError::InvalidTime { .. }), "time {}", bad);
        }
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut data = sample();
        data.push(Measurement::new(512, 8, label("static_16"), 0.021));
        let err = ResultStore::load(data).unwrap_err();
        assert!(matches!(err, ScaleError::DuplicateMeasurement { .. }));
    }

    #[test]
    fn test_baseline_off_one_thread_rejected() {
        let data = vec![
            Measurement::sequential(64, 0.01),
            Measurement::new(64, 4, ConfigLabel::Sequential, 0.01),
        ];
        let err = ResultStore::load(data).unwrap_err();
        assert!(matches!(
            err,
            ScaleError::MisplacedBaseline {
                size: 64,
                threads: 4
            }
        ));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let err = ResultStore::load(vec![Measurement::sequential(0, 0.1)]).unwrap_err();
        assert!(matches!(err, ScaleError::ZeroDimension { field: "size" }));

        let err = ResultStore::load(vec![
            Measurement::sequential(8, 0.1),
            Measurement::new(8, 0, label("static_1"), 0.1),
        ])
        .unwrap_err();
        assert!(matches!(err, ScaleError::ZeroDimension { field: "threads" }));
    }

    #[test]
    fn test_baseline_time_unknown_size() {
        let store = ResultStore::load(sample()).unwrap();
        let err = store.baseline_time(4096).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_load_records_schema_error() {
        let records = vec![
            MeasurementRecord {
                size: 512,
                threads: 1,
                schedule: "sequential".into(),
                chunk: None,
                time: 0.12,
            },
            MeasurementRecord {
                size: 512,
                threads: 8,
                schedule: "static_sixteen".into(),
                chunk: None,
                time: 0.022,
            },
        ];
        let err = ResultStore::load_records(records, "sequential").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_iter_in_key_order() {
        let store = ResultStore::load(sample()).unwrap();
        let keys: Vec<(u64, u32)> = store.iter().map(|m| (m.size, m.threads)).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(keys.len(), store.len());
    }

    #[test]
    fn test_empty_dataset() {
        let store = ResultStore::load(Vec::new()).unwrap();
        assert!(store.is_empty());
        assert!(store.sizes().is_empty());
    }
}
