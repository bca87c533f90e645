//! Report Data Structures

use chrono::{DateTime, Utc};
use fluxscale_stats::{BestConfig, PolicySeries, ScalingPoint};
use serde::{Deserialize, Serialize};

/// Complete scaling report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub sizes: Vec<SizeReport>,
    pub warnings: Vec<ReportWarning>,
    pub summary: ReportSummary,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    pub schema_version: u32,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub source: Option<String>,
    pub git_commit: Option<String>,
    pub git_branch: Option<String>,
    pub system: SystemInfo,
    pub config: ReportConfig,
}

/// Host the report was generated on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os: String,
    pub arch: String,
    pub cpu: String,
    pub cpu_cores: u32,
}

/// Slice selection captured in report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub baseline_label: String,
    pub trend_config: String,
    pub chunk_policy: String,
    pub chunk_threads: u32,
    pub comparison_chunk: u32,
    pub sizes: Vec<u64>,
}

/// Everything derived for one problem size
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeReport {
    pub size: u64,
    pub baseline_time: f64,
    /// Speedup of the trend configuration across thread counts
    pub trend: Option<SeriesReport>,
    /// Efficiency of the trend configuration across thread counts
    pub efficiency: Option<SeriesReport>,
    /// One speedup series per policy at the comparison chunk
    pub policy_comparison: Vec<SeriesReport>,
    pub chunk_impact: Option<ChunkImpactReport>,
    pub best_at_threads: Option<BestConfigEntry>,
    pub best_overall: Option<BestConfigEntry>,
    pub rows: Vec<ScalingRow>,
}

/// Named series of `(threads, value)` points
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesReport {
    pub label: String,
    pub points: Vec<SeriesPoint>,
}

impl SeriesReport {
    /// Series from `(threads, value)` pairs
    pub fn from_pairs(label: impl Into<String>, pairs: &[(u32, f64)]) -> Self {
        Self {
            label: label.into(),
            points: pairs
                .iter()
                .map(|&(threads, value)| SeriesPoint { threads, value })
                .collect(),
        }
    }

    /// Largest value in the series
    pub fn peak(&self) -> Option<&SeriesPoint> {
        self.points
            .iter()
            .max_by(|a, b| a.value.total_cmp(&b.value))
    }
}

impl From<&PolicySeries> for SeriesReport {
    fn from(series: &PolicySeries) -> Self {
        Self::from_pairs(series.config.to_string(), &series.points)
    }
}

/// Single point on a thread-count axis
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub threads: u32,
    pub value: f64,
}

/// Speedup per chunk size for one policy at fixed threads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkImpactReport {
    pub policy: String,
    pub threads: u32,
    pub points: Vec<ChunkPoint>,
}

/// Single point on a chunk-size axis
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChunkPoint {
    pub chunk: u32,
    pub speedup: f64,
}

/// Winning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestConfigEntry {
    pub threads: u32,
    pub config: String,
    pub speedup: f64,
    pub efficiency: f64,
}

impl From<&BestConfig> for BestConfigEntry {
    fn from(best: &BestConfig) -> Self {
        Self {
            threads: best.threads,
            config: best.config.to_string(),
            speedup: best.speedup,
            efficiency: best.efficiency(),
        }
    }
}

/// One measurement with its derived metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalingRow {
    pub threads: u32,
    pub schedule: String,
    pub chunk: Option<u32>,
    pub time: f64,
    pub speedup: f64,
    pub efficiency: f64,
}

impl ScalingRow {
    /// Row for one point; the baseline is written with `baseline_label` so
    /// the CSV output reloads under the same setting
    pub fn new(point: &ScalingPoint, baseline_label: &str) -> Self {
        Self {
            threads: point.threads,
            schedule: point
                .config
                .policy()
                .map_or_else(|| baseline_label.to_string(), |p| p.to_string()),
            chunk: point.config.chunk(),
            time: point.time,
            speedup: point.speedup,
            efficiency: point.efficiency,
        }
    }
}

/// A slice that could not be derived for one size
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportWarning {
    pub size: u64,
    pub section: String,
    pub message: String,
}

/// Report summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    pub sizes: usize,
    pub measurements: usize,
    pub configurations: usize,
    pub warnings: usize,
    /// Highest speedup across all sizes
    pub peak_size: Option<u64>,
    pub peak: Option<BestConfigEntry>,
    pub total_duration_ms: f64,
}

impl Report {
    /// Section for `size`, if it was included
    pub fn size(&self, size: u64) -> Option<&SizeReport> {
        self.sizes.iter().find(|s| s.size == size)
    }
}
