//! Configuration loading from fluxscale.toml
//!
//! FluxScale configuration can be specified in a `fluxscale.toml` file in the project root.
//! The configuration is automatically discovered by walking up from the current directory.

use fluxscale_core::{ConfigLabel, DEFAULT_BASELINE_LABEL, SchedulePolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up by [`ScaleConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "fluxscale.toml";

/// FluxScale configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScaleConfig {
    /// Input interpretation
    #[serde(default)]
    pub input: InputConfig,
    /// Report slices and output
    #[serde(default)]
    pub report: ReportSettings,
    /// Report-building thread pool
    #[serde(default)]
    pub runner: RunnerConfig,
}

/// How raw measurements are interpreted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Label that marks the unparallelized baseline run
    #[serde(default = "default_baseline_label")]
    pub baseline_label: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            baseline_label: default_baseline_label(),
        }
    }
}

fn default_baseline_label() -> String {
    DEFAULT_BASELINE_LABEL.to_string()
}

/// Which slices the report contains and where it goes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Output directory for `--write-all`
    #[serde(default = "default_directory")]
    pub directory: String,
    /// Sizes to include (empty = every size in the dataset)
    #[serde(default)]
    pub sizes: Vec<u64>,
    /// Configuration plotted across thread counts
    #[serde(default = "default_trend_config")]
    pub trend_config: String,
    /// Policy whose chunk sizes are compared
    #[serde(default = "default_chunk_policy")]
    pub chunk_policy: String,
    /// Thread count for the chunk-size comparison and best-config pick
    #[serde(default = "default_chunk_threads")]
    pub chunk_threads: u32,
    /// Chunk size for the cross-policy comparison
    #[serde(default = "default_comparison_chunk")]
    pub comparison_chunk: u32,
    /// Default output format: "human", "json", "csv", "markdown"
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            sizes: Vec::new(),
            trend_config: default_trend_config(),
            chunk_policy: default_chunk_policy(),
            chunk_threads: default_chunk_threads(),
            comparison_chunk: default_comparison_chunk(),
            format: default_format(),
        }
    }
}

fn default_directory() -> String {
    "target/fluxscale".to_string()
}
fn default_trend_config() -> String {
    "static_16".to_string()
}
fn default_chunk_policy() -> String {
    "static".to_string()
}
fn default_chunk_threads() -> u32 {
    8
}
fn default_comparison_chunk() -> u32 {
    16
}
fn default_format() -> String {
    "human".to_string()
}

/// Thread pool configuration for report building
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Worker threads (0 = all available cores)
    #[serde(default)]
    pub threads: usize,
}

/// Report slice selection with labels already resolved
#[derive(Debug, Clone)]
pub struct SliceConfig {
    /// Baseline marker
    pub baseline_label: String,
    /// Sizes to include (empty = all)
    pub sizes: Vec<u64>,
    /// Trend configuration
    pub trend_config: ConfigLabel,
    /// Chunk-impact policy
    pub chunk_policy: SchedulePolicy,
    /// Chunk-impact and best-config thread count
    pub chunk_threads: u32,
    /// Cross-policy comparison chunk
    pub comparison_chunk: u32,
}

impl ScaleConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => {
                        tracing::debug!(path = %config_path.display(), "loaded configuration");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(path = %config_path.display(), error = %e, "ignoring unreadable configuration");
                        None
                    }
                };
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Resolve label strings into typed slice selection
    pub fn slices(&self) -> anyhow::Result<SliceConfig> {
        let baseline_label = self.input.baseline_label.clone();
        let trend_config = ConfigLabel::parse(&self.report.trend_config, &baseline_label)
            .map_err(|e| anyhow::anyhow!("report.trend_config: {}", e))?;
        let chunk_policy: SchedulePolicy = self
            .report
            .chunk_policy
            .parse()
            .map_err(|e| anyhow::anyhow!("report.chunk_policy: {}", e))?;
        if self.report.chunk_threads == 0 {
            anyhow::bail!("report.chunk_threads must be at least 1");
        }
        if self.report.comparison_chunk == 0 {
            anyhow::bail!("report.comparison_chunk must be at least 1");
        }

        Ok(SliceConfig {
            baseline_label,
            sizes: self.report.sizes.clone(),
            trend_config,
            chunk_policy,
            chunk_threads: self.report.chunk_threads,
            comparison_chunk: self.report.comparison_chunk,
        })
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# FluxScale Configuration

[input]
# Label that marks the unparallelized baseline run
baseline_label = "sequential"

[report]
# Output directory for --write-all
directory = "target/fluxscale"
# Problem sizes to include (empty = every size in the dataset)
sizes = []
# Configuration plotted across thread counts
trend_config = "static_16"
# Policy whose chunk sizes are compared
chunk_policy = "static"
# Thread count for the chunk-size comparison and best-config pick
chunk_threads = 8
# Chunk size for the cross-policy comparison
comparison_chunk = 16
# Default output format: human, json, csv, markdown
format = "human"

[runner]
# Threads used to build per-size report sections (0 = all cores)
threads = 0
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScaleConfig::default();
        assert_eq!(config.input.baseline_label, "sequential");
        assert_eq!(config.report.trend_config, "static_16");
        assert_eq!(config.report.chunk_threads, 8);
        assert!(config.report.sizes.is_empty());
        assert_eq!(config.runner.threads, 0);
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [input]
            baseline_label = "serial"

            [report]
            sizes = [512, 1024]
            trend_config = "dynamic_4"
        "#;

        let config: ScaleConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.input.baseline_label, "serial");
        assert_eq!(config.report.sizes, vec![512, 1024]);
        // Defaults should still apply
        assert_eq!(config.report.chunk_policy, "static");
        assert_eq!(config.report.format, "human");
    }

    #[test]
    fn test_default_toml_parses() {
        let config: ScaleConfig = toml::from_str(&ScaleConfig::default_toml()).unwrap();
        assert_eq!(config.report.trend_config, "static_16");
        assert_eq!(config.report.comparison_chunk, 16);
    }

    #[test]
    fn test_slices_resolve() {
        let slices = ScaleConfig::default().slices().unwrap();
        assert_eq!(slices.trend_config.to_string(), "static_16");
        assert_eq!(slices.chunk_policy, SchedulePolicy::Static);
    }

    #[test]
    fn test_slices_reject_bad_labels() {
        let mut config = ScaleConfig::default();
        config.report.trend_config = "static".into();
        assert!(config.slices().is_err());

        let mut config = ScaleConfig::default();
        config.report.chunk_threads = 0;
        assert!(config.slices().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[runner]\nthreads = 2\n").unwrap();
        let config = ScaleConfig::load(&path).unwrap();
        assert_eq!(config.runner.threads, 2);
        assert_eq!(config.report.directory, "target/fluxscale");
    }
}
