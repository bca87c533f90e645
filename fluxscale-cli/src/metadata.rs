//! System Metadata Collection
//!
//! Collects the context a report was produced in: tool version, git commit
//! and branch of the working directory, host OS, architecture and CPU.
//!
//! Linux-specific data (CPU model) gracefully degrades on other platforms,
//! returning "Unknown".

use crate::config::SliceConfig;
use chrono::Utc;
use fluxscale_report::{ReportConfig, ReportMeta, SCHEMA_VERSION, SystemInfo};
use std::path::Path;

/// Build report metadata including system info and git details
pub fn build_report_meta(source: Option<&Path>, slices: &SliceConfig) -> ReportMeta {
    ReportMeta {
        schema_version: SCHEMA_VERSION,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        source: source.map(|p| p.display().to_string()),
        git_commit: git(&["rev-parse", "HEAD"]),
        git_branch: git(&["rev-parse", "--abbrev-ref", "HEAD"]),
        system: SystemInfo {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            cpu: get_cpu_model().unwrap_or_else(|| "Unknown".to_string()),
            cpu_cores: num_cpus(),
        },
        config: ReportConfig {
            baseline_label: slices.baseline_label.clone(),
            trend_config: slices.trend_config.to_string(),
            chunk_policy: slices.chunk_policy.to_string(),
            chunk_threads: slices.chunk_threads,
            comparison_chunk: slices.comparison_chunk,
            sizes: slices.sizes.clone(),
        },
    }
}

fn git(args: &[&str]) -> Option<String> {
    std::process::Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Get CPU model name from /proc/cpuinfo (Linux only)
fn get_cpu_model() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/proc/cpuinfo")
            .ok()
            .and_then(|content| {
                content
                    .lines()
                    .find(|l| l.starts_with("model name"))
                    .and_then(|l| l.split(':').nth(1))
                    .map(|s| s.trim().to_string())
            })
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

/// Get number of available CPU cores
fn num_cpus() -> u32 {
    std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(1)
}
