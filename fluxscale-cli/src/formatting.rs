//! Output Formatting
//!
//! Human-readable output formatting for scaling reports.
//!
//! Generates terminal-friendly output with:
//! - One block per problem size with its sequential baseline
//! - The trend configuration's speedup and efficiency per thread count
//! - A policy-by-threads speedup grid (`-` where a point was never measured)
//! - Chunk-size impact and the best configurations
//! - Warnings for slices that could not be derived

use fluxscale_report::{Report, SeriesReport, SizeReport};
use std::collections::BTreeSet;

/// Format a report for human-readable terminal display
pub fn format_human_output(report: &Report) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("FluxScale Results\n");
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    if report.sizes.is_empty() {
        output.push_str("No sizes to report.\n");
    }

    for section in &report.sizes {
        format_size(&mut output, section);
    }

    if !report.warnings.is_empty() {
        output.push_str("Warnings\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for warning in &report.warnings {
            output.push_str(&format!(
                "  ⚠ size {} [{}]: {}\n",
                warning.size, warning.section, warning.message
            ));
        }
        output.push('\n');
    }

    output.push_str(&"=".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "Summary: {} sizes, {} measurements, {} configurations, {} warnings\n",
        report.summary.sizes,
        report.summary.measurements,
        report.summary.configurations,
        report.summary.warnings
    ));
    if let (Some(size), Some(peak)) = (report.summary.peak_size, &report.summary.peak) {
        output.push_str(&format!(
            "Peak: {:.2}x with {} at {} threads (size {})\n",
            peak.speedup, peak.config, peak.threads, size
        ));
    }

    output
}

fn format_size(output: &mut String, section: &SizeReport) {
    output.push_str(&format!(
        "Size: {}  (sequential {:.6} s)\n",
        section.size, section.baseline_time
    ));
    output.push_str(&"-".repeat(60));
    output.push('\n');

    if let Some(trend) = &section.trend {
        output.push_str(&format!("  Trend: {}\n", trend.label));
        output.push_str(&format!(
            "    {:>8}  {:>10}  {:>11}\n",
            "threads", "speedup", "efficiency"
        ));
        for point in &trend.points {
            let efficiency = section
                .efficiency
                .as_ref()
                .and_then(|e| e.points.iter().find(|p| p.threads == point.threads))
                .map(|p| format!("{:.2}%", p.value))
                .unwrap_or_else(|| "-".to_string());
            output.push_str(&format!(
                "    {:>8}  {:>9.2}x  {:>11}\n",
                point.threads, point.value, efficiency
            ));
        }
        output.push('\n');
    }

    if !section.policy_comparison.is_empty() {
        output.push_str("  Policy comparison (speedup)\n");
        format_series_grid(output, &section.policy_comparison);
        output.push('\n');
    }

    if let Some(impact) = &section.chunk_impact {
        output.push_str(&format!(
            "  Chunk impact: {} at {} threads\n",
            impact.policy, impact.threads
        ));
        for point in &impact.points {
            output.push_str(&format!(
                "    chunk {:>6}  {:>9.2}x\n",
                point.chunk, point.speedup
            ));
        }
        output.push('\n');
    }

    if let Some(best) = &section.best_at_threads {
        output.push_str(&format!(
            "  Best at {} threads: {} ({:.2}x, {:.1}% efficiency)\n",
            best.threads, best.config, best.speedup, best.efficiency
        ));
    }
    if let Some(best) = &section.best_overall {
        output.push_str(&format!(
            "  Best overall: {} at {} threads ({:.2}x, {:.1}% efficiency)\n",
            best.config, best.threads, best.speedup, best.efficiency
        ));
    }
    output.push('\n');
}

/// Policies as rows, thread counts as columns
fn format_series_grid(output: &mut String, series: &[SeriesReport]) {
    let threads: BTreeSet<u32> = series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.threads))
        .collect();

    let name_width = series
        .iter()
        .map(|s| s.label.len())
        .max()
        .unwrap_or(12)
        .max(8);
    let col_width = 8;

    output.push_str(&format!("    {:<width$}", "threads", width = name_width));
    for t in &threads {
        output.push_str(&format!(" | {:>w$}", t, w = col_width));
    }
    output.push('\n');

    output.push_str(&format!("    {}", "-".repeat(name_width)));
    for _ in &threads {
        output.push_str(&format!("-+-{}", "-".repeat(col_width)));
    }
    output.push('\n');

    for s in series {
        output.push_str(&format!("    {:<width$}", s.label, width = name_width));
        for t in &threads {
            let cell = s
                .points
                .iter()
                .find(|p| p.threads == *t)
                .map(|p| format!("{:.2}x", p.value))
                .unwrap_or_else(|| "-".to_string());
            output.push_str(&format!(" | {:>w$}", cell, w = col_width));
        }
        output.push('\n');
    }
}

/// One line per measurement, for `--verbose` listings
pub fn format_rows(section: &SizeReport) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "  {:>8}  {:<16}  {:>12}  {:>9}  {:>10}\n",
        "threads", "config", "time (s)", "speedup", "efficiency"
    ));
    for row in &section.rows {
        let config = match row.chunk {
            Some(chunk) => format!("{}_{}", row.schedule, chunk),
            None => row.schedule.clone(),
        };
        output.push_str(&format!(
            "  {:>8}  {:<16}  {:>12.6}  {:>8.2}x  {:>9.2}%\n",
            row.threads, config, row.time, row.speedup, row.efficiency
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluxscale_report::{
        BestConfigEntry, ChunkImpactReport, ChunkPoint, ReportConfig, ReportMeta, ReportSummary,
        ReportWarning, ScalingRow, SystemInfo,
    };

    fn report() -> Report {
        let section = SizeReport {
            size: 512,
            baseline_time: 0.12,
            trend: Some(SeriesReport::from_pairs("static_16", &[(1, 1.0), (8, 5.4545)])),
            efficiency: Some(SeriesReport::from_pairs("static_16", &[(1, 100.0), (8, 68.18)])),
            policy_comparison: vec![
                SeriesReport::from_pairs("dynamic_16", &[(8, 5.2174)]),
                SeriesReport::from_pairs("static_16", &[(1, 1.0), (8, 5.4545)]),
            ],
            chunk_impact: Some(ChunkImpactReport {
                policy: "static".into(),
                threads: 8,
                points: vec![
                    ChunkPoint { chunk: 1, speedup: 4.2857 },
                    ChunkPoint { chunk: 16, speedup: 5.4545 },
                ],
            }),
            best_at_threads: Some(BestConfigEntry {
                threads: 8,
                config: "static_16".into(),
                speedup: 5.4545,
                efficiency: 68.18,
            }),
            best_overall: None,
            rows: vec![ScalingRow {
                threads: 1,
                schedule: "sequential".into(),
                chunk: None,
                time: 0.12,
                speedup: 1.0,
                efficiency: 100.0,
            }],
        };
        Report {
            meta: ReportMeta {
                schema_version: 1,
                version: "0.1.0".into(),
                timestamp: chrono::Utc::now(),
                source: None,
                git_commit: None,
                git_branch: None,
                system: SystemInfo {
                    os: "linux".into(),
                    arch: "x86_64".into(),
                    cpu: "Test".into(),
                    cpu_cores: 8,
                },
                config: ReportConfig {
                    baseline_label: "sequential".into(),
                    trend_config: "static_16".into(),
                    chunk_policy: "static".into(),
                    chunk_threads: 8,
                    comparison_chunk: 16,
                    sizes: vec![],
                },
            },
            sizes: vec![section],
            warnings: vec![ReportWarning {
                size: 512,
                section: "best_overall".into(),
                message: "no parallel configuration".into(),
            }],
            summary: ReportSummary {
                sizes: 1,
                measurements: 1,
                configurations: 1,
                warnings: 1,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_human_output_sections() {
        let output = format_human_output(&report());
        assert!(output.contains("FluxScale Results"));
        assert!(output.contains("Size: 512"));
        assert!(output.contains("Trend: static_16"));
        assert!(output.contains("68.18%"));
        assert!(output.contains("Chunk impact: static at 8 threads"));
        assert!(output.contains("Best at 8 threads: static_16"));
        assert!(output.contains("size 512 [best_overall]"));
    }

    #[test]
    fn test_grid_marks_missing_points() {
        let output = format_human_output(&report());
        let dynamic_row = output
            .lines()
            .find(|l| l.trim_start().starts_with("dynamic_16"))
            .unwrap();
        // dynamic_16 was never measured at 1 thread
        assert!(dynamic_row.contains(" - "));
        assert!(dynamic_row.contains("5.22x"));
    }

    #[test]
    fn test_format_rows() {
        let report = report();
        let rows = format_rows(&report.sizes[0]);
        assert!(rows.contains("sequential"));
        assert!(rows.contains("0.120000"));
    }
}
