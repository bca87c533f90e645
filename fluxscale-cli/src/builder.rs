//! Report Building
//!
//! Turns a validated store into a [`Report`] for the selected sizes.
//!
//! ## Pipeline
//!
//! ```text
//! ResultStore + ReportPlan
//!              │
//!              ▼
//!   ┌─────────────────────┐
//!   │  Per-size sections  │  Rayon-parallel, store shared read-only
//!   └──────────┬──────────┘
//!              │
//!              ▼
//!   ┌─────────────────────┐
//!   │ Warnings + summary  │  Missing slices become warnings, not zeros
//!   └──────────┬──────────┘
//!              │
//!              ▼
//!   ┌─────────────────────┐
//!   │       Report        │  Ready for JSON/CSV/Markdown/human output
//!   └─────────────────────┘
//! ```

use crate::config::SliceConfig;
use fluxscale_core::{ResultStore, ScaleError};
use fluxscale_report::{
    BestConfigEntry, ChunkImpactReport, ChunkPoint, Report, ReportMeta, ReportSummary,
    ReportWarning, ScalingRow, SeriesReport, SizeReport,
};
use fluxscale_stats::{
    BestConfig, best_config_at, best_overall, chunk_impact, efficiency_series, policy_comparison,
    scaling_table, speedup, speedup_series,
};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::time::Instant;

/// Build a complete Report for `sizes`
///
/// Slices that cannot be derived for a size (a configuration that was never
/// measured, no parallel run at the chosen thread count) are left out of
/// that size's section and recorded as warnings. Any other error aborts.
pub fn build_report(
    store: &ResultStore,
    sizes: &[u64],
    slices: &SliceConfig,
    meta: ReportMeta,
) -> Result<Report, ScaleError> {
    let start = Instant::now();

    let built: Vec<(SizeReport, Vec<ReportWarning>)> = sizes
        .par_iter()
        .map(|&size| build_size_report(store, size, slices))
        .collect::<Result<_, _>>()?;

    let mut sections = Vec::with_capacity(built.len());
    let mut warnings = Vec::new();
    for (section, section_warnings) in built {
        sections.push(section);
        warnings.extend(section_warnings);
    }

    let mut summary = summarize(&sections, warnings.len());
    summary.total_duration_ms = start.elapsed().as_secs_f64() * 1000.0;

    Ok(Report {
        meta,
        sizes: sections,
        warnings,
        summary,
    })
}

/// Build the section for one size
pub fn build_size_report(
    store: &ResultStore,
    size: u64,
    slices: &SliceConfig,
) -> Result<(SizeReport, Vec<ReportWarning>), ScaleError> {
    let baseline_time = store.baseline_time(size)?;
    let mut warnings = Vec::new();
    let trend_label = slices.trend_config.to_string();

    let trend = recover(size, "trend", speedup_series(store, size, &slices.trend_config), &mut warnings)?
        .and_then(|points| non_empty(size, "trend", &trend_label, points, &mut warnings))
        .map(|points| SeriesReport::from_pairs(&trend_label, &points));

    let efficiency = recover(size, "efficiency", efficiency_series(store, size, &slices.trend_config), &mut warnings)?
        .filter(|points| !points.is_empty())
        .map(|points| SeriesReport::from_pairs(&trend_label, &points));

    let policy_comparison = recover(
        size,
        "policy_comparison",
        policy_comparison(store, size, slices.comparison_chunk),
        &mut warnings,
    )?
    .map(|series| series.iter().map(SeriesReport::from).collect())
    .unwrap_or_default();

    let chunk_label = format!("{} at {} threads", slices.chunk_policy, slices.chunk_threads);
    let chunk_impact = recover(
        size,
        "chunk_impact",
        chunk_impact(store, size, slices.chunk_threads, &slices.chunk_policy),
        &mut warnings,
    )?
    .and_then(|points| non_empty(size, "chunk_impact", &chunk_label, points, &mut warnings))
    .map(|points| ChunkImpactReport {
        policy: slices.chunk_policy.to_string(),
        threads: slices.chunk_threads,
        points: points
            .into_iter()
            .map(|(chunk, speedup)| ChunkPoint { chunk, speedup })
            .collect(),
    });

    let best_at_threads = recover(
        size,
        "best_at_threads",
        best_config_at(store, size, slices.chunk_threads).and_then(|config| {
            let s = speedup(store, size, slices.chunk_threads, &config)?;
            Ok(BestConfig {
                threads: slices.chunk_threads,
                config,
                speedup: s,
            })
        }),
        &mut warnings,
    )?
    .map(|best| BestConfigEntry::from(&best));

    let best_overall = recover(size, "best_overall", best_overall(store, size), &mut warnings)?
        .map(|best| BestConfigEntry::from(&best));

    let rows = scaling_table(store, size)?
        .iter()
        .map(|point| ScalingRow::new(point, &slices.baseline_label))
        .collect();

    Ok((
        SizeReport {
            size,
            baseline_time,
            trend,
            efficiency,
            policy_comparison,
            chunk_impact,
            best_at_threads,
            best_overall,
            rows,
        },
        warnings,
    ))
}

/// Turn a recoverable error into a warning and an absent section
fn recover<T>(
    size: u64,
    section: &str,
    result: Result<T, ScaleError>,
    warnings: &mut Vec<ReportWarning>,
) -> Result<Option<T>, ScaleError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_recoverable() => {
            tracing::warn!(size, section, error = %e, "omitting report section");
            warnings.push(ReportWarning {
                size,
                section: section.to_string(),
                message: e.to_string(),
            });
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn non_empty(
    size: u64,
    section: &str,
    what: &str,
    points: Vec<(u32, f64)>,
    warnings: &mut Vec<ReportWarning>,
) -> Option<Vec<(u32, f64)>> {
    if points.is_empty() {
        tracing::warn!(size, section, "{} was never measured", what);
        warnings.push(ReportWarning {
            size,
            section: section.to_string(),
            message: format!("{} was never measured for size {}", what, size),
        });
        None
    } else {
        Some(points)
    }
}

fn summarize(sections: &[SizeReport], warnings: usize) -> ReportSummary {
    let configurations: BTreeSet<(&str, Option<u32>)> = sections
        .iter()
        .flat_map(|s| s.rows.iter())
        .map(|r| (r.schedule.as_str(), r.chunk))
        .collect();

    let peak = sections
        .iter()
        .filter_map(|s| s.best_overall.as_ref().map(|b| (s.size, b)))
        .max_by(|a, b| a.1.speedup.total_cmp(&b.1.speedup));

    ReportSummary {
        sizes: sections.len(),
        measurements: sections.iter().map(|s| s.rows.len()).sum(),
        configurations: configurations.len(),
        warnings,
        peak_size: peak.map(|(size, _)| size),
        peak: peak.map(|(_, best)| best.clone()),
        total_duration_ms: 0.0,
    }
}
