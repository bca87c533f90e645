//! Markdown Output
//!
//! GitHub-flavoured summary suitable for `$GITHUB_STEP_SUMMARY` or a PR comment.

use crate::report::{Report, SizeReport};
use std::fmt::Write;

/// Generate a Markdown summary of the report
pub fn generate_markdown_summary(report: &Report) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Scaling Report\n");
    let _ = writeln!(
        out,
        "{} sizes, {} measurements, {} configurations\n",
        report.summary.sizes, report.summary.measurements, report.summary.configurations
    );

    if let (Some(size), Some(peak)) = (report.summary.peak_size, &report.summary.peak) {
        let _ = writeln!(
            out,
            "**Peak speedup:** {:.2}x at size {} with `{}` on {} threads ({:.1}% efficiency)\n",
            peak.speedup, size, peak.config, peak.threads, peak.efficiency
        );
    }

    for section in &report.sizes {
        write_size_section(&mut out, section);
    }

    if !report.warnings.is_empty() {
        let _ = writeln!(out, "## Warnings\n");
        for warning in &report.warnings {
            let _ = writeln!(
                out,
                "- size {} ({}): {}",
                warning.size, warning.section, warning.message
            );
        }
        out.push('\n');
    }

    out
}

fn write_size_section(out: &mut String, section: &SizeReport) {
    let _ = writeln!(out, "## Size {}\n", section.size);
    let _ = writeln!(out, "Baseline: {:.6} s\n", section.baseline_time);

    if let (Some(trend), Some(eff)) = (&section.trend, &section.efficiency) {
        let _ = writeln!(out, "### `{}` across threads\n", trend.label);
        let _ = writeln!(out, "| Threads | Speedup | Ideal | Efficiency |");
        let _ = writeln!(out, "|--------:|--------:|------:|-----------:|");
        for (s, e) in trend.points.iter().zip(&eff.points) {
            let _ = writeln!(
                out,
                "| {} | {:.2}x | {}x | {:.1}% |",
                s.threads, s.value, s.threads, e.value
            );
        }
        out.push('\n');
    }

    if !section.policy_comparison.is_empty() {
        let _ = writeln!(out, "### Policy comparison\n");
        let _ = writeln!(out, "| Config | Threads | Speedup |");
        let _ = writeln!(out, "|--------|--------:|--------:|");
        for series in &section.policy_comparison {
            for p in &series.points {
                let _ = writeln!(out, "| `{}` | {} | {:.2}x |", series.label, p.threads, p.value);
            }
        }
        out.push('\n');
    }

    if let Some(impact) = &section.chunk_impact {
        let _ = writeln!(
            out,
            "### Chunk size impact (`{}`, {} threads)\n",
            impact.policy, impact.threads
        );
        let _ = writeln!(out, "| Chunk | Speedup |");
        let _ = writeln!(out, "|------:|--------:|");
        for p in &impact.points {
            let _ = writeln!(out, "| {} | {:.2}x |", p.chunk, p.speedup);
        }
        out.push('\n');
    }

    if let Some(best) = &section.best_overall {
        let _ = writeln!(
            out,
            "**Best:** `{}` on {} threads, {:.2}x ({:.1}% efficiency)\n",
            best.config, best.threads, best.speedup, best.efficiency
        );
    }
}
