#![warn(missing_docs)]
//! FluxScale Report - Output Formats
//!
//! The report is the hand-off point to whatever renders charts. It carries
//! derived metrics only; missing measurements are absent points, never zeros.
//!
//! Generates:
//! - JSON (machine-readable, round-trips)
//! - CSV (one row per measurement)
//! - Markdown (GitHub summary)

mod csv_report;
mod json;
mod markdown;
mod report;

pub use csv_report::{CSV_HEADER, generate_csv_report};
pub use json::{generate_json_report, parse_json_report};
pub use markdown::generate_markdown_summary;
pub use report::{
    BestConfigEntry, ChunkImpactReport, ChunkPoint, Report, ReportConfig, ReportMeta,
    ReportSummary, ReportWarning, ScalingRow, SeriesPoint, SeriesReport, SizeReport, SystemInfo,
};

/// Current report schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// CSV for spreadsheets
    Csv,
    /// Markdown for GitHub
    Markdown,
    /// Human-readable terminal output
    Human,
}

impl OutputFormat {
    /// Every format, in the order `--write-all` emits them
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Json,
        OutputFormat::Csv,
        OutputFormat::Markdown,
        OutputFormat::Human,
    ];

    /// File extension used when writing into the report directory
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Markdown => "md",
            OutputFormat::Human => "txt",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "markdown" | "md" | "github" => Ok(OutputFormat::Markdown),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}
