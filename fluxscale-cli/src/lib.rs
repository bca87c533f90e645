#![warn(missing_docs)]
//! FluxScale CLI Library
//!
//! Command-line front end over the result store and metrics engine: load a
//! measurement file, validate it, derive the scaling report and render it.
//! Use `fluxscale::run()` (or `fluxscale_cli::run()`) from a binary.
//!
//! # Example
//!
//! ```ignore
//! fn main() -> anyhow::Result<()> {
//!     fluxscale_cli::run()
//! }
//! ```

mod builder;
mod config;
mod formatting;
mod metadata;
mod planner;

pub use builder::{build_report, build_size_report};
pub use config::*;
pub use formatting::{format_human_output, format_rows};
pub use metadata::build_report_meta;
pub use planner::{ReportPlan, build_plan, filter_labels, filter_store};

use anyhow::Context;
use clap::{Parser, Subcommand};
use fluxscale_core::{ResultStore, read_path};
use fluxscale_report::{
    OutputFormat, Report, ReportWarning, generate_csv_report, generate_json_report,
    generate_markdown_summary,
};
use fluxscale_stats::{best_config_at, best_overall, speedup};
use rayon::ThreadPoolBuilder;
use regex::Regex;
use std::io::Write;
use std::path::{Path, PathBuf};

/// FluxScale CLI arguments
#[derive(Parser, Debug)]
#[command(name = "fluxscale")]
#[command(author, version, about = "FluxScale - parallel scaling analysis for benchmark results")]
pub struct Cli {
    /// Optional subcommand (Report, List, Best, Init); defaults to Report
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Measurement file (.csv or .json) when no subcommand is given
    pub input: Option<PathBuf>,

    /// Output format: human, json, csv, markdown
    #[arg(long, global = true)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Write every format into the report directory
    #[arg(long, global = true)]
    pub write_all: bool,

    /// Restrict the report to these sizes (comma-separated)
    #[arg(long, global = true, value_delimiter = ',')]
    pub sizes: Vec<u64>,

    /// Label marking the sequential baseline run
    #[arg(long, global = true)]
    pub baseline_label: Option<String>,

    /// Configuration plotted across thread counts (e.g. static_16)
    #[arg(long, global = true)]
    pub trend_config: Option<String>,

    /// Policy whose chunk sizes are compared
    #[arg(long, global = true)]
    pub chunk_policy: Option<String>,

    /// Thread count for the chunk-size comparison and best-config pick
    #[arg(long, global = true)]
    pub chunk_threads: Option<u32>,

    /// Chunk size for the cross-policy comparison
    #[arg(long, global = true)]
    pub comparison_chunk: Option<u32>,

    /// Keep only configurations whose label matches this regex
    #[arg(long, global = true)]
    pub filter: Option<String>,

    /// Configuration file (discovered from the working directory if omitted)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of threads for building per-size report sections
    /// 0 = use all available cores (default), 1 = single-threaded
    #[arg(long, short = 'j', global = true, default_value = "0")]
    pub threads: usize,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a scaling report (default)
    Report {
        /// Measurement file (.csv or .json)
        #[arg(name = "INPUT")]
        input: PathBuf,
    },
    /// List sizes, thread counts and configurations in a dataset
    List {
        /// Measurement file (.csv or .json)
        #[arg(name = "INPUT")]
        input: PathBuf,
    },
    /// Show the fastest configurations
    Best {
        /// Measurement file (.csv or .json)
        #[arg(name = "INPUT")]
        input: PathBuf,
        /// Only this size
        #[arg(long)]
        size: Option<u64>,
        /// Pick among configurations at this thread count instead of overall
        #[arg(long = "at-threads")]
        at_threads: Option<u32>,
    },
    /// Write a default fluxscale.toml
    Init {
        /// Directory to write into
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run the FluxScale CLI with the process arguments.
///
/// # Returns
/// Returns `Ok(())` on success. Validation and schema errors in the input
/// come back as errors so the binary exits non-zero.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the FluxScale CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    init_tracing(cli.verbose);

    // fluxscale.toml first, CLI flags override
    let mut config = match &cli.config {
        Some(path) => ScaleConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ScaleConfig::discover().unwrap_or_default(),
    };
    apply_overrides(&mut config, &cli);

    let threads = if cli.threads > 0 {
        cli.threads
    } else {
        config.runner.threads
    };
    if threads > 0 {
        ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .ok();
    }

    let filter = cli
        .filter
        .as_deref()
        .map(Regex::new)
        .transpose()
        .context("invalid --filter pattern")?;

    match &cli.command {
        Some(Commands::Report { input }) => run_report(&cli, &config, input, filter.as_ref()),
        Some(Commands::List { input }) => list_dataset(&config, input, filter.as_ref()),
        Some(Commands::Best {
            input,
            size,
            at_threads,
        }) => show_best(&config, input, *size, *at_threads),
        Some(Commands::Init { dir, force }) => init_config(dir, *force),
        None => {
            let input = cli
                .input
                .clone()
                .ok_or_else(|| anyhow::anyhow!("no input file given (see --help)"))?;
            run_report(&cli, &config, &input, filter.as_ref())
        }
    }
}

fn init_tracing(verbose: bool) {
    let directive = if verbose {
        "fluxscale=debug"
    } else {
        "fluxscale=info"
    };
    // A second init (e.g. repeated runs in one process) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(directive)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Layer CLI flags over file configuration
fn apply_overrides(config: &mut ScaleConfig, cli: &Cli) {
    if let Some(label) = &cli.baseline_label {
        config.input.baseline_label = label.clone();
    }
    if !cli.sizes.is_empty() {
        config.report.sizes = cli.sizes.clone();
    }
    if let Some(trend) = &cli.trend_config {
        config.report.trend_config = trend.clone();
    }
    if let Some(policy) = &cli.chunk_policy {
        config.report.chunk_policy = policy.clone();
    }
    if let Some(threads) = cli.chunk_threads {
        config.report.chunk_threads = threads;
    }
    if let Some(chunk) = cli.comparison_chunk {
        config.report.comparison_chunk = chunk;
    }
    if let Some(format) = &cli.format {
        config.report.format = format.clone();
    }
}

/// Read and validate a measurement file
pub fn load_store(input: &Path, baseline_label: &str) -> anyhow::Result<ResultStore> {
    let records =
        read_path(input).with_context(|| format!("failed to read {}", input.display()))?;
    let store = ResultStore::load_records(records, baseline_label)
        .with_context(|| format!("invalid dataset {}", input.display()))?;
    tracing::info!(
        path = %input.display(),
        sizes = store.sizes().len(),
        measurements = store.len(),
        "dataset loaded"
    );
    Ok(store)
}

/// Load `input` and build the report the configuration asks for
pub fn generate_report(
    config: &ScaleConfig,
    input: &Path,
    filter: Option<&Regex>,
) -> anyhow::Result<Report> {
    let slices = config.slices()?;
    let mut store = load_store(input, &slices.baseline_label)?;
    if let Some(re) = filter {
        store = filter_store(&store, re)?;
    }

    let plan = build_plan(&store, &slices.sizes);
    let meta = build_report_meta(Some(input), &slices);
    let mut report = build_report(&store, &plan.sizes, &slices, meta)?;

    for &size in &plan.missing {
        tracing::warn!(size, "requested size not in dataset");
        report.warnings.push(ReportWarning {
            size,
            section: "size".to_string(),
            message: format!("size {} not found", size),
        });
    }
    report.summary.warnings = report.warnings.len();

    Ok(report)
}

/// Render a report in one format
pub fn render(report: &Report, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => generate_json_report(report)?,
        OutputFormat::Csv => generate_csv_report(report)?,
        OutputFormat::Markdown => generate_markdown_summary(report),
        OutputFormat::Human => format_human_output(report),
    })
}

fn run_report(
    cli: &Cli,
    config: &ScaleConfig,
    input: &Path,
    filter: Option<&Regex>,
) -> anyhow::Result<()> {
    let report = generate_report(config, input, filter)?;

    if cli.write_all {
        let dir = PathBuf::from(&config.report.directory);
        write_all_formats(&report, &dir)?;
        println!("Reports written to: {}", dir.display());
        return Ok(());
    }

    let format: OutputFormat = config
        .report
        .format
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let mut output = render(&report, format)?;
    if cli.verbose && format == OutputFormat::Human {
        for section in &report.sizes {
            output.push_str(&format!("Measurements for size {}\n", section.size));
            output.push_str(&format_rows(section));
            output.push('\n');
        }
    }

    if let Some(ref path) = cli.output {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        file.write_all(output.as_bytes())?;
        println!("Report written to: {}", path.display());
    } else {
        print!("{}", output);
    }

    Ok(())
}

/// Write `report.<ext>` for every output format into `dir`
pub fn write_all_formats(report: &Report, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let mut written = Vec::with_capacity(OutputFormat::ALL.len());
    for format in OutputFormat::ALL {
        let path = dir.join(format!("report.{}", format.extension()));
        std::fs::write(&path, render(report, format)?)?;
        tracing::debug!(path = %path.display(), "report written");
        written.push(path);
    }
    Ok(written)
}

fn list_dataset(config: &ScaleConfig, input: &Path, filter: Option<&Regex>) -> anyhow::Result<()> {
    let store = load_store(input, &config.input.baseline_label)?;
    print!("{}", format_listing(&store, filter));
    Ok(())
}

/// Tree of sizes, thread counts and configuration labels
pub fn format_listing(store: &ResultStore, filter: Option<&Regex>) -> String {
    let mut output = String::from("FluxScale Dataset:\n");
    let mut shown = 0usize;

    for size in store.sizes() {
        output.push_str(&format!("├── size: {}\n", size));
        for threads in store.thread_counts(size) {
            let labels = filter_labels(store.configs_for(size, threads), filter);
            if labels.is_empty() {
                continue;
            }
            let names: Vec<String> = labels.iter().map(ToString::to_string).collect();
            output.push_str(&format!(
                "│   ├── {} threads: {}\n",
                threads,
                names.join(", ")
            ));
            shown += labels.len();
        }
    }

    output.push_str(&format!(
        "{} sizes, {} measurements ({} shown).\n",
        store.sizes().len(),
        store.len(),
        shown
    ));
    output
}

fn show_best(
    config: &ScaleConfig,
    input: &Path,
    size: Option<u64>,
    at_threads: Option<u32>,
) -> anyhow::Result<()> {
    let store = load_store(input, &config.input.baseline_label)?;
    print!("{}", format_best(&store, size, at_threads)?);
    Ok(())
}

/// Best configuration per size, overall or at a fixed thread count
///
/// An explicitly requested size that is missing is an error; sizes without
/// a parallel run are reported inline.
pub fn format_best(
    store: &ResultStore,
    size: Option<u64>,
    at_threads: Option<u32>,
) -> anyhow::Result<String> {
    let sizes = match size {
        Some(size) => {
            store.baseline_time(size)?;
            vec![size]
        }
        None => store.sizes(),
    };

    let mut output = String::new();
    for size in sizes {
        let best = match at_threads {
            Some(threads) => best_config_at(store, size, threads).and_then(|config| {
                let s = speedup(store, size, threads, &config)?;
                Ok(fluxscale_stats::BestConfig {
                    threads,
                    config,
                    speedup: s,
                })
            }),
            None => best_overall(store, size),
        };
        match best {
            Ok(best) => output.push_str(&format!(
                "size {:>6}: {} at {} threads ({:.2}x, {:.1}% efficiency)\n",
                size,
                best.config,
                best.threads,
                best.speedup,
                best.efficiency()
            )),
            Err(e) if e.is_recoverable() => {
                output.push_str(&format!("size {:>6}: {}\n", size, e));
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(output)
}

fn init_config(dir: &Path, force: bool) -> anyhow::Result<()> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    std::fs::write(&path, ScaleConfig::default_toml())
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluxscale_core::{ErrorKind, ScaleError};

    const DATASET: &str = "\
Size,Threads,Schedule,Chunk,Time
512,1,sequential,,0.120000
512,1,static,16,0.120000
512,8,static,1,0.028000
512,8,static,16,0.022000
512,8,static,64,0.026000
512,8,dynamic,16,0.023000
128,1,sequential,,0.000900
128,2,static,16,0.000400
";

    fn dataset(dir: &Path) -> PathBuf {
        let path = dir.join("results.csv");
        std::fs::write(&path, DATASET).unwrap();
        path
    }

    #[test]
    fn test_cli_parse_default_report() {
        let cli = Cli::parse_from(["fluxscale", "results.csv", "--format", "json"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.input, Some(PathBuf::from("results.csv")));
        assert_eq!(cli.format.as_deref(), Some("json"));
    }

    #[test]
    fn test_cli_parse_subcommands() {
        let cli = Cli::parse_from([
            "fluxscale",
            "best",
            "results.csv",
            "--size",
            "512",
            "--at-threads",
            "8",
        ]);
        match cli.command {
            Some(Commands::Best {
                size, at_threads, ..
            }) => {
                assert_eq!(size, Some(512));
                assert_eq!(at_threads, Some(8));
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::parse_from(["fluxscale", "report", "r.json", "--sizes", "128,512", "-j", "2"]);
        assert_eq!(cli.sizes, vec![128, 512]);
        assert_eq!(cli.threads, 2);

        // Global flags also work ahead of the subcommand
        let cli = Cli::parse_from(["fluxscale", "--format", "csv", "list", "r.csv"]);
        assert_eq!(cli.format.as_deref(), Some("csv"));
        assert!(matches!(cli.command, Some(Commands::List { .. })));
    }

    #[test]
    fn test_overrides_win_over_config() {
        let cli = Cli::parse_from([
            "fluxscale",
            "r.csv",
            "--baseline-label",
            "serial",
            "--trend-config",
            "dynamic_4",
            "--chunk-threads",
            "4",
        ]);
        let mut config = ScaleConfig::default();
        config.report.comparison_chunk = 32;
        apply_overrides(&mut config, &cli);

        assert_eq!(config.input.baseline_label, "serial");
        assert_eq!(config.report.trend_config, "dynamic_4");
        assert_eq!(config.report.chunk_threads, 4);
        assert_eq!(config.report.comparison_chunk, 32);
    }

    #[test]
    fn test_generate_report_with_missing_size() {
        let dir = tempfile::tempdir().unwrap();
        let input = dataset(dir.path());

        let mut config = ScaleConfig::default();
        config.report.sizes = vec![512, 4096];
        let report = generate_report(&config, &input, None).unwrap();

        assert_eq!(report.sizes.len(), 1);
        assert!(report.warnings.iter().any(|w| w.size == 4096 && w.section == "size"));
        assert_eq!(report.summary.warnings, report.warnings.len());
    }

    #[test]
    fn test_generate_report_filter() {
        let dir = tempfile::tempdir().unwrap();
        let input = dataset(dir.path());
        let re = Regex::new("^dynamic").unwrap();

        let report = generate_report(&ScaleConfig::default(), &input, Some(&re)).unwrap();
        let section = report.size(512).unwrap();

        // Baseline plus the one dynamic run
        let schedules: Vec<&str> = section.rows.iter().map(|r| r.schedule.as_str()).collect();
        assert_eq!(schedules, vec!["sequential", "dynamic"]);
        assert_eq!(section.policy_comparison.len(), 1);
        assert_eq!(section.policy_comparison[0].label, "dynamic_16");

        // Nothing derived from excluded configurations
        assert!(section.trend.is_none());
        assert!(section.chunk_impact.is_none());
        assert_eq!(section.best_at_threads.as_ref().unwrap().config, "dynamic_16");
        assert_eq!(section.best_overall.as_ref().unwrap().config, "dynamic_16");

        let rows: usize = report.sizes.iter().map(|s| s.rows.len()).sum();
        assert_eq!(report.summary.measurements, rows);
        assert_eq!(report.summary.configurations, 2);
        assert_eq!(report.summary.peak.as_ref().unwrap().config, "dynamic_16");
        assert!(report.warnings.iter().any(|w| w.size == 512 && w.section == "trend"));
    }

    #[test]
    fn test_csv_report_reloads_with_custom_baseline() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("serial.csv");
        std::fs::write(
            &input,
            "Size,Threads,Schedule,Chunk,Time\n512,1,serial,,0.12\n512,8,static,16,0.022\n",
        )
        .unwrap();

        let mut config = ScaleConfig::default();
        config.input.baseline_label = "serial".into();
        let report = generate_report(&config, &input, None).unwrap();

        let csv = render(&report, OutputFormat::Csv).unwrap();
        assert!(csv.contains("512,1,serial,,"));

        let output = dir.path().join("report.csv");
        std::fs::write(&output, csv).unwrap();
        let reloaded = load_store(&output, "serial").unwrap();
        assert_eq!(reloaded.len(), 2);
        assert!((reloaded.baseline_time(512).unwrap() - 0.12).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_dataset_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.csv");
        std::fs::write(&input, "size,threads,schedule,chunk,time\n512,8,static,16,0.022\n").unwrap();

        let err = generate_report(&ScaleConfig::default(), &input, None).unwrap_err();
        let scale = err.downcast_ref::<ScaleError>().unwrap();
        assert_eq!(scale.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_write_all_formats() {
        let dir = tempfile::tempdir().unwrap();
        let input = dataset(dir.path());
        let report = generate_report(&ScaleConfig::default(), &input, None).unwrap();

        let out = dir.path().join("out");
        let written = write_all_formats(&report, &out).unwrap();
        assert_eq!(written.len(), 4);
        assert!(out.join("report.json").exists());
        assert!(out.join("report.md").exists());

        let csv = std::fs::read_to_string(out.join("report.csv")).unwrap();
        assert!(csv.starts_with("Size,Threads,Schedule,Chunk,Time,Speedup,Efficiency"));
    }

    #[test]
    fn test_listing_and_best() {
        let dir = tempfile::tempdir().unwrap();
        let store = load_store(&dataset(dir.path()), "sequential").unwrap();

        let listing = format_listing(&store, None);
        assert!(listing.contains("├── size: 512"));
        assert!(listing.contains("8 threads: dynamic_16, static_1, static_16, static_64"));

        let best = format_best(&store, Some(512), Some(8)).unwrap();
        assert!(best.contains("static_16 at 8 threads (5.45x"));

        // 128 has no run at 8 threads, reported inline
        let best = format_best(&store, None, Some(8)).unwrap();
        assert!(best.contains("no parallel configuration recorded for size 128"));

        assert!(format_best(&store, Some(4096), None).is_err());
    }

    #[test]
    fn test_run_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dataset(dir.path());
        let output = dir.path().join("report.json");

        let args: Vec<std::ffi::OsString> = vec![
            "fluxscale".into(),
            input.into_os_string(),
            "--format".into(),
            "json".into(),
            "--output".into(),
            output.clone().into_os_string(),
        ];
        let cli = Cli::parse_from(args);
        run_with_cli(cli).unwrap();

        let json = std::fs::read_to_string(&output).unwrap();
        let report = fluxscale_report::parse_json_report(&json).unwrap();
        assert_eq!(report.summary.sizes, 2);
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        init_config(dir.path(), false).unwrap();
        assert!(dir.path().join(CONFIG_FILE_NAME).exists());
        assert!(init_config(dir.path(), false).is_err());
        assert!(init_config(dir.path(), true).is_ok());
    }
}
