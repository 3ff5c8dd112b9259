//! GAUnit CLI Application
//!
//! Command-line front end for the gaunit-core library. It:
//! - Loads a tracking plan and an optional TOML configuration
//! - Checks one test case against a capture file (HAR, performance log, URL log)
//! - Prints the report and exits non-zero when expected events are missing

use anyhow::{bail, Context, Result};
use clap::Parser;
use gaunit_core::{Checker, TrackingPlan};
use std::path::PathBuf;
use std::process::ExitCode;

mod config;
mod report;

use config::AppConfig;
use report::ReportOptions;

/// GAUnit - Check captured analytics hits against a tracking plan
#[derive(Parser, Debug)]
#[command(name = "gaunit")]
#[command(
    about = "Check Google Analytics hits in a capture against a tracking plan",
    long_about = None
)]
#[command(version)]
struct Args {
    /// Test case id in the tracking plan
    test_case: String,

    /// Capture file: HAR (.har/.json), performance log (.json) or URL log (.log/.txt)
    capture_file: PathBuf,

    /// Path to the tracking plan
    #[arg(short, long, value_name = "FILE", default_value = "./tracking_plan.json")]
    tracking_plan: PathBuf,

    /// Display all expected and captured events, not only missing ones
    #[arg(short, long)]
    all: bool,

    /// Match expected events in any order
    #[arg(long)]
    unordered: bool,

    /// Show captured events as request URLs (with --all)
    #[arg(long)]
    urls: bool,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("GAUnit CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using gaunit-core v{}", gaunit_core::VERSION);

    let passed = run(&args)?;
    Ok(if passed { ExitCode::SUCCESS } else { ExitCode::from(1) })
}

/// Run one check; returns whether the test case passed
fn run(args: &Args) -> Result<bool> {
    let config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    let plan = TrackingPlan::load(&args.tracking_plan)
        .with_context(|| format!("Failed to load tracking plan: {:?}", args.tracking_plan))?;
    log::info!("Loaded {} test cases from {:?}", plan.len(), args.tracking_plan);

    if !plan.contains_test_case(&args.test_case) {
        let known: Vec<&str> = plan.test_case_ids().collect();
        bail!(
            "Test case '{}' not found in {:?} (known test cases: {})",
            args.test_case,
            args.tracking_plan,
            known.join(", ")
        );
    }

    let checker = Checker::new()
        .with_endpoint(config.endpoint.clone())
        .with_mode(config.match_mode(args.unordered));

    let result = checker
        .check_capture_file(&args.test_case, &plan, &args.capture_file)
        .with_context(|| {
            format!(
                "Failed to check test case '{}' against {:?}",
                args.test_case, args.capture_file
            )
        })?;

    if !args.quiet {
        let options = ReportOptions {
            display_all: args.all,
            show_urls: args.urls,
        };
        report::print_report(&result, options)?;
    }

    Ok(result.was_successful())
}

fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
