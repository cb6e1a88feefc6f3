//! Command-line interface components.

use crate::config::CompilerConfig;
use crate::console::{ConsoleLog, ProcessLog};
use crate::constants::{DEFAULT_CONVERTER_TIMEOUT_SECS, DEFAULT_OUTPUT_BASE_NAME};
use crate::models::ProcessingStats;
use crate::processor::BatchProcessor;
use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "sdd-compiler")]
#[command(
    about = "Compile SDD defect CSV exports into one Excel workbook and convert it to XLSB"
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Folder containing the SDD CSV exports; the workbook is written here
    #[arg(long, value_name = "DIR")]
    pub path: PathBuf,

    /// Start of the modification-time window (YYYY-MM-DD[ HH:MM[:SS]])
    #[arg(long, visible_alias = "startDate", value_name = "DATE")]
    pub start_date: String,

    /// End of the window; a date-only value covers the whole day
    #[arg(long, visible_alias = "endDate", value_name = "DATE")]
    pub end_date: String,

    /// Output file base name, without extension
    #[arg(long, visible_alias = "outputFileName", value_name = "NAME", default_value = DEFAULT_OUTPUT_BASE_NAME)]
    pub output_file_name: String,

    /// Keep the XLSX and skip conversion to XLSB
    #[arg(long)]
    pub no_convert: bool,

    /// Keep the intermediate XLSX after converting
    #[arg(long)]
    pub keep_intermediate: bool,

    /// Custom converter command line, with {input} and {output} placeholders
    #[arg(long, value_name = "COMMAND")]
    pub converter_cmd: Option<String>,

    /// Seconds to wait for the converter
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_CONVERTER_TIMEOUT_SECS)]
    pub converter_timeout: u64,

    /// Show a per-file progress bar
    #[arg(long)]
    pub progress: bool,

    /// Only print warnings, errors and results
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Build the run configuration from the arguments
    pub fn to_config(&self) -> CompilerConfig {
        let mut config = CompilerConfig::new(&self.path, &self.start_date, &self.end_date)
            .with_output_base_name(&self.output_file_name)
            .with_converter_timeout(self.converter_timeout);

        if self.no_convert {
            config = config.without_conversion();
        }
        if self.keep_intermediate {
            config = config.with_keep_intermediate();
        }
        if let Some(command) = &self.converter_cmd {
            config =
                config.with_converter_command(command.split_whitespace().map(String::from).collect());
        }
        if self.progress {
            config = config.with_progress();
        }

        config
    }

    /// Console sink honoring `--quiet`
    pub fn console_log(&self) -> ConsoleLog {
        if self.quiet {
            ConsoleLog::new().quiet()
        } else {
            ConsoleLog::new()
        }
    }
}

/// Set up structured diagnostics on stderr
pub fn setup_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sdd_compiler={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
}

/// Parse arguments into a run, execute it and print the summary
pub async fn run(args: Args) -> Result<ProcessingStats> {
    setup_logging(args.verbose);

    let processor = BatchProcessor::new(args.to_config()).context("Invalid configuration")?;
    let log: Arc<dyn ProcessLog> = Arc::new(args.console_log());

    let stats = processor
        .run(log)
        .await
        .with_context(|| format!("Failed to compile CSV files in {}", args.path.display()))?;

    print_summary(&stats);
    Ok(stats)
}

fn print_summary(stats: &ProcessingStats) {
    println!();
    println!("{}", "Summary".bright_green().bold());
    println!(
        "  {} {}",
        "Files selected:".bright_cyan(),
        stats.files_selected
    );
    println!(
        "  {} {}",
        "Files processed:".bright_cyan(),
        stats.files_processed
    );
    if stats.files_with_errors > 0 {
        println!(
            "  {} {}",
            "Files with errors:".bright_cyan(),
            stats.files_with_errors.to_string().red()
        );
    }
    println!(
        "  {} {} of {} rows ({} skipped)",
        "Records compiled:".bright_cyan(),
        stats.records_compiled.to_string().bright_white().bold(),
        stats.rows_read,
        stats.rows_skipped
    );
    if let Some(path) = &stats.output_path {
        println!("  {} {}", "Output:".bright_cyan(), path.display());
    }
    println!(
        "  {} {:.2}s",
        "Time:".bright_cyan(),
        stats.processing_time_ms as f64 / 1000.0
    );
}
