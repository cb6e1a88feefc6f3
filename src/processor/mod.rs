//! Batch compilation of SDD exports.
//!
//! Orchestrates the whole workflow: select CSV files by modification time,
//! split and parse each file's sections, normalize rows into canonical
//! records and hand the compiled table to the workbook export.

#[cfg(test)]
pub mod tests;

use crate::coil::extract_coil_no;
use crate::config::CompilerConfig;
use crate::console::{LogLevel, ProcessLog};
use crate::constants::{OUTPUT_TIMESTAMP_FORMAT, XLSX_EXTENSION};
use crate::error::Result;
use crate::export::convert::CommandConverter;
use crate::export::{ExportOptions, export_compiled};
use crate::models::{CompiledTable, ProcessingStats, Section};
use crate::normalize::normalize_record;
use crate::sections::{display_name, parse_csv_sections};
use crate::selection::{DateWindow, select_csv_files};

use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::task;
use tracing::debug;

/// Routes log lines around a live progress bar so they do not tear it
struct ProgressLog<'a> {
    bar: &'a ProgressBar,
    inner: &'a dyn ProcessLog,
}

impl ProcessLog for ProgressLog<'_> {
    fn log(&self, level: LogLevel, message: &str) {
        self.bar.suspend(|| self.inner.log(level, message));
    }
}

/// Main processor for an SDD compilation run
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    config: CompilerConfig,
}

impl BatchProcessor {
    /// Create a processor for a validated configuration
    pub fn new(config: CompilerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// `<base>_<YYYYmmddHHMMSS>.xlsx`
    pub fn output_file_name(&self) -> String {
        format!(
            "{}_{}.{}",
            self.config.output_base_name.trim(),
            Local::now().format(OUTPUT_TIMESTAMP_FORMAT),
            XLSX_EXTENSION
        )
    }

    /// Parse and normalize one file into `table`
    pub fn compile_file(&self, path: &Path, table: &mut CompiledTable, log: &dyn ProcessLog) {
        let file_name = display_name(path);
        log.info(&format!("Reading file: {}", file_name));

        let coil_no = extract_coil_no(&file_name, log);
        let parsed = parse_csv_sections(path, log);

        let before = table.records.len();
        for (section, rows) in [(Section::Top, &parsed.top), (Section::Bottom, &parsed.bottom)] {
            for raw in rows {
                match normalize_record(raw, &coil_no, section) {
                    Some(record) => table.records.push(record),
                    None => table.rows_skipped += 1,
                }
            }
        }

        table.rows_seen += parsed.rows();
        table.files_processed += 1;
        if parsed.faults > 0 {
            table.files_with_errors += 1;
        }

        debug!(
            "{}: {} rows, {} records kept",
            file_name,
            parsed.rows(),
            table.records.len() - before
        );
    }

    /// Compile files in order, one at a time
    pub fn compile_files(&self, files: &[PathBuf], log: &dyn ProcessLog) -> CompiledTable {
        let pb = if self.config.show_progress {
            let pb = ProgressBar::new(files.len() as u64);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            {
                pb.set_style(style.progress_chars("#>-"));
            }
            pb
        } else {
            ProgressBar::hidden()
        };

        let log = ProgressLog { bar: &pb, inner: log };
        let mut table = CompiledTable::default();
        for path in files {
            pb.set_message(display_name(path));
            self.compile_file(path, &mut table, &log);
            pb.inc(1);
        }
        pb.finish_and_clear();

        table
    }

    /// Run the full workflow: select, compile, export and convert.
    ///
    /// File selection and compilation run on the blocking pool so the
    /// runtime stays free to observe Ctrl+C.
    pub async fn run(&self, log: Arc<dyn ProcessLog>) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        let config = &self.config;

        let window = DateWindow::parse(&config.start_date, &config.end_date, log.as_ref())?;
        log.info(&format!(
            "Search for CSV files in '{}' from '{}' to '{}'.",
            config.input_path.display(),
            window.start,
            window.end
        ));

        let processor = self.clone();
        let worker_log = Arc::clone(&log);
        let (files_selected, table) = task::spawn_blocking(move || -> Result<(usize, Option<CompiledTable>)> {
            let files =
                select_csv_files(&processor.config.input_path, &window, worker_log.as_ref())?;
            if files.is_empty() {
                return Ok((0, None));
            }
            let table = processor.compile_files(&files, worker_log.as_ref());
            Ok((files.len(), Some(table)))
        })
        .await??;

        let mut stats = ProcessingStats {
            files_selected,
            ..Default::default()
        };

        let Some(table) = table else {
            log.warning(&format!(
                "No CSV files were found in '{}' in that date range.",
                config.input_path.display()
            ));
            stats.processing_time_ms = start_time.elapsed().as_millis();
            return Ok(stats);
        };

        stats.files_processed = table.files_processed;
        stats.files_with_errors = table.files_with_errors;
        stats.rows_read = table.rows_seen;
        stats.records_compiled = table.len();
        stats.rows_skipped = table.rows_skipped;

        let converter = if config.converter.enabled {
            let converter = CommandConverter::from_config(&config.converter)?;
            if converter.is_none() {
                log.warning(
                    "No XLSB converter is available on this system; keeping the XLSX file.",
                );
            }
            converter
        } else {
            None
        };

        stats.output_path = export_compiled(
            table,
            &config.input_path,
            &self.output_file_name(),
            converter.as_ref(),
            ExportOptions {
                keep_intermediate: config.converter.keep_intermediate,
            },
            log.as_ref(),
        )
        .await?;

        log.success("Finished processing the CSV files.");
        stats.processing_time_ms = start_time.elapsed().as_millis();

        Ok(stats)
    }
}
