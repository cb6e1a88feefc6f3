//! CSV file selection by modification-time window.
//!
//! Lists the direct `.csv` entries of the input folder and keeps those
//! whose local modification time falls inside a [`DateWindow`].

use crate::console::ProcessLog;
use crate::constants::{DATE_FORMAT, DATETIME_FORMATS};
use crate::error::{Result, SddError};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;
use walkdir::WalkDir;

/// Inclusive local-time window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateWindow {
    /// Build from user input. A date-only end covers that whole day;
    /// reversed boundaries are swapped with a warning.
    pub fn parse(start: &str, end: &str, log: &dyn ProcessLog) -> Result<Self> {
        let start = parse_boundary(start, false)?;
        let end = parse_boundary(end, true)?;

        if start > end {
            log.warning("Warning: The start date is greater than the end date. Reversing the order.");
            return Ok(Self {
                start: end,
                end: start,
            });
        }

        Ok(Self { start, end })
    }

    pub fn contains(&self, time: NaiveDateTime) -> bool {
        self.start <= time && time <= self.end
    }
}

/// Parse a window boundary; `end_of_day` extends a date-only value to 23:59:59.999999
pub fn parse_boundary(value: &str, end_of_day: bool) -> Result<NaiveDateTime> {
    let value = value.trim();

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(datetime);
        }
    }

    let date = NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| SddError::InvalidDate {
        value: value.to_string(),
    })?;

    let time = if end_of_day {
        NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999)
    } else {
        NaiveTime::from_hms_opt(0, 0, 0)
    }
    .ok_or_else(|| SddError::InvalidDate {
        value: value.to_string(),
    })?;

    Ok(date.and_time(time))
}

fn modified_local(path: &Path) -> std::io::Result<NaiveDateTime> {
    let modified: SystemTime = std::fs::metadata(path)?.modified()?;
    Ok(DateTime::<Local>::from(modified).naive_local())
}

fn is_csv_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// CSV files directly inside `folder` modified within `window`, sorted by name
pub fn select_csv_files(
    folder: &Path,
    window: &DateWindow,
    log: &dyn ProcessLog,
) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(SddError::FolderNotFound {
            path: folder.to_path_buf(),
        });
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(folder).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log.warning(&format!("Warning: Failed to read a folder entry: {}", e));
                continue;
            }
        };

        let path = entry.path();
        if !entry.file_type().is_file() || !is_csv_file(path) {
            continue;
        }

        match modified_local(path) {
            Ok(modified) if window.contains(modified) => files.push(path.to_path_buf()),
            Ok(modified) => {
                debug!("Skipping {} (modified {})", path.display(), modified);
            }
            Err(e) => {
                log.warning(&format!(
                    "Warning: Failed to get the modification time of file '{}': {}",
                    entry.file_name().to_string_lossy(),
                    e
                ));
            }
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!("Selected {} CSV files from {}", files.len(), folder.display());

    Ok(files)
}
