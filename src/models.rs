//! Core data structures for SDD compilation.
//!
//! Defines the section labels, raw and canonical record shapes,
//! and the processing statistics used throughout the library.

use crate::constants::OUTPUT_COLUMNS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Sub-table of an SDD export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    Top,
    Bottom,
}

impl Section {
    /// Label written to the `Top/Bottom` output column
    pub fn label(&self) -> &'static str {
        match self {
            Section::Top => "Top",
            Section::Bottom => "Bottom",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One data row of an SDD section, every column present-or-null
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub defect_no: Option<String>,
    pub class_name: Option<String>,
    pub top_m: Option<String>,
    pub distance_left_mm: Option<String>,
    pub distance_right_mm: Option<String>,
    pub distance_center_mm: Option<String>,
    pub height_mm: Option<String>,
    pub width_mm: Option<String>,
    pub segment_width_ratio: Option<String>,
    pub orientation: Option<String>,
}

/// Normalized output row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub coil_no: String,
    pub class_name: String,
    pub defect_name: String,
    pub grade_defect: String,
    pub section: Section,
    pub distance_from_he_cgl_m: Option<String>,
    pub distance_left_mm: Option<String>,
    pub distance_right_mm: Option<String>,
    pub distance_center_mm: Option<String>,
    pub height: Option<String>,
    pub width: Option<String>,
    pub segment_width_ratio: Option<String>,
    pub orientation: Option<String>,
}

impl CanonicalRecord {
    /// Cell values in [`OUTPUT_COLUMNS`] order; empty text counts as a blank cell
    pub fn cells(&self) -> [Option<&str>; OUTPUT_COLUMNS.len()] {
        fn text(value: &str) -> Option<&str> {
            Some(value).filter(|v| !v.is_empty())
        }
        [
            text(&self.coil_no),
            text(&self.class_name),
            text(&self.defect_name),
            text(&self.grade_defect),
            Some(self.section.label()),
            self.distance_from_he_cgl_m.as_deref(),
            self.distance_left_mm.as_deref(),
            self.distance_right_mm.as_deref(),
            self.distance_center_mm.as_deref(),
            self.height.as_deref(),
            self.width.as_deref(),
            self.segment_width_ratio.as_deref(),
            self.orientation.as_deref(),
        ]
    }
}

/// Both datasets recovered from one file
#[derive(Debug, Clone, Default)]
pub struct ParsedSections {
    pub top: Vec<RawRecord>,
    pub bottom: Vec<RawRecord>,
    /// Errors reported while reading or parsing this file
    pub faults: usize,
}

impl ParsedSections {
    pub fn rows(&self) -> usize {
        self.top.len() + self.bottom.len()
    }
}

/// Accumulated output of a batch, in file then section order
#[derive(Debug, Clone, Default)]
pub struct CompiledTable {
    pub records: Vec<CanonicalRecord>,
    pub rows_seen: usize,
    pub rows_skipped: usize,
    pub files_processed: usize,
    pub files_with_errors: usize,
}

impl CompiledTable {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Processing statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub files_selected: usize,
    pub files_processed: usize,
    pub files_with_errors: usize,
    pub rows_read: usize,
    pub records_compiled: usize,
    pub rows_skipped: usize,
    pub output_path: Option<PathBuf>,
    pub processing_time_ms: u128,
}
