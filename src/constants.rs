//! Application constants for the SDD compiler
//!
//! Column names, section markers, the filename contract and output
//! defaults shared across the crate.

// =============================================================================
// Input File Layout
// =============================================================================

/// Column header shared by the Top and Bottom sections of an SDD export
pub const SDD_HEADER: &str = "Defect No.,Class Name,Top m,Distance from Left Edge mm,Distance from Right Edge mm,Distance from Center mm,Height mm,Width mm,Segment Width Ratio,Orientation";

/// Line (trimmed, lower-cased) that opens the Bottom section
pub const BOTTOM_MARKER: &str = "bottom";

/// Preamble lines at the top of the file before Top data starts
pub const TOP_PREAMBLE_LINES: usize = 3;

/// Lines from the Bottom marker (inclusive) to the first Bottom data line
pub const BOTTOM_PREAMBLE_LINES: usize = 3;

/// Tokens read as null in any column
pub const NULL_TOKENS: &[&str] = &["", "NULL"];

/// Source column names in an SDD export
pub mod columns {
    pub const DEFECT_NO: &str = "Defect No.";
    pub const CLASS_NAME: &str = "Class Name";
    pub const TOP_M: &str = "Top m";
    pub const DISTANCE_LEFT: &str = "Distance from Left Edge mm";
    pub const DISTANCE_RIGHT: &str = "Distance from Right Edge mm";
    pub const DISTANCE_CENTER: &str = "Distance from Center mm";
    pub const HEIGHT: &str = "Height mm";
    pub const WIDTH: &str = "Width mm";
    pub const SEGMENT_WIDTH_RATIO: &str = "Segment Width Ratio";
    pub const ORIENTATION: &str = "Orientation";
}

// =============================================================================
// Filename Contract
// =============================================================================

/// Coil number pattern, version 1.
///
/// Matches names like `Line1.24-05-10.KE5538 01.Defects.csv` and captures
/// the two-letter, four-digit coil identifier. Changing the export naming
/// convention means bumping this contract, not editing it in place.
pub const COIL_NO_PATTERN: &str = r"\.\d{2}-\d{2}-\d{2}\.([A-Z]{2}\d{4})\s+\d{2}\.Defects\.csv";

// =============================================================================
// Output Layout
// =============================================================================

/// Canonical output column order
pub const OUTPUT_COLUMNS: [&str; 13] = [
    "Coil No",
    "Class Name",
    "Defect Name",
    "Grade Defect",
    "Top/Bottom",
    "Distance from HE CGL (m)",
    "Distance Left (mm)",
    "Distance Right (mm)",
    "Distance Center (mm)",
    "Height",
    "Width",
    "Segment Width Ratio",
    "Orientation",
];

/// Base name for the compiled workbook when none is given
pub const DEFAULT_OUTPUT_BASE_NAME: &str = "CompiledData";

/// Timestamp suffix format for output filenames
pub const OUTPUT_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Intermediate workbook extension
pub const XLSX_EXTENSION: &str = "xlsx";

/// Binary workbook extension
pub const XLSB_EXTENSION: &str = "xlsb";

/// Extensions the binary converter accepts as input
pub const CONVERTIBLE_EXTENSIONS: &[&str] = &["xls", "xlsx", "xlsm", "csv"];

/// Excel `XlFileFormat` value for the binary workbook
pub const XLSB_FILE_FORMAT: u32 = 50;

/// Default converter timeout in seconds
pub const DEFAULT_CONVERTER_TIMEOUT_SECS: u64 = 300;

// =============================================================================
// Date Window
// =============================================================================

/// Accepted date-time formats, tried in order
pub const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Accepted date-only format
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp format for console log lines
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
