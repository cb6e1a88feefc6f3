//! Top/Bottom section splitting for SDD exports.
//!
//! An SDD export holds up to two sub-tables sharing one column layout.
//! The Top table starts after a 3-line preamble; an optional line reading
//! `Bottom` opens a second table with its own 2-line preamble. This module
//! locates the marker, slices each region's data lines and rebuilds a
//! header-plus-data CSV for the tabular parser.

use crate::console::ProcessLog;
use crate::constants::{BOTTOM_MARKER, BOTTOM_PREAMBLE_LINES, SDD_HEADER, TOP_PREAMBLE_LINES};
use crate::error::SddError;
use crate::models::{ParsedSections, Section};
use crate::table::read_section;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Data lines of each region, blank lines already removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSplit<'a> {
    pub top: Vec<&'a str>,
    /// `None` when the file has no Bottom marker
    pub bottom: Option<Vec<&'a str>>,
}

/// Split file content into lines after a leading BOM.
///
/// `\n`, `\r\n` and a lone `\r` all end a line; a final terminator does
/// not open an extra empty line.
pub fn split_lines(content: &str) -> Vec<&str> {
    let mut rest = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = Vec::new();

    while let Some(idx) = rest.find(['\r', '\n']) {
        lines.push(&rest[..idx]);
        let terminator = if rest[idx..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[idx + terminator..];
    }
    if !rest.is_empty() {
        lines.push(rest);
    }

    lines
}

/// Index of the first line that reads `bottom` (trimmed, case-insensitive)
pub fn find_bottom_marker(lines: &[&str]) -> Option<usize> {
    lines
        .iter()
        .position(|line| line.trim().to_lowercase() == BOTTOM_MARKER)
}

/// Slice raw lines into Top and Bottom data lines.
///
/// With the marker at `i`, Top is `[3, i-1)` (the line right above the
/// marker is a separator) and Bottom is `[i+3, end)`. Without it, Top is
/// `[3, end)`. Ranges that would start past their end are empty.
pub fn split_sections<'a>(lines: &[&'a str]) -> SectionSplit<'a> {
    let marker = find_bottom_marker(lines);

    let top_end = match marker {
        Some(i) => i.saturating_sub(1),
        None => lines.len(),
    };
    let top = non_blank(slice(lines, TOP_PREAMBLE_LINES, top_end));

    let bottom = marker.map(|i| non_blank(slice(lines, i + BOTTOM_PREAMBLE_LINES, lines.len())));

    SectionSplit { top, bottom }
}

fn slice<'l, 'a>(lines: &'l [&'a str], start: usize, end: usize) -> &'l [&'a str] {
    if start >= end || start >= lines.len() {
        &[]
    } else {
        &lines[start..end.min(lines.len())]
    }
}

fn non_blank<'a>(lines: &[&'a str]) -> Vec<&'a str> {
    lines
        .iter()
        .copied()
        .filter(|line| !line.trim().is_empty())
        .collect()
}

/// Prepend `header` to the data lines as one CSV text
pub fn reconstruct_csv(header: &str, data_lines: &[&str]) -> String {
    let mut text = String::with_capacity(
        header.len() + data_lines.iter().map(|l| l.len() + 1).sum::<usize>(),
    );
    text.push_str(header);
    for line in data_lines {
        text.push('\n');
        text.push_str(line);
    }
    text
}

/// Parse both sections of already-read file content
pub fn parse_sections_text(content: &str, file_name: &str, log: &dyn ProcessLog) -> ParsedSections {
    let lines = split_lines(content);
    let split = split_sections(&lines);
    let mut parsed = ParsedSections::default();

    debug!(
        "{}: {} lines, top data lines {}, bottom {:?}",
        file_name,
        lines.len(),
        split.top.len(),
        split.bottom.as_ref().map(Vec::len)
    );

    let top_text = reconstruct_csv(SDD_HEADER, &split.top);
    let (top, faulted) = read_section(Section::Top, split.top.len(), &top_text, file_name, log);
    parsed.top = top;
    parsed.faults += usize::from(faulted);

    if let Some(bottom_lines) = &split.bottom {
        let bottom_text = reconstruct_csv(SDD_HEADER, bottom_lines);
        let (bottom, faulted) =
            read_section(Section::Bottom, bottom_lines.len(), &bottom_text, file_name, log);
        parsed.bottom = bottom;
        parsed.faults += usize::from(faulted);
    }

    parsed
}

/// Read an SDD export and parse its Top and Bottom sections.
///
/// Never fails: an unreadable file reports an error and yields two empty
/// datasets.
pub fn parse_csv_sections(path: &Path, log: &dyn ProcessLog) -> ParsedSections {
    let file_name = display_name(path);

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(source) => {
            let fault = SddError::FileRead {
                path: path.to_path_buf(),
                source,
            };
            log.error(&format!("Error: {}", fault));
            return ParsedSections {
                faults: 1,
                ..Default::default()
            };
        }
    };

    parse_sections_text(&content, &file_name, log)
}

/// Base name of a path for messages and coil extraction
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::{LogLevel, MemoryLog};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ROW_A: &str = "1,Scratch-A1-x-Long,10.5,100,900,-400,2,1,0.1,0";
    const ROW_B: &str = "2,Dent-B2-y-Deep,20.0,150,850,-350,3,2,0.2,90";
    const ROW_C: &str = "3,Hole-C3-z-Pin,30.0,200,800,-300,4,3,0.3,180";

    fn two_section_file() -> Vec<&'static str> {
        vec![
            "Report,SDD",       // 0
            "Top",              // 1
            SDD_HEADER,         // 2
            ROW_A,              // 3
            ROW_B,              // 4
            "",                 // 5 separator
            "Bottom",           // 6
            "Side,Bottom",      // 7
            SDD_HEADER,         // 8
            ROW_C,              // 9
        ]
    }

    #[test]
    fn test_find_bottom_marker_is_exact_and_case_insensitive() {
        assert_eq!(find_bottom_marker(&["x", "  BOTTOM  ", "bottom"]), Some(1));
        assert_eq!(find_bottom_marker(&["bottoms", "Bottom line", "top"]), None);
    }

    #[test]
    fn test_split_with_marker_uses_fixed_offsets() {
        let lines = two_section_file();
        let split = split_sections(&lines);

        assert_eq!(split.top, vec![ROW_A, ROW_B]);
        assert_eq!(split.bottom, Some(vec![ROW_C]));
    }

    #[test]
    fn test_top_stops_one_line_before_marker() {
        // No blank separator: the row directly above the marker is dropped
        let lines = vec!["h1", "h2", "h3", ROW_A, ROW_B, "bottom", "h", "h", ROW_C];
        let split = split_sections(&lines);

        assert_eq!(split.top, vec![ROW_A]);
        assert_eq!(split.bottom, Some(vec![ROW_C]));
    }

    #[test]
    fn test_split_without_marker_takes_rest_of_file() {
        let lines = vec!["h1", "h2", SDD_HEADER, ROW_A, "", "   ", ROW_B];
        let split = split_sections(&lines);

        assert_eq!(split.top, vec![ROW_A, ROW_B]);
        assert_eq!(split.bottom, None);
    }

    #[test]
    fn test_short_regions_are_empty_not_errors() {
        let split = split_sections(&["h1", "Bottom", "h"]);
        assert!(split.top.is_empty());
        assert_eq!(split.bottom, Some(vec![]));

        let split = split_sections(&["only one line"]);
        assert!(split.top.is_empty());
        assert_eq!(split.bottom, None);

        assert_eq!(split_sections(&[]).top, Vec::<&str>::new());
    }

    #[test]
    fn test_split_lines_handles_crlf_and_bom() {
        let lines = split_lines("\u{feff}a\r\nb\r\n\r\nbottom\r\n");
        assert_eq!(lines, vec!["a", "b", "", "bottom"]);
    }

    #[test]
    fn test_split_lines_handles_bare_cr() {
        assert_eq!(split_lines("a\rb\r\rc"), vec!["a", "b", "", "c"]);
        assert_eq!(split_lines("a\rb\r\nc\nd\r"), vec!["a", "b", "c", "d"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_parse_sections_text_with_cr_line_endings() {
        let log = MemoryLog::new();
        let content = two_section_file().join("\r");
        let parsed = parse_sections_text(&content, "file.csv", &log);

        assert_eq!(parsed.top.len(), 2);
        assert_eq!(parsed.bottom.len(), 1);
        assert!(log.entries().is_empty());
    }

    #[test]
    fn test_reconstruct_csv() {
        assert_eq!(reconstruct_csv("a,b", &["1,2", "3,4"]), "a,b\n1,2\n3,4");
        assert_eq!(reconstruct_csv("a,b", &[]), "a,b");
    }

    #[test]
    fn test_parse_sections_text_both_sections() {
        let log = MemoryLog::new();
        let content = two_section_file().join("\n");
        let parsed = parse_sections_text(&content, "file.csv", &log);

        assert_eq!(parsed.top.len(), 2);
        assert_eq!(parsed.bottom.len(), 1);
        assert_eq!(parsed.faults, 0);
        assert_eq!(parsed.bottom[0].class_name.as_deref(), Some("Hole-C3-z-Pin"));
        assert!(log.entries().is_empty());
    }

    #[test]
    fn test_parse_sections_text_without_marker_has_empty_bottom() {
        let log = MemoryLog::new();
        let content = ["h1", "h2", SDD_HEADER, ROW_A].join("\n");
        let parsed = parse_sections_text(&content, "file.csv", &log);

        assert_eq!(parsed.top.len(), 1);
        assert!(parsed.bottom.is_empty());
        assert_eq!(log.count(LogLevel::Warning), 0);
        assert_eq!(log.count(LogLevel::Error), 0);
    }

    #[test]
    fn test_parse_sections_text_empty_bottom_warns() {
        let log = MemoryLog::new();
        let content = ["h1", "h2", SDD_HEADER, ROW_A, "", "Bottom", "h", SDD_HEADER].join("\n");
        let parsed = parse_sections_text(&content, "file.csv", &log);

        assert_eq!(parsed.top.len(), 1);
        assert!(parsed.bottom.is_empty());
        let warnings = log.messages(LogLevel::Warning);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("BOTTOM section"));
    }

    #[test]
    fn test_parse_fault_is_isolated_to_its_section() {
        let log = MemoryLog::new();
        let content = [
            "h1",
            "h2",
            SDD_HEADER,
            "1,A,1,2,3,4,5,6,7,8,9,10,11",
            "",
            "Bottom",
            "h",
            SDD_HEADER,
            ROW_C,
        ]
        .join("\n");
        let parsed = parse_sections_text(&content, "file.csv", &log);

        assert!(parsed.top.is_empty());
        assert_eq!(parsed.bottom.len(), 1);
        assert_eq!(parsed.faults, 1);
        assert_eq!(log.count(LogLevel::Error), 1);
    }

    #[test]
    fn test_parse_csv_sections_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        for line in two_section_file() {
            writeln!(temp_file, "{}", line).unwrap();
        }

        let log = MemoryLog::new();
        let parsed = parse_csv_sections(temp_file.path(), &log);
        assert_eq!(parsed.rows(), 3);
        assert_eq!(parsed.faults, 0);
    }

    #[test]
    fn test_unreadable_file_yields_empty_sections() {
        let log = MemoryLog::new();
        let parsed = parse_csv_sections(Path::new("/nonexistent/dir/missing.csv"), &log);

        assert_eq!(parsed.rows(), 0);
        assert_eq!(parsed.faults, 1);
        let errors = log.messages(LogLevel::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("missing.csv"));
    }
}
