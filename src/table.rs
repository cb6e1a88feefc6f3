//! Tabular parsing of reconstructed section CSV.
//!
//! Reads section text with the Polars CSV reader, every column as text,
//! and converts frame rows into [`RawRecord`]s.

use crate::console::ProcessLog;
use crate::constants::{NULL_TOKENS, columns};
use crate::error::{Result, SddError};
use crate::models::{RawRecord, Section};
use polars::prelude::*;
use std::io::Cursor;
use tracing::debug;

/// Parse reconstructed CSV text (header plus data lines) into records
pub fn parse_csv_text(csv_text: &str) -> Result<Vec<RawRecord>> {
    let null_values: Vec<PlSmallStr> = NULL_TOKENS.iter().map(|token| (*token).into()).collect();

    let df = CsvReadOptions::default()
        .with_has_header(true)
        // Zero inference rows reads every column as String
        .with_infer_schema_length(Some(0))
        .map_parse_options(|opts| {
            opts.with_null_values(Some(NullValues::AllColumns(null_values.clone())))
        })
        .into_reader_with_file_handle(Cursor::new(csv_text.as_bytes().to_vec()))
        .finish()?;

    records_from_frame(&df)
}

/// Convert a string-typed frame into records; missing columns read as null
pub fn records_from_frame(df: &DataFrame) -> Result<Vec<RawRecord>> {
    let defect_no = string_column(df, columns::DEFECT_NO)?;
    let class_name = string_column(df, columns::CLASS_NAME)?;
    let top_m = string_column(df, columns::TOP_M)?;
    let distance_left = string_column(df, columns::DISTANCE_LEFT)?;
    let distance_right = string_column(df, columns::DISTANCE_RIGHT)?;
    let distance_center = string_column(df, columns::DISTANCE_CENTER)?;
    let height = string_column(df, columns::HEIGHT)?;
    let width = string_column(df, columns::WIDTH)?;
    let segment_width_ratio = string_column(df, columns::SEGMENT_WIDTH_RATIO)?;
    let orientation = string_column(df, columns::ORIENTATION)?;

    let value = |column: Option<&StringChunked>, idx: usize| -> Option<String> {
        column.and_then(|ca| ca.get(idx)).map(str::to_string)
    };

    let records = (0..df.height())
        .map(|idx| RawRecord {
            defect_no: value(defect_no, idx),
            class_name: value(class_name, idx),
            top_m: value(top_m, idx),
            distance_left_mm: value(distance_left, idx),
            distance_right_mm: value(distance_right, idx),
            distance_center_mm: value(distance_center, idx),
            height_mm: value(height, idx),
            width_mm: value(width, idx),
            segment_width_ratio: value(segment_width_ratio, idx),
            orientation: value(orientation, idx),
        })
        .collect();

    Ok(records)
}

fn string_column<'a>(df: &'a DataFrame, name: &str) -> Result<Option<&'a StringChunked>> {
    match df.column(name) {
        Ok(column) => Ok(Some(column.str()?)),
        Err(_) => {
            debug!("Column '{}' not present, reading as null", name);
            Ok(None)
        }
    }
}

/// Parse one section region, degrading to an empty dataset on any fault.
///
/// `data_lines` are the non-blank lines of the region; `csv_text` is the
/// reconstructed header-plus-data text. Returns the records and whether a
/// fault (error) was reported.
pub fn read_section(
    section: Section,
    data_lines: usize,
    csv_text: &str,
    file_name: &str,
    log: &dyn ProcessLog,
) -> (Vec<RawRecord>, bool) {
    if data_lines == 0 {
        log.warning(&format!(
            "    Warning: {} section in '{}' is empty.",
            section.label().to_uppercase(),
            file_name
        ));
        return (Vec::new(), false);
    }

    match parse_csv_text(csv_text) {
        Ok(records) => {
            debug!(
                "Parsed {} {} rows from {}",
                records.len(),
                section,
                file_name
            );
            (records, false)
        }
        Err(e) => {
            let fault = SddError::SectionParse {
                file: file_name.to_string(),
                section,
                reason: e.to_string(),
            };
            log.error(&format!("    Error: {}", fault));
            (Vec::new(), true)
        }
    }
}
