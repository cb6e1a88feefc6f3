//! Compiled table to xlsx.

use crate::constants::OUTPUT_COLUMNS;
use crate::error::Result;
use crate::models::CompiledTable;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use tracing::debug;

/// Leading columns built from text (coil, class parts, section); never numeric
const TEXT_COLUMNS: usize = 5;

/// Numeric cell value, if `text` reads as a finite number
fn numeric(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Per output column, whether every non-blank cell reads as a number.
///
/// Text columns are never numeric, and neither is a column with no values.
/// A numeric column is written entirely as numbers, any other column as text.
pub fn numeric_columns(table: &CompiledTable) -> [bool; OUTPUT_COLUMNS.len()] {
    let mut all_numeric = [true; OUTPUT_COLUMNS.len()];
    let mut seen = [false; OUTPUT_COLUMNS.len()];

    for record in &table.records {
        for (col, cell) in record.cells().into_iter().enumerate().skip(TEXT_COLUMNS) {
            if let Some(text) = cell {
                seen[col] = true;
                all_numeric[col] &= numeric(text).is_some();
            }
        }
    }

    std::array::from_fn(|col| col >= TEXT_COLUMNS && seen[col] && all_numeric[col])
}

/// Write `table` as a single-sheet workbook at `path`
pub fn write_workbook(table: &CompiledTable, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();

    for (col, name) in OUTPUT_COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &header_format)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    let numeric_cols = numeric_columns(table);
    for (idx, record) in table.records.iter().enumerate() {
        let row = (idx + 1) as u32;
        for (col, cell) in record.cells().into_iter().enumerate() {
            let Some(text) = cell else {
                continue;
            };
            let number = if numeric_cols[col] { numeric(text) } else { None };
            let col = col as u16;
            match number {
                Some(number) => {
                    worksheet.write_number(row, col, number)?;
                }
                None => {
                    worksheet.write_string(row, col, text)?;
                }
            }
        }
    }

    worksheet.autofit();
    workbook.save(path)?;

    debug!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CanonicalRecord, Section};
    use tempfile::TempDir;

    #[test]
    fn test_numeric_detection() {
        assert_eq!(numeric("12.5"), Some(12.5));
        assert_eq!(numeric("-400"), Some(-400.0));
        assert_eq!(numeric("KE5538"), None);
        assert_eq!(numeric("NaN"), None);
        assert_eq!(numeric("inf"), None);
    }

    fn record(distance: Option<&str>, orientation: Option<&str>) -> CanonicalRecord {
        CanonicalRecord {
            coil_no: "KE5538".to_string(),
            class_name: "1234".to_string(),
            defect_name: String::new(),
            grade_defect: "A".to_string(),
            section: Section::Top,
            distance_from_he_cgl_m: distance.map(str::to_string),
            distance_left_mm: None,
            distance_right_mm: None,
            distance_center_mm: None,
            height: None,
            width: None,
            segment_width_ratio: None,
            orientation: orientation.map(str::to_string),
        }
    }

    #[test]
    fn test_numeric_columns_decided_per_column() {
        let table = CompiledTable {
            records: vec![
                record(Some("10.5"), Some("0")),
                record(None, Some("n/a")),
                record(Some("-3"), Some("90")),
            ],
            ..Default::default()
        };

        let numeric_cols = numeric_columns(&table);
        // distance column: every value numeric, blanks ignored
        assert!(numeric_cols[5]);
        // orientation column: one text value keeps the whole column as text
        assert!(!numeric_cols[12]);
        // all-blank column
        assert!(!numeric_cols[6]);
        // class column holds digits but is always text
        assert!(!numeric_cols[1]);
    }

    #[test]
    fn test_write_workbook_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.xlsx");

        let table = CompiledTable {
            records: vec![CanonicalRecord {
                coil_no: "KE5538".to_string(),
                class_name: "Scratch".to_string(),
                defect_name: "Long".to_string(),
                grade_defect: "A".to_string(),
                section: Section::Top,
                distance_from_he_cgl_m: Some("10.5".to_string()),
                distance_left_mm: None,
                distance_right_mm: Some("900".to_string()),
                distance_center_mm: Some("-400".to_string()),
                height: Some("2".to_string()),
                width: Some("1".to_string()),
                segment_width_ratio: Some("0.1".to_string()),
                orientation: Some("0".to_string()),
            }],
            ..Default::default()
        };

        write_workbook(&table, &path).unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
