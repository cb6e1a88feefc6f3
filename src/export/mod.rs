//! Workbook export for compiled SDD tables
//!
//! Writes the compiled table to xlsx, optionally converts it to xlsb and
//! removes the intermediate file once the binary workbook exists.

pub mod convert;
pub mod workbook;

use self::convert::{WorkbookConverter, delete_intermediate, is_convertible};
use self::workbook::write_workbook;

use crate::console::ProcessLog;
use crate::error::Result;
use crate::models::CompiledTable;
use std::path::{Path, PathBuf};
use tokio::task;

/// Export settings for one run
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    pub keep_intermediate: bool,
}

/// Write `table` to `folder/file_name` and convert it when a converter is given.
///
/// Returns the path of the final workbook, or `None` when the table is empty.
/// A failed conversion is reported and leaves the xlsx in place. The workbook
/// is written on the blocking pool.
pub async fn export_compiled<C: WorkbookConverter>(
    table: CompiledTable,
    folder: &Path,
    file_name: &str,
    converter: Option<&C>,
    options: ExportOptions,
    log: &dyn ProcessLog,
) -> Result<Option<PathBuf>> {
    if table.is_empty() {
        log.warning("No data is processed for export to Excel.");
        return Ok(None);
    }

    let xlsx_path = folder.join(file_name);
    let rows = table.len();
    let target = xlsx_path.clone();
    task::spawn_blocking(move || write_workbook(&table, &target)).await??;
    log.success(&format!(
        "The XLSX file was created successfully: {} ({} rows)",
        xlsx_path.display(),
        rows
    ));

    let Some(converter) = converter else {
        return Ok(Some(xlsx_path));
    };

    if !is_convertible(&xlsx_path) {
        log.warning(&format!(
            "Skipping {}: Not a supported Excel/CSV file type for conversion.",
            xlsx_path.display()
        ));
        return Ok(Some(xlsx_path));
    }

    match converter.convert(&xlsx_path).await {
        Ok(xlsb_path) => {
            log.success(&format!(
                "Saved {} from {}",
                xlsb_path.display(),
                xlsx_path.display()
            ));
            if !options.keep_intermediate {
                delete_intermediate(&xlsx_path, log);
            }
            Ok(Some(xlsb_path))
        }
        Err(e) => {
            log.error(&format!("Error processing {}: {}", xlsx_path.display(), e));
            log.warning(&format!("Keeping {}", xlsx_path.display()));
            Ok(Some(xlsx_path))
        }
    }
}
