//! xlsx to xlsb conversion through an external office application.
//!
//! There is no native writer for the binary workbook format, so conversion
//! shells out: by default to Excel through PowerShell COM automation,
//! otherwise to a user-supplied command line.

use crate::config::ConverterConfig;
use crate::console::ProcessLog;
use crate::constants::{CONVERTIBLE_EXTENSIONS, XLSB_EXTENSION, XLSB_FILE_FORMAT};
use crate::error::{Result, SddError};
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Produces a sibling `.xlsb` for a workbook
pub trait WorkbookConverter {
    fn convert(&self, source: &Path) -> impl Future<Output = Result<PathBuf>> + Send;
}

/// Whether the converter accepts `path` as input
pub fn is_convertible(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            CONVERTIBLE_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

/// Path of the converted workbook for `source`
pub fn xlsb_path(source: &Path) -> PathBuf {
    source.with_extension(XLSB_EXTENSION)
}

/// Runs an external command with `{input}` and `{output}` placeholders
#[derive(Debug, Clone)]
pub struct CommandConverter {
    program: String,
    args: Vec<String>,
    timeout: Duration,
    powershell_paths: bool,
}

impl CommandConverter {
    /// Custom command line; the first element is the program
    pub fn new(command: Vec<String>, timeout: Duration) -> Result<Self> {
        let mut parts = command.into_iter();
        let program = parts.next().ok_or_else(|| SddError::Configuration {
            message: "Converter command must not be empty".to_string(),
        })?;

        Ok(Self {
            program,
            args: parts.collect(),
            timeout,
            powershell_paths: false,
        })
    }

    /// Excel automation: open read-only, autofit every sheet, save as xlsb
    pub fn excel(timeout: Duration) -> Self {
        let script = format!(
            "$ErrorActionPreference = 'Stop'; \
             $xl = New-Object -ComObject Excel.Application; \
             $xl.Visible = $false; $xl.ScreenUpdating = $false; $xl.DisplayAlerts = $false; \
             try {{ \
               $wb = $xl.Workbooks.Open('{{input}}', 0, $true); \
               try {{ \
                 foreach ($ws in $wb.Worksheets) {{ [void]$ws.Columns.AutoFit() }}; \
                 $wb.SaveAs('{{output}}', {}) \
               }} finally {{ $wb.Close($false) }} \
             }} finally {{ $xl.Quit() }}",
            XLSB_FILE_FORMAT
        );

        Self {
            program: "powershell".to_string(),
            args: vec![
                "-NoProfile".to_string(),
                "-NonInteractive".to_string(),
                "-Command".to_string(),
                script,
            ],
            timeout,
            powershell_paths: true,
        }
    }

    /// Converter for the given settings, or `None` when nothing can convert on this host
    pub fn from_config(config: &ConverterConfig) -> Result<Option<Self>> {
        let timeout = Duration::from_secs(config.timeout_secs);
        match &config.command {
            Some(command) => Self::new(command.clone(), timeout).map(Some),
            None if cfg!(windows) => Ok(Some(Self::excel(timeout))),
            None => Ok(None),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments with placeholders filled in
    pub fn render_args(&self, input: &Path, output: &Path) -> Vec<String> {
        let quote = |path: &Path| {
            let text = path.display().to_string();
            if self.powershell_paths {
                text.replace('\'', "''")
            } else {
                text
            }
        };
        let (input, output) = (quote(input), quote(output));

        self.args
            .iter()
            .map(|arg| arg.replace("{input}", &input).replace("{output}", &output))
            .collect()
    }
}

impl WorkbookConverter for CommandConverter {
    async fn convert(&self, source: &Path) -> Result<PathBuf> {
        if !is_convertible(source) {
            return Err(SddError::Conversion {
                path: source.to_path_buf(),
                reason: "not a supported Excel/CSV file type".to_string(),
            });
        }

        let target = xlsb_path(source);
        let args = self.render_args(source, &target);
        debug!("Running converter: {} {:?}", self.program, args);

        let mut command = Command::new(&self.program);
        command.args(&args).kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| SddError::ConversionTimeout {
                path: source.to_path_buf(),
                seconds: self.timeout.as_secs(),
            })?
            .map_err(|e| SddError::Conversion {
                path: source.to_path_buf(),
                reason: format!("failed to start '{}': {}", self.program, e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SddError::Conversion {
                path: source.to_path_buf(),
                reason: format!("converter exited with {}: {}", output.status, stderr.trim()),
            });
        }

        if !target.exists() {
            return Err(SddError::Conversion {
                path: source.to_path_buf(),
                reason: format!("converter did not produce {}", target.display()),
            });
        }

        Ok(target)
    }
}

/// Remove the intermediate workbook, reporting failures by kind
pub fn delete_intermediate(path: &Path, log: &dyn ProcessLog) -> bool {
    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!("Deleted {}", path.display());
            true
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log.error(&format!("Error: File '{}' was not found.", path.display()));
            false
        }
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            log.error(&format!(
                "Error: No permission to delete file '{}'.",
                path.display()
            ));
            false
        }
        Err(e) => {
            log.error(&format!(
                "An error occurred while deleting the file '{}': {}",
                path.display(),
                e
            ));
            false
        }
    }
}
