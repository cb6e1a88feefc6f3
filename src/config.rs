//! Configuration management and validation.
//!
//! Holds the run parameters for a compilation batch: input folder, date
//! window, output naming and binary conversion settings.

use crate::constants::{DEFAULT_CONVERTER_TIMEOUT_SECS, DEFAULT_OUTPUT_BASE_NAME};
use crate::error::{Result, SddError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Binary workbook conversion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Convert the compiled xlsx to xlsb
    pub enabled: bool,

    /// Custom command line with `{input}` and `{output}` placeholders.
    /// `None` uses Excel automation where available.
    pub command: Option<Vec<String>>,

    /// Seconds to wait for the converter before giving up
    pub timeout_secs: u64,

    /// Keep the intermediate xlsx after a successful conversion
    pub keep_intermediate: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: None,
            timeout_secs: DEFAULT_CONVERTER_TIMEOUT_SECS,
            keep_intermediate: false,
        }
    }
}

/// Global configuration for a compilation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Folder holding the SDD CSV exports; the workbook is written here too
    pub input_path: PathBuf,

    /// Window start (`YYYY-MM-DD[ HH:MM[:SS]]`)
    pub start_date: String,

    /// Window end; a date-only value covers the whole day
    pub end_date: String,

    /// Output file base name, timestamp and extension are appended
    pub output_base_name: String,

    /// Show a per-file progress bar
    pub show_progress: bool,

    pub converter: ConverterConfig,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("."),
            start_date: String::new(),
            end_date: String::new(),
            output_base_name: DEFAULT_OUTPUT_BASE_NAME.to_string(),
            show_progress: false,
            converter: ConverterConfig::default(),
        }
    }
}

impl CompilerConfig {
    pub fn new(
        input_path: impl Into<PathBuf>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            ..Default::default()
        }
    }

    /// Use a custom output base name
    pub fn with_output_base_name(mut self, name: impl Into<String>) -> Self {
        self.output_base_name = name.into();
        self
    }

    /// Skip the xlsb conversion and keep the xlsx
    pub fn without_conversion(mut self) -> Self {
        self.converter.enabled = false;
        self
    }

    /// Keep the xlsx next to the converted xlsb
    pub fn with_keep_intermediate(mut self) -> Self {
        self.converter.keep_intermediate = true;
        self
    }

    /// Convert with a custom command line
    pub fn with_converter_command(mut self, command: Vec<String>) -> Self {
        self.converter.command = Some(command);
        self
    }

    pub fn with_converter_timeout(mut self, seconds: u64) -> Self {
        self.converter.timeout_secs = seconds;
        self
    }

    pub fn with_progress(mut self) -> Self {
        self.show_progress = true;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let name = self.output_base_name.trim();
        if name.is_empty() {
            return Err(SddError::Configuration {
                message: "Output file name must not be empty".to_string(),
            });
        }
        if name.contains(['/', '\\']) {
            return Err(SddError::Configuration {
                message: format!(
                    "Output file name '{}' must not contain path separators",
                    name
                ),
            });
        }
        if self.converter.timeout_secs == 0 {
            return Err(SddError::Configuration {
                message: "Converter timeout must be at least 1 second".to_string(),
            });
        }
        if self
            .converter
            .command
            .as_ref()
            .is_some_and(|command| command.is_empty())
        {
            return Err(SddError::Configuration {
                message: "Converter command must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
