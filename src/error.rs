//! Error handling for SDD compilation.
//!
//! Provides error types with context for file reading, section parsing,
//! workbook export and binary conversion failures.

use crate::models::Section;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SddError {
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Workbook error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {section} data from '{file}': {reason}")]
    SectionParse {
        file: String,
        section: Section,
        reason: String,
    },

    #[error("Invalid date '{value}'. Use YYYY-MM-DD, YYYY-MM-DD HH:MM or YYYY-MM-DD HH:MM:SS")]
    InvalidDate { value: String },

    #[error("The folder '{path}' was not found")]
    FolderNotFound { path: PathBuf },

    #[error("Conversion failed for {path}: {reason}")]
    Conversion { path: PathBuf, reason: String },

    #[error("Conversion of {path} did not finish within {seconds}s")]
    ConversionTimeout { path: PathBuf, seconds: u64 },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Processing interrupted: {reason}")]
    Interrupted { reason: String },
}

pub type Result<T> = std::result::Result<T, SddError>;
