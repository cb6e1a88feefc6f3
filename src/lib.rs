//! SDD Compiler Library
//!
//! Compiles defect-inspection CSV exports from an SDD surface-detection
//! system into one Excel workbook.
//!
//! This library provides tools for:
//! - Splitting an export into its Top and Bottom sections
//! - Parsing each section into typed, null-aware records
//! - Recovering the coil number from the export filename
//! - Normalizing rows into a fixed output schema
//! - Selecting exports by modification-time window
//! - Writing the compiled table to XLSX and converting it to XLSB

pub mod cli;
pub mod coil;
pub mod config;
pub mod console;
pub mod constants;
pub mod error;
pub mod export;
pub mod models;
pub mod normalize;
pub mod processor;
pub mod sections;
pub mod selection;
pub mod table;

pub use config::CompilerConfig;
pub use console::{ConsoleLog, LogLevel, MemoryLog, ProcessLog};
pub use error::{Result, SddError};
pub use models::{CanonicalRecord, CompiledTable, ProcessingStats, RawRecord, Section};
pub use processor::BatchProcessor;
