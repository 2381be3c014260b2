//! Export module for Patungan
//!
//! Writes a split report in several formats:
//! - Table: human-readable, for the terminal
//! - CSV: spreadsheet-compatible
//! - JSON: machine-readable, schema-versioned
//! - YAML: human-readable structured data

pub mod csv;
pub mod json;
pub mod yaml;

use std::io::Write;

use clap::ValueEnum;

use crate::display::format_split_report;
use crate::error::{PatunganError, PatunganResult};

pub use self::csv::export_split_csv;
pub use self::json::{export_split_json, ShareEntry, SplitReport, UnassignedEntry, EXPORT_SCHEMA_VERSION};
pub use self::yaml::export_split_yaml;

/// Report output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportFormat {
    /// Aligned table
    #[default]
    Table,
    /// Comma-separated values
    Csv,
    /// JSON document
    Json,
    /// YAML document
    Yaml,
}

/// Write `report` in `format`
pub fn write_report<W: Write>(
    report: &SplitReport,
    format: ExportFormat,
    writer: &mut W,
) -> PatunganResult<()> {
    match format {
        ExportFormat::Table => writeln!(writer, "{}", format_split_report(report))
            .map_err(|e| PatunganError::Export(e.to_string())),
        ExportFormat::Csv => export_split_csv(report, writer),
        ExportFormat::Json => export_split_json(report, writer, true),
        ExportFormat::Yaml => export_split_yaml(report, writer),
    }
}
