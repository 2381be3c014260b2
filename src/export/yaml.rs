//! YAML Export functionality

use std::io::Write;

use crate::error::{PatunganError, PatunganResult};
use crate::export::json::SplitReport;

/// Export the report to YAML with a short header comment
pub fn export_split_yaml<W: Write>(report: &SplitReport, writer: &mut W) -> PatunganResult<()> {
    let err = |e: std::io::Error| PatunganError::Export(e.to_string());

    writeln!(writer, "# Patungan split for {}", report.merchant_name).map_err(err)?;
    writeln!(writer, "# Generated: {}", report.exported_at).map_err(err)?;
    writeln!(writer).map_err(err)?;

    serde_yaml::to_writer(writer, report).map_err(|e| PatunganError::Export(e.to_string()))?;
    Ok(())
}
