//! CSV Export functionality
//!
//! One row per participant, followed by one row per unassigned item, so the
//! file opens cleanly in a spreadsheet.

use std::io::Write;

use crate::error::{PatunganError, PatunganResult};
use crate::export::json::SplitReport;

/// Export the report to CSV
pub fn export_split_csv<W: Write>(report: &SplitReport, writer: W) -> PatunganResult<()> {
    let mut out = csv::Writer::from_writer(writer);
    let err = |e: csv::Error| PatunganError::Export(e.to_string());

    out.write_record(["Kind", "Name", "Amount"]).map_err(err)?;
    for share in &report.shares {
        let amount = format!("{:.2}", share.amount.value());
        out.write_record(["share", share.participant.as_str(), amount.as_str()])
            .map_err(err)?;
    }
    for item in &report.unassigned {
        let amount = format!("{:.2}", item.amount.value());
        out.write_record(["unassigned", item.item.as_str(), amount.as_str()])
            .map_err(err)?;
    }

    out.flush()
        .map_err(|e| PatunganError::Export(e.to_string()))?;
    Ok(())
}
