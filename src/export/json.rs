//! JSON Export functionality
//!
//! Defines the split report shared by every export format and writes it as
//! JSON with schema versioning.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::{PatunganError, PatunganResult};
use crate::models::{BillRecord, Money, SplitMethod, SplitOutcome};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Everything needed to settle up after a split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitReport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub merchant_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    pub method: SplitMethod,

    pub currency_symbol: String,

    /// Sum of the item totals
    pub items_total: Money,

    pub tax_amount: Money,

    pub service_charge: Money,

    /// Items + tax + service charge
    pub bill_total: Money,

    /// What each participant owes, in participant order
    pub shares: Vec<ShareEntry>,

    /// Items nobody was assigned to
    #[serde(default)]
    pub unassigned: Vec<UnassignedEntry>,
}

/// One participant's share
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareEntry {
    pub participant: String,
    pub amount: Money,
}

/// An item left out of a per-item split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnassignedEntry {
    pub item: String,
    pub amount: Money,
}

impl SplitReport {
    pub fn new(
        bill: &BillRecord,
        method: SplitMethod,
        outcome: &SplitOutcome,
        currency_symbol: &str,
    ) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            merchant_name: bill.merchant_name().to_string(),
            date: bill.date(),
            method,
            currency_symbol: currency_symbol.to_string(),
            items_total: bill.items_total(),
            tax_amount: bill.tax_amount(),
            service_charge: bill.service_charge(),
            bill_total: bill.total_amount(),
            shares: outcome
                .results
                .iter()
                .map(|(participant, amount)| ShareEntry {
                    participant: participant.to_string(),
                    amount,
                })
                .collect(),
            unassigned: outcome
                .warnings
                .iter()
                .map(|warning| UnassignedEntry {
                    item: warning.item_name.clone(),
                    amount: warning.amount,
                })
                .collect(),
        }
    }

    /// Sum of all shares
    pub fn distributed_total(&self) -> Money {
        self.shares.iter().map(|share| share.amount).sum()
    }

    /// Part of the bill no share covers (unassigned items, tax and service
    /// charge in a per-item split)
    pub fn undistributed(&self) -> Money {
        self.bill_total - self.distributed_total()
    }

    /// Format an amount with the report's currency symbol
    pub fn money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }
}

/// Export the report as JSON
pub fn export_split_json<W: Write>(
    report: &SplitReport,
    writer: &mut W,
    pretty: bool,
) -> PatunganResult<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, report)
    } else {
        serde_json::to_writer(&mut *writer, report)
    }
    .map_err(|e| PatunganError::Export(e.to_string()))?;

    writeln!(writer).map_err(|e| PatunganError::Export(e.to_string()))?;
    Ok(())
}
