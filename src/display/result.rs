//! Split result display formatting

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

use crate::export::SplitReport;
use crate::models::{Money, SplitMethod};

#[derive(Tabled)]
struct ShareRow {
    #[tabled(rename = "Participant")]
    participant: String,
    #[tabled(rename = "Owes")]
    amount: String,
}

/// Format a split report as a table with totals and warnings
pub fn format_split_report(report: &SplitReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("{} ({})\n", report.merchant_name, report.method));
    output.push_str(&format!("Bill total: {}\n\n", report.money(report.bill_total)));

    if report.shares.is_empty() {
        output.push_str("Nothing to split.\n");
        return output;
    }

    let rows = report.shares.iter().map(|share| ShareRow {
        participant: share.participant.clone(),
        amount: report.money(share.amount),
    });
    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .modify(Columns::new(1..), Alignment::right());
    output.push_str(&table.to_string());
    output.push('\n');

    for item in &report.unassigned {
        output.push_str(&format!(
            "Warning: Item '{}' has not been assigned to anyone ({})\n",
            item.item,
            report.money(item.amount)
        ));
    }

    let undistributed = report.undistributed();
    if report.method == SplitMethod::PerItem
        && undistributed.is_positive()
        && !undistributed.approx_eq(Money::zero())
    {
        output.push_str(&format!(
            "Not covered by any share: {}\n",
            report.money(undistributed)
        ));
    }

    output
}
