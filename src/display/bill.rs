//! Bill display formatting
//!
//! Formats an extracted or edited bill for terminal output.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

use crate::models::bill::format_quantity;
use crate::models::BillRecord;

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "#")]
    number: usize,
    #[tabled(rename = "Item")]
    name: String,
    #[tabled(rename = "Qty")]
    quantity: String,
    #[tabled(rename = "Unit price")]
    unit_price: String,
    #[tabled(rename = "Total")]
    total: String,
}

/// Format a bill: header, item table and totals
pub fn format_bill(bill: &BillRecord, currency: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Merchant: {}\n", display_or_dash(bill.merchant_name())));
    match (bill.date(), bill.time()) {
        (Some(date), Some(time)) => {
            output.push_str(&format!("Date:     {} {}\n", date, time.format("%H:%M")))
        }
        (Some(date), None) => output.push_str(&format!("Date:     {}\n", date)),
        _ => {}
    }
    output.push('\n');

    if bill.items().is_empty() {
        output.push_str("No items.\n");
    } else {
        let rows = bill.items().iter().enumerate().map(|(i, item)| ItemRow {
            number: i + 1,
            name: item.name().to_string(),
            quantity: format_quantity(item.quantity()),
            unit_price: item.unit_price().to_string(),
            total: item.total_price().to_string(),
        });
        let mut table = Table::new(rows);
        table
            .with(Style::psql())
            .modify(Columns::new(2..), Alignment::right());
        output.push_str(&table.to_string());
        output.push('\n');
    }

    output.push('\n');
    let lines = [
        ("Subtotal:      ", bill.items_total()),
        ("Tax:           ", bill.tax_amount()),
        ("Service charge:", bill.service_charge()),
        ("Total:         ", bill.total_amount()),
    ];
    for (label, amount) in lines {
        output.push_str(&format!("{} {}\n", label, amount.format_with_symbol(currency)));
    }

    if let (Some(reported), Some(_)) = (bill.reported_total(), bill.reported_total_mismatch()) {
        output.push_str(&format!(
            "Note: the receipt says {}\n",
            reported.format_with_symbol(currency)
        ));
    }

    output
}

fn display_or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}
