//! `patungan extract`: read one receipt and print the bill

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, ValueEnum};

use crate::config::Settings;
use crate::display::format_bill;
use crate::error::PatunganResult;
use crate::gateway::{BillExtractionGateway, ExtractedBill, ReceiptImage};
use crate::wizard::WizardController;

/// How to print an extracted bill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BillFormat {
    /// Aligned table
    #[default]
    Table,
    /// The extraction JSON schema, accepted by `patungan split --bill`
    Json,
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Receipt photo (PNG or JPEG)
    pub image: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: BillFormat,
}

/// Handle the extract command
pub async fn handle_extract_command<W: Write>(
    args: ExtractArgs,
    gateway: Arc<dyn BillExtractionGateway>,
    settings: &Settings,
    out: &mut W,
) -> PatunganResult<()> {
    let image = ReceiptImage::from_path(&args.image)?;
    let mut controller = WizardController::from_settings(gateway, settings);
    let bill = controller.extract(&image).await?;

    match args.format {
        BillFormat::Table => write!(out, "{}", format_bill(bill, &settings.currency_symbol))?,
        BillFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &ExtractedBill::from(bill))?;
            writeln!(out)?;
        }
    }
    Ok(())
}
