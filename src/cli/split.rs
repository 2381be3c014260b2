//! `patungan split`: split a saved bill without the wizard

use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use tracing::{info, warn};

use crate::config::Settings;
use crate::error::{PatunganError, PatunganResult};
use crate::export::{write_report, ExportFormat, SplitReport};
use crate::gateway::ExtractedBill;
use crate::models::{BillRecord, ItemAssignment, Participant, SplitMethod};
use crate::services::SplitEngine;

/// Payers for one item, given as `N=NAME,NAME` with a 1-based item number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentArg {
    pub item: usize,
    pub payers: Vec<String>,
}

#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Bill JSON, as printed by `patungan extract --format json`
    #[arg(long, value_name = "FILE")]
    pub bill: PathBuf,

    /// Participant name (repeat for each person)
    #[arg(short, long = "participant", value_name = "NAME", required = true)]
    pub participants: Vec<String>,

    /// Split method (even, per-item)
    #[arg(short, long, default_value = "even", value_parser = parse_method)]
    pub method: SplitMethod,

    /// Item payers for a per-item split, e.g. `--assign 1=Me,Budi`
    #[arg(short, long = "assign", value_name = "N=NAMES", value_parser = parse_assignment)]
    pub assignments: Vec<AssignmentArg>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: ExportFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

fn parse_method(s: &str) -> Result<SplitMethod, String> {
    SplitMethod::parse(s).ok_or_else(|| format!("unknown split method '{}' (use even or per-item)", s))
}

/// Parse `N=NAME,NAME`
pub fn parse_assignment(s: &str) -> Result<AssignmentArg, String> {
    let (number, names) = s
        .split_once('=')
        .ok_or_else(|| format!("expected N=NAME[,NAME...], got '{}'", s))?;

    let item: usize = number
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not an item number", number.trim()))?;
    if item == 0 {
        return Err("item numbers start at 1".into());
    }

    let payers: Vec<String> = names
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect();
    if payers.is_empty() {
        return Err(format!("no payers given for item {}", item));
    }

    Ok(AssignmentArg { item, payers })
}

/// Handle the split command
pub fn handle_split_command<W: Write>(
    args: SplitArgs,
    settings: &Settings,
    out: &mut W,
) -> PatunganResult<()> {
    let json = fs::read_to_string(&args.bill)?;
    let bill = ExtractedBill::from_json(&json)?.into_bill()?;

    let participants = args
        .participants
        .iter()
        .map(|name| Participant::new(name.as_str()))
        .collect::<Result<Vec<_>, _>>()?;

    let assignment = build_assignment(&bill, &participants, &args.assignments)?;
    if args.method == SplitMethod::Even && !args.assignments.is_empty() {
        warn!("item assignments are ignored by an even split");
    }

    let outcome = SplitEngine::compute(&bill, &participants, args.method, Some(&assignment));
    for warning in &outcome.warnings {
        warn!(item = %warning.item_name, amount = %warning.amount, "item has not been assigned to anyone");
    }

    let report = SplitReport::new(&bill, args.method, &outcome, &settings.currency_symbol);
    match &args.output {
        Some(path) => {
            let mut file = File::create(path)?;
            write_report(&report, args.format, &mut file)?;
            info!(path = %path.display(), "report written");
        }
        None => write_report(&report, args.format, out)?,
    }
    Ok(())
}

fn build_assignment(
    bill: &BillRecord,
    participants: &[Participant],
    args: &[AssignmentArg],
) -> PatunganResult<ItemAssignment> {
    let mut assignment = ItemAssignment::new();
    for arg in args {
        let item = bill
            .items()
            .get(arg.item - 1)
            .ok_or_else(|| PatunganError::item_not_found(format!("#{}", arg.item)))?;

        for payer in &arg.payers {
            if !participants.iter().any(|p| p.name() == payer) {
                return Err(PatunganError::participant_not_found(payer.as_str()));
            }
            assignment.assign(item.id(), payer.as_str());
        }
    }
    Ok(assignment)
}
