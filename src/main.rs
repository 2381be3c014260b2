use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::runtime::Runtime;

use patungan::cli::{handle_extract_command, handle_split_command, ApiArgs, ExtractArgs, SplitArgs};
use patungan::config::api::{redact, API_BASE_VAR, API_KEY_VAR};
use patungan::config::{PatunganPaths, Settings};
use patungan::gateway::{BillExtractionGateway, OpenRouterGateway, RequestOptions};
use patungan::logging::{self, LogTarget};
use patungan::wizard::WizardController;

#[derive(Parser)]
#[command(
    name = "patungan",
    version,
    about = "Split a bill from a photo of the receipt",
    long_about = "Patungan reads the items, tax and service charge from a photo of a \
                  receipt, lets you correct them, and works out what everyone at the \
                  table owes, evenly or per item."
)]
struct Cli {
    #[command(flatten)]
    api: ApiArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive wizard (the default)
    #[command(alias = "ui")]
    Tui {
        /// Receipt to read straight away
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Read one receipt and print the bill
    Extract(ExtractArgs),

    /// Split a saved bill between participants, without the wizard
    Split(SplitArgs),

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = PatunganPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    if matches!(cli.command, Some(Commands::Config)) && !paths.settings_file().exists() {
        // Give the user a file to edit
        settings.save(&paths)?;
    }
    cli.api.apply_to(&mut settings);

    let command = cli.command.unwrap_or(Commands::Tui { image: None });
    let target = match command {
        Commands::Tui { .. } => LogTarget::File,
        _ => LogTarget::Stderr,
    };
    logging::init(target, &paths)?;

    match command {
        Commands::Tui { image } => {
            let gateway = build_gateway(&cli.api, &settings)?;
            let runtime = build_runtime()?;
            let controller = WizardController::from_settings(gateway, &settings);
            patungan::tui::run_tui(controller, &settings, &runtime, image)?;
        }
        Commands::Extract(args) => {
            let gateway = build_gateway(&cli.api, &settings)?;
            let runtime = build_runtime()?;
            let mut stdout = io::stdout().lock();
            runtime.block_on(handle_extract_command(args, gateway, &settings, &mut stdout))?;
        }
        Commands::Split(args) => {
            let mut stdout = io::stdout().lock();
            handle_split_command(args, &settings, &mut stdout)?;
        }
        Commands::Config => print_config(&cli.api, &paths, &settings),
    }

    Ok(())
}

/// The extraction gateway; fails before any UI starts if the API is not configured
fn build_gateway(api: &ApiArgs, settings: &Settings) -> Result<Arc<dyn BillExtractionGateway>> {
    let gateway = OpenRouterGateway::new(api.api_config()?, RequestOptions::from(settings))?;
    Ok(Arc::new(gateway))
}

fn build_runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")
}

fn print_config(api: &ApiArgs, paths: &PatunganPaths, settings: &Settings) {
    let unset = |var: &str| format!("not set ({})", var);

    println!("Patungan Configuration");
    println!("======================");
    println!("Base directory: {}", paths.base_dir().display());
    println!("Settings file:  {}", paths.settings_file().display());
    println!("Log file:       {}", paths.log_file().display());
    println!();
    println!("Settings:");
    println!("  Currency symbol:     {}", settings.currency_symbol);
    println!("  Default participant: {}", settings.default_participant);
    println!("  Mock fallback:       {}", settings.mock_fallback);
    println!("  Request timeout:     {}s", settings.request_timeout().as_secs());
    println!("  Max tokens:          {}", settings.max_tokens);
    println!("  Temperature:         {}", settings.temperature);
    println!();
    println!("Extraction service:");
    println!(
        "  API key:  {}",
        api.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .map(redact)
            .unwrap_or_else(|| unset(API_KEY_VAR))
    );
    println!(
        "  API base: {}",
        api.api_base.clone().unwrap_or_else(|| unset(API_BASE_VAR))
    );
    println!(
        "  Model:    {}",
        api.model.as_deref().unwrap_or("(service default)")
    );
}
