mod commands;
mod interrupt;
mod logging;
mod progress;
mod report;
mod selection;

use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands};
use data_scourge_core::deletion::delete_selected;
use data_scourge_core::{ScanConfig, ScanEngine, ScanInput, ScanOutcome};
use dotenv::dotenv;
use interrupt::ScanInterrupt;
use progress::CliReporter;
use selection::{parse_selection, prompt_confirm, prompt_line};
use tracing::{error, info};

fn main() {
    dotenv().ok();

    let _guard = logging::init_logger();

    let defaults = match data_scourge_core::config::load_configuration() {
        Ok(defaults) => defaults,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    let result = match args.command {
        Some(Commands::Scan { scan, csv }) => run_scan(scan.apply(defaults), csv.as_deref()),
        Some(Commands::Clean { scan, all, yes }) => run_clean(scan.apply(defaults), all, yes),
        Some(Commands::PrintConfig { scan }) => {
            print_config(&scan.apply(defaults));
            Ok(())
        }
        None => {
            let _ = Cli::command().print_long_help();
            Ok(())
        }
    };

    if let Err(err) = result {
        error!("{:#}", err);
        process::exit(1);
    }
}

fn scan(input: &ScanInput, reporter: &CliReporter) -> Result<ScanOutcome> {
    let config = ScanConfig::from_input(input).context("Invalid scan settings")?;
    let engine = ScanEngine::new(config);
    let _interrupt = ScanInterrupt::install(engine.cancel_token());
    engine.scan(reporter).context("Scan failed")
}

fn run_scan(input: ScanInput, csv: Option<&Path>) -> Result<()> {
    let reporter = CliReporter::new();
    let outcome = scan(&input, &reporter)?;

    println!();
    print!("{}", report::render_scan(&outcome, false));

    if let Some(path) = csv {
        report::write_csv(path, &outcome.records)?;
        info!("Wrote {} records to {}", outcome.records.len(), path.display());
    }

    Ok(())
}

fn run_clean(input: ScanInput, all: bool, yes: bool) -> Result<()> {
    let reporter = CliReporter::new();
    let outcome = scan(&input, &reporter)?;

    println!();
    print!("{}", report::render_scan(&outcome, true));

    let mut records = outcome.records;
    if records.is_empty() {
        return Ok(());
    }

    let indices = if all {
        (0..records.len()).collect()
    } else {
        let answer = prompt_line("\nFiles to delete (e.g. 1,3,5-7 or 'all'; empty keeps everything): ")?;
        parse_selection(&answer, records.len())?
    };

    if indices.is_empty() {
        info!("Nothing selected; no files deleted.");
        return Ok(());
    }

    let question = format!(
        "Permanently delete {} files? This cannot be undone.",
        indices.len()
    );
    if !yes && !prompt_confirm(&question, Some(false))? {
        info!("Deletion cancelled; no files deleted.");
        return Ok(());
    }

    let report = delete_selected(&mut records, &indices, &reporter)?;
    print!("{}", report::render_deletion(&report));
    if !records.is_empty() {
        info!("{} flagged files kept", records.len());
    }

    Ok(())
}

fn print_config(input: &ScanInput) {
    println!("{}", "Scan settings".bold());
    println!("  root:               {}", input.root);
    println!("  min size (MB):      {}", input.min_size_mb);
    println!("  months unused:      {}", input.months_unused);
    println!("  exclude extensions: {}", input.exclude_extensions);
    println!("  exclude names:      {}", input.exclude_names);

    match ScanConfig::from_input(input) {
        Ok(config) => println!(
            "  {} {} bytes, {} extensions, {} name prefixes",
            "valid:".green(),
            config.min_size_bytes,
            config.excluded_extensions.len(),
            config.excluded_name_prefixes.len()
        ),
        Err(err) => println!("  {} {}", "invalid:".red(), err),
    }
}
