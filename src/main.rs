//! Ledgergrid - an editable ledger grid in the terminal

use anyhow::{Context, Result};
use clap::Parser;
use ledgergrid::config::load_config;
use ledgergrid::demo::demo_sheet;
use ledgergrid::logging;
use ledgergrid::storage::{parse_sheet, write_csv};
use ledgergrid_core::Grid;
use std::path::PathBuf;

/// Editable ledger grid with live amounts, subtotals and sorting
#[derive(Parser, Debug)]
#[command(name = "ledgergrid")]
#[command(version)]
pub struct Args {
    /// Sheet file to open (.toml); the built-in invoice when omitted
    pub sheet: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Export the sheet to CSV and exit
    #[arg(short = 'o', long, value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// Write logs here instead of the configured or default location
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (config, warnings) = load_config(args.config.as_ref());
    for warning in &warnings {
        eprintln!("Warning: {}", warning);
    }

    let log_path = args
        .log_file
        .clone()
        .or_else(|| config.log_file.clone())
        .or_else(logging::default_log_path);
    if let Some(path) = log_path.as_ref() {
        logging::init(path, &config.log_level)
            .with_context(|| format!("initializing logging at {}", path.display()))?;
    }
    for warning in &warnings {
        tracing::warn!(%warning, "config");
    }

    let sheet = match args.sheet.as_ref() {
        Some(path) => {
            parse_sheet(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => demo_sheet()?,
    };
    tracing::info!(
        sheet = ?args.sheet,
        columns = sheet.columns.len(),
        rows = sheet.rows.len(),
        "sheet loaded"
    );

    let grid = Grid::new(sheet.columns, sheet.rows, config.grid.clone())
        .context("building grid from sheet")?;

    if let Some(output_path) = args.export {
        write_csv(&output_path, grid.columns(), grid.rows())
            .with_context(|| format!("exporting {}", output_path.display()))?;
        println!("Exported to {}", output_path.display());
        return Ok(());
    }

    run_interactive(grid, sheet.title, args.sheet)
}

#[cfg(feature = "tui")]
fn run_interactive(grid: Grid, title: Option<String>, path: Option<PathBuf>) -> Result<()> {
    let mut app = ledgergrid::tui::App::new(grid, title, path);
    ledgergrid::tui::run(&mut app)?;
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_interactive(_grid: Grid, _title: Option<String>, _path: Option<PathBuf>) -> Result<()> {
    anyhow::bail!("built without the `tui` feature; use --export to write CSV")
}
