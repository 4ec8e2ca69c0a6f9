//! Gridsheet - A grid editor with range formulas and a TUI

mod config;
#[cfg(feature = "tui")]
mod tui;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use gridsheet_core::{CellRef, Document};
use gridsheet_engine::engine::{evaluate, parse_formula};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "gridsheet",
    version,
    about = "Terminal grid editor with range formulas, undo/redo and CSV import/export."
)]
struct Cli {
    /// CSV file to open (imported at start; `:w` saves back to it)
    file: Option<PathBuf>,

    /// Number of columns (1-26)
    #[arg(long)]
    cols: Option<usize>,

    /// Initial number of rows
    #[arg(long)]
    rows: Option<usize>,

    /// Load settings from this TOML file instead of the user config
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Export to CSV file (non-interactive)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Evaluate a formula such as "SUM(A1:A5)" and print the result (non-interactive)
    #[arg(short = 'c', long, value_name = "FORMULA")]
    command: Option<String>,

    /// Write the --command result into this cell
    #[arg(long, value_name = "CELL", requires = "command")]
    at: Option<String>,

    /// Write logs to this file (filter with GRIDSHEET_LOG, default "debug")
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let filter =
        EnvFilter::try_from_env("GRIDSHEET_LOG").unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Run `--command` (and optional `--at`) against the document.
/// Returns the text to print.
fn run_command(doc: &mut Document, formula: &str, at: Option<&str>) -> Result<String> {
    let Some(at) = at else {
        let parsed = parse_formula(formula)?;
        return Ok(evaluate(&doc.grid, &parsed).display());
    };

    let target = CellRef::from_str(at).ok_or_else(|| anyhow!("Invalid cell reference: {}", at))?;
    if !doc.select(target) {
        bail!("Cell {} is outside the grid", target);
    }
    match doc.apply_formula(formula)? {
        Some(result) => Ok(result.display()),
        None => bail!("Empty formula"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let (mut config, warnings) = config::load_config(cli.config.as_deref());
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }
    if let Some(cols) = cli.cols {
        config.document.cols = cols;
    }
    if let Some(rows) = cli.rows {
        config.document.rows = rows;
    }

    let mut doc = Document::with_file(cli.file.clone(), &config.document)?;
    tracing::info!(
        cols = doc.grid.num_cols(),
        rows = doc.grid.row_count(),
        file = ?doc.file_path,
        "document ready"
    );

    if cli.command.is_some() || cli.output.is_some() {
        if let Some(formula) = cli.command.as_deref() {
            println!("{}", run_command(&mut doc, formula, cli.at.as_deref())?);
        }
        if let Some(output_path) = cli.output.as_deref() {
            doc.export_csv_file(output_path)?;
            eprintln!("Exported to {}", output_path.display());
        }
        return Ok(());
    }

    run_interactive(doc, &config)
}

#[cfg(feature = "tui")]
fn run_interactive(doc: Document, config: &config::Config) -> Result<()> {
    let mut app = tui::App::new(doc, config.col_width);
    tui::run(&mut app)?;
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_interactive(_doc: Document, _config: &config::Config) -> Result<()> {
    bail!("Built without the `tui` feature; use --command or --output")
}
