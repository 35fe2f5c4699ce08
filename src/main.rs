//! Slab grid plotter - command line entry point
//!
//! Reads `<root>/grids_unmasked` and `<root>/grids_masked` and writes
//! `grids_unmasked.pdf` and `grids_masked.pdf` into the output directory.
//! Without arguments the root is the parent of the working directory and
//! the output directory is the working directory itself.
//!
//! Usage:
//! ```bash
//! cd Bloch2023_rf/scripts
//! slab-grid-plot
//! RUST_LOG=slab_grid_plot=debug slab-grid-plot --root .. --output-dir /tmp
//! ```

use anyhow::Context;
use clap::Parser;
use slab_grid_plot::config::PlotConfig;
use slab_grid_plot::pipeline;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "slab-grid-plot")]
#[command(about = "Plot every grid of the masked and unmasked slab-model folders to PDF")]
struct Cli {
    /// Directory holding grids_unmasked/ and grids_masked/ (default: parent of the working directory)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Directory receiving the PDF documents (default: the working directory)
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slab_grid_plot=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    println!("Slab Grid Plot v{}", env!("CARGO_PKG_VERSION"));

    match run(cli) {
        Ok(()) => println!("\n✓ Done"),
        Err(e) => {
            eprintln!("\n✗ {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = PlotConfig::from_working_dir(cli.root, cli.output_dir)
        .context("Failed to resolve input and output directories")?;

    println!("  Root: {}", config.root.display());
    println!("  Output: {}", config.output_dir.display());

    let reports = pipeline::run(&config).context("Plotting failed")?;

    println!("\nSummary:");
    for report in &reports {
        match &report.output {
            Some(path) => println!(
                "  {}: {} panels -> {}",
                report.group,
                report.panels.len(),
                path.display()
            ),
            None => println!("  {}: no document (fewer than one full row)", report.group),
        }
        if !report.dropped.is_empty() {
            println!("    {} file(s) not plotted", report.dropped.len());
        }
    }

    Ok(())
}
