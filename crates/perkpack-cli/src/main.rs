//! Loads a perks directory into an in-memory catalog and prints what landed
//!
//! Run with: `perkpack [PERKS_ROOT] [--config loader.ron] [--list]`

use anyhow::{Context, Result};
use clap::Parser;
use perkpack_core::Catalog;
use perkpack_script::{LoadReport, LoaderConfig, PerkLoader};
use std::path::PathBuf;

/// Load custom perk content packages
#[derive(Parser)]
#[command(name = "perkpack")]
#[command(about = "Load custom perk packages and report the result", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding content packages (overrides the config file)
    perks_root: Option<PathBuf>,

    /// RON loader configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Do not create the perks directory when it is missing
    #[arg(long)]
    no_create: bool,

    /// Print every registered perk
    #[arg(short, long)]
    list: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => LoaderConfig::load(path)
            .with_context(|| format!("reading loader config {}", path.display()))?,
        None => LoaderConfig::default(),
    };
    if let Some(root) = cli.perks_root {
        config.perks_root = root;
    }
    if cli.no_create {
        config.create_root = false;
    }

    let mut catalog = Catalog::new();
    let report = PerkLoader::new(config).load_into(&mut catalog);
    print_report(&report);

    if cli.list {
        for perk in catalog.iter() {
            let modules: Vec<_> = perk.modules().iter().map(|m| m.name().to_string()).collect();
            println!(
                "  {:<24} {:<28} {:?}, cost {}, modules [{}]",
                perk.id().as_str(),
                perk.title(),
                perk.category(),
                perk.cost(),
                modules.join(", ")
            );
        }
    }
    Ok(())
}

fn print_report(report: &LoadReport) {
    println!(
        "{} packages ({} failed), {} perks built ({} failed)",
        report.packages,
        report.failed_packages,
        report.built.len(),
        report.failed_perks
    );
    println!(
        "{} registered, {} duplicates skipped",
        report.registration.registered.len(),
        report.registration.skipped.len()
    );
}
