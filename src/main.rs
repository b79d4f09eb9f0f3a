use clap::Parser;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

mod artifacts;
mod config;
mod config_loader;
mod orchestrator;
mod resolver;
mod utils;

/// Topology compiler for hub-and-spoke virtual network deployments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the hub declaration document (YAML or JSON)
    #[arg(short, long)]
    config: PathBuf,

    /// Output directory for the derived topology document
    #[arg(short, long, default_value = "hub_output")]
    output: PathBuf,

    /// Validate the declaration document without generating output
    #[arg(long)]
    check: bool,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Starting hubnet topology compiler");
    info!("Declaration document: {:?}", args.config);

    // Load and validate the declaration document
    let config = config_loader::load_config(&args.config)?;

    if args.check {
        info!("Declaration document is valid");
        return Ok(());
    }

    info!("Output directory: {:?}", args.output);

    // Derive the topology and write the artifact document
    let topology_path = orchestrator::generate_topology(&config, &args.output)?;

    info!("Generated topology document: {:?}", topology_path);
    info!("Topology resolution completed successfully");
    Ok(())
}
