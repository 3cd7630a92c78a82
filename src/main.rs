use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod garmin;
mod logging;
mod models;
mod sync;
mod workouts;

use commands::{ConfigCommand, ExportCommand, ImportCommand};
use config::Config;

#[derive(Parser)]
#[command(name = "garmin-workouts")]
#[command(version)]
#[command(about = "Import and export Garmin Connect workouts", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Import workout(s) from file(s)
    Import(ImportCommand),

    /// Export all workouts and save into directory
    Export(ExportCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    tracing::subscriber::with_default(logging::subscriber(cli.debug), || {
        execute(cli.command, &config)
    })
}

fn execute(command: Option<Commands>, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Some(Commands::Import(cmd)) => cmd.run(config)?,
        Some(Commands::Export(cmd)) => cmd.run(config)?,
        Some(Commands::Config(cmd)) => cmd.run(config)?,
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
