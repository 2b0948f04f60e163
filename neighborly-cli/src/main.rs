//! Neighborly CLI - Command-line interface
//!
//! Filters geotagged items to a neighborhood around a center point using the
//! neighborly library.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::filter::FilterArgs;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "neighborly")]
#[command(version, about = "Neighborhood-range filtering for geotagged items", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show items within a range tier of a center, nearest first
    Filter(FilterArgs),

    /// List the available range tiers
    Ranges,

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let runner = CliRunner::new()?;

    match cli.command {
        Commands::Filter(args) => commands::filter::run(&runner, args),
        Commands::Ranges => {
            commands::ranges::run(&runner);
            Ok(())
        }
        Commands::Config { command } => commands::config::run(&runner, command),
    }
}
