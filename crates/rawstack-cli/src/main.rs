mod commands;
mod progress;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rawstack", about = "Stack raw exposures into a single DNG")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge the raw files in a directory into one stacked DNG
    Stack(commands::stack::StackArgs),
    /// List the raw files that would be stacked
    Info(commands::info::InfoArgs),
    /// Remove temporary files left by an earlier run
    Clean(commands::clean::CleanArgs),
    /// Print or save a default config file
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Stack(args) => commands::stack::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Clean(args) => commands::clean::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
