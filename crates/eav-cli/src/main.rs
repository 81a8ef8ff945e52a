//! EAV CLI
//!
//! Command-line interface for inspecting EAV model configurations

use clap::{Parser, Subcommand};
use eav_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "eav")]
#[command(about = "EAV - Runtime schema model inspection", long_about = None)]
struct Cli {
    /// Human-readable debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON logs on stderr
    #[arg(long, global = true, conflicts_with = "verbose")]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load a model and report what it contains
    Check(commands::check::CheckArgs),
    /// Show one resolved family
    Describe(commands::describe::DescribeArgs),
    /// Print the family hierarchy
    Tree(commands::tree::TreeArgs),
    /// Humanize a code the way labels fall back to it
    Humanize(commands::humanize::HumanizeArgs),
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        init(Profile::Development);
    } else if cli.log_json {
        init(Profile::Production);
    }

    let result = match cli.command {
        Commands::Check(args) => commands::check::execute(args),
        Commands::Describe(args) => commands::describe::execute(args),
        Commands::Tree(args) => commands::tree::execute(args),
        Commands::Humanize(args) => commands::humanize::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
