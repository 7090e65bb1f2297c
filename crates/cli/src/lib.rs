pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "haggle",
    about = "Haggle operator CLI",
    long_about = "Inspect Haggle configuration, run readiness checks, and exercise catalog matching from the command line.",
    after_help = "Examples:\n  haggle doctor --json\n  haggle config\n  haggle search \"red shoes price\""
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, catalog readiness, and outbound sender credentials")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Run a query against the catalog and print the reply the bot would send")]
    Search {
        #[arg(help = "Query text, exactly as a user would type it")]
        query: String,
        #[arg(long, help = "Catalog CSV path, overriding config and environment")]
        catalog: Option<PathBuf>,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
        Command::Search { query, catalog } => commands::search::run(&query, catalog),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
