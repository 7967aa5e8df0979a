use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

mod scaffold;

/// Dashmux - combine multiple dashboard apps on a single server.
#[derive(Parser)]
#[command(name = "dashmux")]
#[command(about = "Dashmux - combine multiple dashboard apps on a single server")]
#[command(version)]
struct Cli {
    /// Enable verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Silence everything below errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Force colored output
    #[arg(long, global = true, conflicts_with = "no_color")]
    color: bool,

    /// Disable colored output (default is auto-detect)
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new dashmux project skeleton
    New {
        /// Directory to create the project in
        project_directory: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let color = if cli.color {
        Some(true)
    } else if cli.no_color {
        Some(false)
    } else {
        None
    };
    dashmux_bootstrap::logging::init_cli_logging(cli.verbose, cli.quiet, color);

    match cli.command {
        Commands::New { project_directory } => scaffold::new_project(&project_directory),
    }
}
