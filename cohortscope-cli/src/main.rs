//! cohortscope CLI - Command-line interface
//!
//! This binary provides the command-line and terminal dashboard front end to
//! the cohortscope library.

mod commands;
mod error;
mod runner;
mod ui;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use cohortscope::export::ExportFormat;

use commands::auth::AuthCommands;
use commands::build::BuildArgs;
use commands::common::SelectionArgs;
use commands::config::ConfigCommands;
use commands::dashboard::DashboardArgs;
use commands::export::ExportArgs;

#[derive(Parser)]
#[command(name = "cohortscope")]
#[command(version = cohortscope::VERSION)]
#[command(about = "Compare disease and non-disease patient cohorts", long_about = None)]
struct Cli {
    /// Enable debug-level logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one fetch cycle and print counts, age/sex table and statistics
    Build {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Open the interactive terminal dashboard
    Dashboard {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Run one fetch cycle and export the box plot
    Export {
        /// Output format
        #[arg(value_enum)]
        format: ExportKind,

        /// Output file (default: boxplot.<format> in export.directory)
        #[arg(long, short)]
        output: Option<PathBuf>,

        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Manage the local account session
    #[command(subcommand)]
    Auth(AuthCommands),

    /// View or modify configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// List diseases and measurements
    Diseases,

    /// Check that the backend is reachable
    Health,
}

/// Export format selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportKind {
    /// PNG raster image
    Png,
    /// Single-page A4 landscape PDF
    Pdf,
}

impl From<ExportKind> for ExportFormat {
    fn from(kind: ExportKind) -> Self {
        match kind {
            ExportKind::Png => ExportFormat::Png,
            ExportKind::Pdf => ExportFormat::Pdf,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let debug = cli.debug;

    let result = match cli.command {
        Commands::Build { selection } => commands::build::run(BuildArgs { selection, debug }),
        Commands::Dashboard { selection } => {
            commands::dashboard::run(DashboardArgs { selection, debug })
        }
        Commands::Export {
            format,
            output,
            selection,
        } => commands::export::run(ExportArgs {
            format: format.into(),
            output,
            selection,
            debug,
        }),
        Commands::Auth(command) => commands::auth::run(command),
        Commands::Config(command) => commands::config::run(command),
        Commands::Diseases => commands::catalog::run_diseases(debug),
        Commands::Health => commands::catalog::run_health(debug),
    };

    if let Err(e) = result {
        e.exit();
    }
}
