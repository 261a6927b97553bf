//! eyesfree CLI - Device setup helpers for eyes-free development
//!
//! This binary installs a directory of Android packages onto a device and
//! synthesizes the spoken clips used for keyboard and navigation feedback.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use eyesfree_cli::commands;
use eyesfree_cli::commands::install::InstallArgs;
use eyesfree_cli::commands::lexicon::LexiconArgs;

/// eyesfree - Batch APK installer and speech clip builder
#[derive(Parser)]
#[command(name = "eyesfree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install every package in a directory onto the connected device
    Install(InstallArgs),

    /// Synthesize the spoken vocabulary clips with say and sox
    Lexicon(LexiconArgs),

    /// Check that the external tools are available
    Doctor,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Install(args) => commands::install::run(args),
        Commands::Lexicon(args) => commands::lexicon::run(args),
        Commands::Doctor => commands::doctor::run(),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
