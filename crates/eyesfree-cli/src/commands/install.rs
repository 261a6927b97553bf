//! Install command implementation
//!
//! Installs every package in a directory onto the connected device.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use eyesfree_exec::{SystemRunner, Tool, ToolLocator};
use eyesfree_installer::{InstallEvent, Installer, InstallerConfig, DEFAULT_SOURCE_DIR};
use serde_json::json;
use std::process::ExitCode;

use super::reporting::{print_banner, print_field, print_invocation, print_json};

#[derive(Debug, Args)]
pub struct InstallArgs {
    /// Directory containing the packages
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_SOURCE_DIR)]
    pub source_dir: String,

    /// Target device serial (passed to adb -s)
    #[arg(short = 'S', long)]
    pub serial: Option<String>,

    /// Only install files with this extension (e.g. apk)
    #[arg(short, long)]
    pub extension: Option<String>,

    /// Do not pass -r (fail on packages that are already installed)
    #[arg(long)]
    pub no_reinstall: bool,

    /// Path to the adb executable (default: ADB_PATH, PATH, Android SDK)
    #[arg(long, value_name = "PATH")]
    pub adb: Option<String>,

    /// Print the commands without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Output machine-readable JSON (no colored output)
    #[arg(long)]
    pub json: bool,
}

impl InstallArgs {
    fn config(&self) -> InstallerConfig {
        let mut config =
            InstallerConfig::with_source_dir(&self.source_dir).reinstall(!self.no_reinstall);
        if let Some(ref serial) = self.serial {
            config = config.serial(serial);
        }
        if let Some(ref extension) = self.extension {
            config = config.extension(extension);
        }
        config
    }
}

/// Run the install command
///
/// # Returns
/// Exit code 0 whether or not individual packages failed to install. Only a
/// missing package directory or an unusable adb is an error.
pub fn run(args: InstallArgs) -> Result<ExitCode> {
    let locator = ToolLocator::new().with_optional_override(Tool::Adb, args.adb.as_deref());
    let adb = if args.dry_run {
        locator.locate_or_name(Tool::Adb)
    } else {
        locator.locate(Tool::Adb)?
    };
    let installer = Installer::new(args.config(), adb);

    if args.dry_run {
        let plan = installer
            .plan()
            .with_context(|| format!("Failed to list packages in {}", args.source_dir))?;
        if args.json {
            let commands: Vec<String> = plan.iter().map(|i| i.to_string()).collect();
            print_json(&json!({ "dry_run": true, "commands": commands }))?;
        } else {
            for invocation in &plan {
                println!("{}", invocation);
            }
        }
        return Ok(ExitCode::SUCCESS);
    }

    if !args.json {
        print_banner("eyesfree Batch Installer");
        print_field("Package directory:", &args.source_dir);
        print_field("Device bridge:", installer.adb().display());
        println!();
    }

    let runner = SystemRunner::new().stdout_to_stderr(args.json);
    let report = installer
        .install_all_with(&runner, |event| {
            if args.json {
                return;
            }
            match event {
                InstallEvent::Started {
                    index,
                    total,
                    package,
                } => {
                    println!(
                        "{} [{}/{}] {}",
                        "->".green(),
                        index + 1,
                        total,
                        package.display()
                    );
                    print_invocation(&installer.invocation_for(package));
                }
                InstallEvent::Finished(result) => {
                    if result.success {
                        println!("  {} installed", "ok".green());
                    } else {
                        let status = result
                            .exit_code
                            .map(|c| format!("exit status {}", c))
                            .unwrap_or_else(|| "terminated by signal".to_string());
                        println!("  {} install failed ({})", "!!".red(), status);
                    }
                }
            }
        })
        .with_context(|| format!("Batch install from {} failed", args.source_dir))?;

    if args.json {
        print_json(&serde_json::to_value(&report).context("Failed to serialize report")?)?;
        return Ok(ExitCode::SUCCESS);
    }

    println!();
    if report.failed == 0 {
        println!(
            "{} {} package(s) installed",
            "SUCCESS".green().bold(),
            report.succeeded
        );
    } else {
        println!(
            "{} {} of {} package(s) failed to install",
            "WARNING".yellow().bold(),
            report.failed,
            report.attempted
        );
    }

    Ok(ExitCode::SUCCESS)
}
