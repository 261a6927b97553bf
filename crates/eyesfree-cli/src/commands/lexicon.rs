//! Lexicon command implementation
//!
//! Synthesizes the spoken vocabulary clips with `say` and `sox`.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use eyesfree_exec::{SystemRunner, Tool, ToolLocator};
use eyesfree_lexicon::builder::{DEFAULT_EXTENSION, DEFAULT_RATE};
use eyesfree_lexicon::{BuildEvent, LexiconBuilder, LexiconConfig, LexiconError};
use serde_json::json;
use std::path::Path;
use std::process::ExitCode;

use super::reporting::{exit_status_byte, print_banner, print_field, print_invocation, print_json};

/// Placeholder shown for the scratch directory in dry-run output.
const SCRATCH_PLACEHOLDER: &str = "<scratch>";

#[derive(Debug, Args)]
pub struct LexiconArgs {
    /// Directory the clips are written to
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub out_dir: String,

    /// Output file extension; sox picks the format from it
    #[arg(short, long, value_name = "EXT", default_value = DEFAULT_EXTENSION)]
    pub format: String,

    /// Speaking rate in words per minute
    #[arg(short, long, default_value_t = DEFAULT_RATE)]
    pub rate: u32,

    /// Regenerate clips that already exist
    #[arg(long)]
    pub force: bool,

    /// Only build this entry (repeatable), e.g. --only "caps lock" --only 5
    #[arg(long, value_name = "TEXT")]
    pub only: Vec<String>,

    /// List the entries and their file names, then exit
    #[arg(long)]
    pub list: bool,

    /// Path to the say executable (default: SAY_PATH, PATH)
    #[arg(long, value_name = "PATH")]
    pub say: Option<String>,

    /// Path to the sox executable (default: SOX_PATH, PATH)
    #[arg(long, value_name = "PATH")]
    pub sox: Option<String>,

    /// Print the commands without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Output machine-readable JSON (no colored output)
    #[arg(long)]
    pub json: bool,
}

impl LexiconArgs {
    fn config(&self) -> LexiconConfig {
        LexiconConfig::with_out_dir(&self.out_dir)
            .extension(&self.format)
            .rate(self.rate)
            .force(self.force)
            .only(self.only.iter().cloned())
    }
}

/// Run the lexicon command
///
/// # Returns
/// Exit code 0 on success. If an external command fails, its exit status
/// (or 1 when it has none usable as a process status).
pub fn run(args: LexiconArgs) -> Result<ExitCode> {
    let locator = ToolLocator::new()
        .with_optional_override(Tool::Say, args.say.as_deref())
        .with_optional_override(Tool::Sox, args.sox.as_deref());
    let (say, sox) = if args.dry_run || args.list {
        (
            locator.locate_or_name(Tool::Say),
            locator.locate_or_name(Tool::Sox),
        )
    } else {
        (locator.locate(Tool::Say)?, locator.locate(Tool::Sox)?)
    };
    let builder = LexiconBuilder::new(args.config(), say, sox)?;

    if args.list {
        return list(&builder, args.json);
    }
    if args.dry_run {
        return dry_run(&builder, args.json);
    }

    if !args.json {
        print_banner("eyesfree Lexicon Builder");
        print_field("Output directory:", &args.out_dir);
        print_field("Entries:", builder.lexicon().len());
        print_field("Rate:", format!("{} wpm", args.rate));
        println!();
    }

    let runner = SystemRunner::new().stdout_to_stderr(args.json);
    let result = builder.build_with(&runner, |event| {
        if args.json {
            return;
        }
        match event {
            BuildEvent::Skipped { output, .. } => {
                println!("{} {} (exists)", "--".dimmed(), output.display());
            }
            BuildEvent::Generating {
                index,
                total,
                entry,
                output,
            } => {
                println!(
                    "{} [{}/{}] {:?} -> {}",
                    "->".green(),
                    index + 1,
                    total,
                    entry.text(),
                    output.display()
                );
            }
            BuildEvent::Generated { sample_count, .. } => {
                println!("  {} {} samples", "ok".green(), sample_count);
            }
        }
    });

    let report = match result {
        Ok(report) => report,
        Err(e @ LexiconError::CommandFailed { .. }) => {
            eprintln!("{}: {}", "error".red(), e);
            return Ok(ExitCode::from(exit_status_byte(e.exit_code())));
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to build lexicon in {}", args.out_dir))
        }
    };

    if args.json {
        print_json(&serde_json::to_value(&report).context("Failed to serialize report")?)?;
        return Ok(ExitCode::SUCCESS);
    }

    println!();
    println!(
        "{} {} generated, {} skipped",
        "SUCCESS".green().bold(),
        report.generated,
        report.skipped
    );

    Ok(ExitCode::SUCCESS)
}

fn list(builder: &LexiconBuilder, json: bool) -> Result<ExitCode> {
    if json {
        let entries: Vec<_> = builder
            .lexicon()
            .entries()
            .iter()
            .map(|entry| {
                json!({
                    "text": entry.text(),
                    "kind": entry.kind(),
                    "path": builder.output_path(entry),
                })
            })
            .collect();
        print_json(&json!({ "entries": entries }))?;
        return Ok(ExitCode::SUCCESS);
    }

    for entry in builder.lexicon().entries() {
        println!(
            "{:<16} {}",
            format!("{:?}", entry.text()),
            builder.output_path(entry).display()
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn dry_run(builder: &LexiconBuilder, json: bool) -> Result<ExitCode> {
    let plan = builder.plan(Path::new(SCRATCH_PLACEHOLDER));

    if json {
        let clips: Vec<_> = plan
            .iter()
            .map(|clip| {
                let commands: Vec<String> =
                    clip.invocations.iter().map(|i| i.to_string()).collect();
                json!({
                    "text": clip.entry.text(),
                    "output": clip.output,
                    "skip": clip.invocations.is_empty(),
                    "commands": commands,
                })
            })
            .collect();
        print_json(&json!({ "dry_run": true, "clips": clips }))?;
        return Ok(ExitCode::SUCCESS);
    }

    for clip in &plan {
        if clip.invocations.is_empty() {
            println!("{} {} (exists)", "--".dimmed(), clip.output.display());
            continue;
        }
        println!("{} {}", "->".green(), clip.output.display());
        for invocation in &clip.invocations {
            print_invocation(invocation);
        }
    }
    Ok(ExitCode::SUCCESS)
}
