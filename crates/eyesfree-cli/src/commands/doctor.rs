//! Doctor command implementation
//!
//! Checks that the external tools can be found and the working directory
//! is writable.

use anyhow::Result;
use colored::Colorize;
use eyesfree_exec::{Tool, ToolLocator};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

/// Run the doctor command
///
/// Checks:
/// - Version information
/// - adb, say and sox resolution
/// - Working directory permissions
///
/// # Returns
/// Exit code: 0 if all required checks pass, 1 otherwise. A missing tool is
/// only a warning since each subcommand needs a different subset.
pub fn run() -> Result<ExitCode> {
    println!("{}", "eyesfree Doctor".cyan().bold());
    println!("{}", "===============".cyan());
    println!();

    let mut all_ok = true;

    println!("{}", "Versions:".bold());
    println!(
        "  {} eyesfree-cli v{}",
        "->".green(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("{}", "Tools:".bold());
    let locator = ToolLocator::new();
    let mut missing = 0;
    for tool in Tool::ALL {
        match check_tool(&locator, tool) {
            ToolStatus::Found(path) => {
                println!("  {} {} ({})", "ok".green(), tool, path.display());
            }
            ToolStatus::NotFound => {
                missing += 1;
                println!("  {} {} not found", "!!".yellow(), tool);
                println!("     {}", tool.purpose().dimmed());
                println!(
                    "     {}",
                    format!("Put it on PATH or set {}.", tool.env_var()).dimmed()
                );
            }
        }
    }
    println!();

    println!("{}", "Permissions:".bold());
    match env::current_dir() {
        Ok(dir) => {
            let test_file = dir.join(".eyesfree_write_test");
            match std::fs::write(&test_file, "test") {
                Ok(_) => {
                    let _ = std::fs::remove_file(&test_file);
                    println!(
                        "  {} Current directory is writable ({})",
                        "ok".green(),
                        dir.display()
                    );
                }
                Err(e) => {
                    println!("  {} Cannot write to current directory: {}", "!!".red(), e);
                    all_ok = false;
                }
            }
        }
        Err(e) => {
            println!("  {} Cannot determine current directory: {}", "!!".red(), e);
            all_ok = false;
        }
    }
    println!();

    if !all_ok {
        println!(
            "{} Some checks failed. See above for details.",
            "WARNING".yellow().bold()
        );
        return Ok(ExitCode::from(1));
    }

    if missing == 0 {
        println!("{} All checks passed!", "SUCCESS".green().bold());
    } else {
        println!(
            "{} {} tool(s) missing; the commands that need them will fail.",
            "SUCCESS".green().bold(),
            missing
        );
    }
    Ok(ExitCode::SUCCESS)
}

enum ToolStatus {
    Found(PathBuf),
    NotFound,
}

fn check_tool(locator: &ToolLocator, tool: Tool) -> ToolStatus {
    locator
        .locate(tool)
        .map_or(ToolStatus::NotFound, ToolStatus::Found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_tool_uses_override() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("sox");
        std::fs::write(&fake, "").unwrap();

        let locator = ToolLocator::new().with_override(Tool::Sox, &fake);
        match check_tool(&locator, Tool::Sox) {
            ToolStatus::Found(path) => assert_eq!(path, fake),
            ToolStatus::NotFound => panic!("expected override to resolve"),
        }
    }
}
