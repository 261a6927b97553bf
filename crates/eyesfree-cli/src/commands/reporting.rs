use anyhow::{Context, Result};
use colored::Colorize;
use eyesfree_exec::Invocation;
use serde_json::Value;

/// Print a cyan banner with `title`.
pub(crate) fn print_banner(title: &str) {
    let rule = "=".repeat(title.len() + 4);
    println!("{}", rule.cyan());
    println!("{}", format!("  {}", title).cyan());
    println!("{}", rule.cyan());
    println!();
}

/// Print a bold label followed by a value.
pub(crate) fn print_field(label: &str, value: impl std::fmt::Display) {
    println!("{} {}", label.blue().bold(), value);
}

/// Print an invocation the way it would be typed.
pub(crate) fn print_invocation(invocation: &Invocation) {
    println!("     {}", invocation.to_string().dimmed());
}

/// Print a JSON value to stdout.
pub(crate) fn print_json(value: &Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize JSON output")?;
    println!("{}", text);
    Ok(())
}

/// Process exit status for a failed external command.
///
/// Codes outside 1..=255, and deaths by signal, map to 1.
pub(crate) fn exit_status_byte(code: Option<i32>) -> u8 {
    code.and_then(|c| u8::try_from(c).ok())
        .filter(|c| *c != 0)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_status_byte() {
        assert_eq!(exit_status_byte(Some(3)), 3);
        assert_eq!(exit_status_byte(Some(255)), 255);
        assert_eq!(exit_status_byte(Some(256)), 1);
        assert_eq!(exit_status_byte(Some(-1)), 1);
        assert_eq!(exit_status_byte(Some(0)), 1);
        assert_eq!(exit_status_byte(None), 1);
    }
}
