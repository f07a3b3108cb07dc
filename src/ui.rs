//! Leveled, colored status lines for the terminal.

use crate::InstallProgress;
use colored::Colorize;

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    eprintln!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a step indicator
pub fn step(num: usize, total: usize, msg: &str) {
    println!("{} {}", format!("[{}/{}]", num, total).blue().bold(), msg);
}

/// Render a provisioning event.
pub fn progress(event: &InstallProgress) {
    match event {
        InstallProgress::Started { distro, family } => {
            info(&format!(
                "Detected {} ({}), installing Steam",
                distro,
                family.display_name()
            ));
        }
        InstallProgress::StepStarted {
            index,
            total,
            label,
        } => step(*index, *total, label),
        InstallProgress::Retrying {
            command,
            attempt,
            max_attempts,
            delay,
        } => warn(&format!(
            "`{}` failed (attempt {}/{}), retrying in {}s",
            command,
            attempt,
            max_attempts,
            delay.as_secs()
        )),
        InstallProgress::StepSucceeded { label } => success(label),
        InstallProgress::StepUnchanged { label, reason } => {
            dim(&format!("{}: {}", label, reason));
        }
        InstallProgress::StepWarning { message, .. } => warn(message),
        InstallProgress::FallbackStarted { label, fallback } => {
            warn(&format!("{} failed, trying: {}", label, fallback));
        }
        InstallProgress::Verifying => info(event.description()),
        InstallProgress::Completed => success(event.description()),
    }
}
