// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use super::batch::BatchSummary;
use colored::*;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Report a finished export
    pub fn report_export(
        file: &str,
        output: &str,
        polygons: usize,
        scale: f64,
        duration: Duration,
    ) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "Exported:".bold(), file.cyan());
        println!("{}", "━".repeat(80).bright_black());
        println!(
            "  {} {}",
            "Polygons:".bright_black(),
            polygons.to_string().cyan()
        );
        println!("  {} {}", "Scale:".bright_black(), scale.to_string().cyan());
        println!("  {} {}", "Output:".bright_black(), output.cyan());
        println!(
            "  {} {}",
            "Time:".bright_black(),
            Self::format_duration(duration).yellow()
        );
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Report the outcome of a batch export
    pub fn report_batch(summary: &BatchSummary) {
        println!("\n{}", "═".repeat(80).bright_black());
        println!("{}", "Batch Export Summary".bold());
        println!("{}", "═".repeat(80).bright_black());
        println!(
            "  {} {}",
            "Total Scenes:".bright_black(),
            summary.total().to_string().cyan()
        );
        println!(
            "  {} {}",
            "Exported:".bright_black(),
            summary.exported.len().to_string().green()
        );
        let failed = summary.failed.len().to_string();
        println!(
            "  {} {}",
            "Failed:".bright_black(),
            if summary.failed.is_empty() {
                failed.green()
            } else {
                failed.red()
            }
        );
        for (path, error) in &summary.failed {
            println!("    {} {}", "❌".red(), path.display());
            println!("       {}", error.bright_black());
        }
        println!(
            "  {} {}",
            "Time:".bright_black(),
            Self::format_duration(summary.duration).yellow()
        );
        println!("{}", "═".repeat(80).bright_black());
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report warning
    pub fn report_warning(message: &str) {
        eprintln!("\n{} {}", "⚠️  Warning:".yellow().bold(), message);
    }

    /// Report info
    pub fn report_info(message: &str) {
        println!("{} {}", "ℹ️".bright_blue(), message);
    }

    /// Print success message
    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }

    /// Format duration for display
    fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(
            Reporter::format_duration(Duration::from_micros(500)),
            "500µs"
        );
        assert_eq!(
            Reporter::format_duration(Duration::from_millis(5)),
            "5.00ms"
        );
        assert_eq!(Reporter::format_duration(Duration::from_secs(2)), "2.00s");
    }
}
