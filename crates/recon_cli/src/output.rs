use anyhow::Result;
use colored::*;
use recon_core::StageReport;
use serde_json::json;

pub fn print_stage_report(report: &StageReport, format: &str) -> Result<()> {
    match format {
        "json" => print_json_report(report),
        _ => {
            print_text_report(report);
            Ok(())
        }
    }
}

fn print_text_report(report: &StageReport) {
    println!("\n{}", "═".repeat(60));
    println!("{}", "  RECONCILIATION REPORT".bold());
    println!("{}", "═".repeat(60));

    if report.passed {
        println!(
            "\n{} {}",
            "✓".green().bold(),
            "Reconciliation PASSED".green().bold()
        );
    } else {
        println!(
            "\n{} {}",
            "✗".red().bold(),
            "Reconciliation FAILED".red().bold()
        );
    }

    if !report.errors.is_empty() {
        println!("\n{}", "Errors:".red().bold());
        for (i, error) in report.errors.iter().enumerate() {
            println!("  {}. {}", i + 1, error.red());
        }
    }

    if !report.warnings.is_empty() {
        println!("\n{}", "Warnings:".yellow().bold());
        for (i, warning) in report.warnings.iter().enumerate() {
            println!("  {}. {}", i + 1, warning.yellow());
        }
    }

    let stats = &report.stats;
    println!("\n{}", "Summary:".bold());
    println!("  Reference rows:   {}", stats.reference_rows);
    println!("  Candidate rows:   {}", stats.candidate_rows);
    println!("  Columns compared: {}", stats.columns_compared);
    println!("  Mismatched rows:  {}", stats.mismatched_rows);
    println!("  Checks run:       {}", stats.checks_run);
    println!("{}", "═".repeat(60));
}

fn print_json_report(report: &StageReport) -> Result<()> {
    let output = json!({
        "passed": report.passed,
        "errors": report.errors,
        "warnings": report.warnings,
        "summary": report.stats,
        "error_count": report.errors.len(),
        "warning_count": report.warnings.len(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_failure(message: &str) {
    println!("{} {}", "✗".red().bold(), message.red());
}

pub fn print_warning(message: &str) {
    println!("{} {}", "!".yellow().bold(), message.yellow());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}
