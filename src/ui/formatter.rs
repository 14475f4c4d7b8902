//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user
//! interaction. Functions here only print; they never read input or touch
//! record state.

use console::style;

use crate::planner::ChangeRecord;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Format and print a non-fatal warning.
pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), message);
}

/// Display the proposed version transition for the whole run.
pub fn display_bump_summary(old_version: &str, new_version: &str) {
    println!("\n{}", style("Proposed Version Change:").bold());
    println!("  From: {}", style(old_version).red());
    println!("  To:   {}", style(new_version).green());
}

/// Display one planned change as a unified mini-diff.
///
/// Shows the file location, the dimmed context lines, and the old/new line
/// pair with `-`/`+` gutters and one-based line numbers.
pub fn display_change(record: &ChangeRecord) {
    println!(
        "\n{}",
        style(format!(
            "{}:{}",
            record.path.display(),
            record.line_idx + 1
        ))
        .bold()
    );

    let before_start = record.line_idx - record.context_before.len();
    for (offset, line) in record.context_before.iter().enumerate() {
        let line_num = before_start + offset + 1;
        println!("  {}", style(format!("{line_num:4} │ {line}")).dim());
    }

    let line_num = record.line_idx + 1;
    println!(
        "{}",
        style(format!("- {line_num:4} │ {}", record.old_line)).red()
    );
    println!(
        "{}",
        style(format!("+ {line_num:4} │ {}", record.new_line)).green()
    );

    for (offset, line) in record.context_after.iter().enumerate() {
        let line_num = record.line_idx + 2 + offset;
        println!("  {}", style(format!("{line_num:4} │ {line}")).dim());
    }
}

/// Display the per-file outcome of a dry run.
pub fn display_dry_run_note(count: usize) {
    println!(
        "\n{} dry run: {count} change(s) planned, nothing written",
        style("→").yellow()
    );
}
