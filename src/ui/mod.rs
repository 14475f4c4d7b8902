//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling

use std::io::{self, Write};

use anyhow::Result;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_bump_summary, display_change, display_dry_run_note, display_error, display_status,
    display_success, display_warning,
};

use crate::planner::ChangeRecord;

/// Prompts user to confirm an action with a yes/no prompt.
///
/// Accepts "y" or "yes" (case-insensitive) as confirmation; default is "no"
/// if user presses Enter.
pub fn confirm_action(prompt: &str) -> Result<bool> {
    print!("{prompt} (y/N): ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}

/// Run the review loop over the planned changes.
///
/// Each record is displayed as a mini-diff and answered with:
/// - `y` (or Enter) - accept this change
/// - `n` - reject this change
/// - `a` - accept this change and all remaining ones
/// - `q` - reject this change and all remaining ones, and abort
///
/// Returns `Ok(false)` when the user aborted; acceptance flags on the
/// records are updated either way.
pub fn review_changes(records: &mut [ChangeRecord]) -> Result<bool> {
    let mut accept_rest = false;

    for idx in 0..records.len() {
        if accept_rest {
            records[idx].accept();
            continue;
        }

        formatter::display_change(&records[idx]);

        print!("\nApply this change? [Y/n/a/q]: ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        match input.trim().to_lowercase().as_str() {
            "" | "y" | "yes" => records[idx].accept(),
            "a" | "all" => {
                records[idx].accept();
                accept_rest = true;
            }
            "q" | "quit" => {
                for record in records[idx..].iter_mut() {
                    record.reject();
                }
                return Ok(false);
            }
            _ => records[idx].reject(),
        }
    }

    Ok(true)
}

/// Accept every record without prompting (used by `--yes`).
pub fn accept_all(records: &mut [ChangeRecord]) {
    for record in records.iter_mut() {
        record.accept();
    }
}
