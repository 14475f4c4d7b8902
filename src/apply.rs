//! Applying accepted change records to disk
//!
//! Each file write is an independent, non-transactional operation; the
//! content rewrite itself is pure and re-verifies the record against the
//! current file text before anything is written.

use std::fs;

use crate::error::{Result, VbumpError};
use crate::planner::ChangeRecord;

/// Rewrite file content according to a record
///
/// Replaces the recorded line and preserves the presence or absence of a
/// trailing newline. Fails with `VersionNotFound` when the recorded old line
/// is no longer at the recorded position (the file drifted since planning).
pub fn apply_to_content(content: &str, record: &ChangeRecord) -> Result<String> {
    let lines: Vec<&str> = content.lines().collect();

    match lines.get(record.line_idx) {
        Some(line) if *line == record.old_line => {}
        _ => {
            return Err(VbumpError::VersionNotFound {
                path: record.path.clone(),
            })
        }
    }

    let updated: Vec<&str> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i == record.line_idx {
                record.new_line.as_str()
            } else {
                *line
            }
        })
        .collect();

    let mut output = updated.join("\n");
    if content.ends_with('\n') {
        output.push('\n');
    }
    Ok(output)
}

/// Apply one accepted record to its file
pub fn apply_record(record: &ChangeRecord) -> Result<()> {
    let content = fs::read_to_string(&record.path)?;
    let updated = apply_to_content(&content, record)?;
    fs::write(&record.path, updated)?;
    Ok(())
}
