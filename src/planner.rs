//! Change planning - locate a version occurrence in file text and propose a
//! reviewable replacement without touching the file

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::domain::{bump, cast, BumpDirective, OnInvalidVersion, VersionKind, VersionValue};
use crate::error::{Result, VbumpError};

/// Token patterns per dialect, used to fill the `{version}` placeholder of a
/// locator template. Shared read-only grammar tables.
pub const SIMPLE_TOKEN: &str = r"\d+\.\d+\.\d+";
pub const PYTHON_TOKEN: &str = r"(?:\d+!)?\d+(?:\.\d+)*(?:[._-]?(?:alpha|beta|preview|rc|a|b|c)\d+)?(?:[._-]?post\d+)?(?:[._-]?dev\d+)?(?:\+[0-9A-Za-z]+(?:\.[0-9A-Za-z]+)*)?";
pub const SEMVER_TOKEN: &str = r"\d+\.\d+\.\d+(?:-[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)?(?:\+[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)?";
pub const ANY_TOKEN: &str = r"[0-9][0-9A-Za-z!+._-]*";

fn token_pattern(kind: Option<VersionKind>) -> &'static str {
    match kind {
        Some(VersionKind::Simple) => SIMPLE_TOKEN,
        Some(VersionKind::Python) => PYTHON_TOKEN,
        Some(VersionKind::Semver) => SEMVER_TOKEN,
        Some(VersionKind::Any) | None => ANY_TOKEN,
    }
}

/// A kind-aware pattern identifying where the version token sits in a file
#[derive(Debug, Clone)]
pub struct Locator {
    regex: Regex,
}

impl Locator {
    /// Build a locator from a search template
    ///
    /// The template is literal text containing the `{version}` placeholder
    /// (e.g. `version = "{version}"`); the placeholder is replaced by the
    /// version-token pattern of the target's kind.
    pub fn from_template(template: &str, kind: Option<VersionKind>) -> Result<Self> {
        if !template.contains("{version}") {
            return Err(VbumpError::config(format!(
                "search pattern '{template}' must contain the {{version}} placeholder"
            )));
        }

        let escaped = regex::escape(template);
        let pattern = escaped.replace(
            r"\{version\}",
            &format!("({})", token_pattern(kind)),
        );
        let regex = Regex::new(&pattern)
            .map_err(|e| VbumpError::config(format!("invalid search pattern '{template}': {e}")))?;

        Ok(Locator { regex })
    }

    /// Build a locator matching exact occurrences of a known version text
    ///
    /// Occurrences embedded in a longer version-like token (e.g. `1.2.3`
    /// inside `11.2.34`) are not matched.
    pub fn literal(version: &str) -> Result<Self> {
        let pattern = format!(
            "(?:^|[^0-9A-Za-z.])({})(?:$|[^0-9A-Za-z.])",
            regex::escape(version)
        );
        let regex = Regex::new(&pattern)
            .map_err(|e| VbumpError::config(format!("invalid version text '{version}': {e}")))?;
        Ok(Locator { regex })
    }

    /// Resolve the locator against file content
    ///
    /// Exactly one canonical version site per file is assumed: zero matches
    /// fail with `VersionNotFound`, textually distinct candidates fail with
    /// `AmbiguousMatch`, and identical repeats resolve to the first
    /// occurrence.
    pub fn locate(&self, content: &str, path: &Path) -> Result<Occurrence> {
        let mut candidates = Vec::new();
        for caps in self.regex.captures_iter(content) {
            if let Some(m) = caps.get(1) {
                candidates.push(Occurrence {
                    start: m.start(),
                    end: m.end(),
                    text: m.as_str().to_string(),
                });
            }
        }

        let first = match candidates.first() {
            Some(first) => first,
            None => {
                return Err(VbumpError::VersionNotFound {
                    path: path.to_path_buf(),
                })
            }
        };

        if let Some(other) = candidates.iter().find(|c| c.text != first.text) {
            return Err(VbumpError::AmbiguousMatch {
                path: path.to_path_buf(),
                first: first.text.clone(),
                second: other.text.clone(),
            });
        }

        Ok(first.clone())
    }
}

/// A located version occurrence within file content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Review state of a planned change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Acceptance {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

/// A proposed, unapplied edit replacing one version occurrence
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeRecord {
    pub path: PathBuf,
    /// Zero-based index of the line holding the occurrence
    pub line_idx: usize,
    /// The matched version text
    pub old_text: String,
    /// The replacement version text
    pub new_text: String,
    pub old_value: VersionValue,
    pub new_value: VersionValue,
    pub old_line: String,
    pub new_line: String,
    pub context_before: Vec<String>,
    pub context_after: Vec<String>,
    pub accepted: Acceptance,
}

impl ChangeRecord {
    pub fn accept(&mut self) {
        self.accepted = Acceptance::Accepted;
    }

    pub fn reject(&mut self) {
        self.accepted = Acceptance::Rejected;
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted == Acceptance::Accepted
    }
}

/// Plan the edit for one file
///
/// Locates the current version occurrence, resolves its kind (declared, or
/// inferred from the matched text), parses it (falling back to a cast from
/// opaque text under the `Cast` policy), bumps it, and captures the
/// surrounding context. The content is only read, never modified.
#[allow(clippy::too_many_arguments)]
pub fn plan_change(
    path: &Path,
    content: &str,
    locator: &Locator,
    declared: Option<VersionKind>,
    directive: &BumpDirective,
    policy: OnInvalidVersion,
    context_lines: usize,
) -> Result<ChangeRecord> {
    let occurrence = locator.locate(content, path)?;

    let kind = declared.unwrap_or_else(|| VersionValue::infer_kind(&occurrence.text));
    let old_value = match VersionValue::parse(&occurrence.text, kind) {
        Ok(value) => value,
        Err(err) => match policy {
            OnInvalidVersion::Error => return Err(err),
            OnInvalidVersion::Cast => {
                cast(&VersionValue::parse_inferred(&occurrence.text), kind)?
            }
        },
    };

    let new_value = bump(&old_value, directive, policy)?;
    let new_text = new_value.to_string();

    // Rebuild the affected line around the exact match column.
    let line_start = content[..occurrence.start]
        .rfind('\n')
        .map_or(0, |pos| pos + 1);
    let line_idx = content[..occurrence.start].matches('\n').count();

    let lines: Vec<&str> = content.lines().collect();
    let old_line = lines
        .get(line_idx)
        .map(|line| line.to_string())
        .unwrap_or_default();

    let col = occurrence.start - line_start;
    let mut new_line = String::with_capacity(old_line.len());
    new_line.push_str(&old_line[..col]);
    new_line.push_str(&new_text);
    new_line.push_str(&old_line[col + occurrence.text.len()..]);

    let before_start = line_idx.saturating_sub(context_lines);
    let after_end = (line_idx + 1 + context_lines).min(lines.len());
    let context_before = lines[before_start..line_idx]
        .iter()
        .map(|line| line.to_string())
        .collect();
    let context_after = lines[(line_idx + 1).min(lines.len())..after_end]
        .iter()
        .map(|line| line.to_string())
        .collect();

    Ok(ChangeRecord {
        path: path.to_path_buf(),
        line_idx,
        old_text: occurrence.text,
        new_text,
        old_value,
        new_value,
        old_line,
        new_line,
        context_before,
        context_after,
        accepted: Acceptance::Pending,
    })
}
