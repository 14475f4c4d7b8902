//! Pre-release stages and semver pre-release identifier handling
//!
//! The stage ladder (alpha < beta < rc) is shared by the Python and Semver
//! grammars; the identifier helpers operate on the dot-separated pre-release
//! sequences of `semver::Version`.

use std::fmt;

use crate::error::{Result, VbumpError};
use crate::domain::VersionKind;

/// Pre-release stage (alpha, beta or release candidate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PreStage {
    Alpha,
    Beta,
    Rc,
}

impl PreStage {
    /// Parse a stage from any accepted spelling
    ///
    /// Accepts the PEP 440 spellings (`a`, `alpha`, `b`, `beta`, `c`, `rc`,
    /// `preview`) as well as the semver identifier names.
    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "a" | "alpha" => Some(PreStage::Alpha),
            "b" | "beta" => Some(PreStage::Beta),
            "c" | "rc" | "preview" => Some(PreStage::Rc),
            _ => None,
        }
    }

    /// Full identifier name, as used in semver pre-release sequences
    pub fn label(&self) -> &'static str {
        match self {
            PreStage::Alpha => "alpha",
            PreStage::Beta => "beta",
            PreStage::Rc => "rc",
        }
    }
}

impl fmt::Display for PreStage {
    /// Canonical PEP 440 suffix form (`a`, `b`, `rc`)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreStage::Alpha => write!(f, "a"),
            PreStage::Beta => write!(f, "b"),
            PreStage::Rc => write!(f, "rc"),
        }
    }
}

/// Returns true if the identifier is purely numeric
pub fn is_numeric(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_digit())
}

/// Split a semver pre-release string into its dot-separated identifiers
pub fn identifiers(pre: &semver::Prerelease) -> Vec<String> {
    if pre.is_empty() {
        Vec::new()
    } else {
        pre.as_str().split('.').map(str::to_string).collect()
    }
}

/// Build a `Prerelease` from a sequence of identifiers
///
/// An empty sequence yields `Prerelease::EMPTY`.
pub fn prerelease_from_ids(ids: &[String]) -> Result<semver::Prerelease> {
    if ids.is_empty() {
        return Ok(semver::Prerelease::EMPTY);
    }
    let joined = ids.join(".");
    semver::Prerelease::new(&joined).map_err(|e| {
        VbumpError::invalid_format(VersionKind::Semver, joined, e.to_string())
    })
}

/// Detect a leading stage pair (`["alpha", "1", ...]`) in an identifier
/// sequence
///
/// A bare stage identifier with no number counts as iteration 0, so that the
/// next same-stage bump yields 1.
pub fn stage_of(ids: &[String]) -> Option<(PreStage, u64)> {
    let stage = PreStage::from_label(ids.first()?)?;
    let n = match ids.get(1) {
        Some(id) if is_numeric(id) => id.parse().ok()?,
        _ => 0,
    };
    Some((stage, n))
}

/// Split trailing `post`/`dev` identifier pairs off a sequence
///
/// Returns the remaining prefix and the post/dev numbers, if present. The
/// pairs are recognized from the end, `dev` innermost, matching the order in
/// which casting appends them.
pub fn split_trailing(ids: &[String]) -> (Vec<String>, Option<u64>, Option<u64>) {
    let mut prefix = ids.to_vec();
    let mut post = None;
    let mut dev = None;

    if let Some(n) = trailing_pair(&prefix, "dev") {
        dev = Some(n);
        prefix.truncate(prefix.len() - 2);
    }
    if let Some(n) = trailing_pair(&prefix, "post") {
        post = Some(n);
        prefix.truncate(prefix.len() - 2);
    }

    (prefix, post, dev)
}

fn trailing_pair(ids: &[String], name: &str) -> Option<u64> {
    if ids.len() < 2 {
        return None;
    }
    let (label, number) = (&ids[ids.len() - 2], &ids[ids.len() - 1]);
    if label == name && is_numeric(number) {
        number.parse().ok()
    } else {
        None
    }
}
