use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::python::PythonVersion;
use crate::domain::simple::SimpleVersion;
use crate::error::{Result, VbumpError};

/// The supported version dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionKind {
    /// Opaque string, no structure
    Any,
    /// Strict major.minor.patch
    Simple,
    /// PEP 440
    Python,
    /// Semantic Versioning
    Semver,
}

impl fmt::Display for VersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VersionKind::Any => "any",
            VersionKind::Simple => "simple",
            VersionKind::Python => "python",
            VersionKind::Semver => "semver",
        };
        write!(f, "{name}")
    }
}

/// A parsed version value, tagged by its dialect
///
/// Values are immutable; casting and bumping always produce new values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionValue {
    Any(String),
    Simple(SimpleVersion),
    Python(PythonVersion),
    Semver(semver::Version),
}

impl VersionValue {
    /// The dialect this value belongs to
    pub fn kind(&self) -> VersionKind {
        match self {
            VersionValue::Any(_) => VersionKind::Any,
            VersionValue::Simple(_) => VersionKind::Simple,
            VersionValue::Python(_) => VersionKind::Python,
            VersionValue::Semver(_) => VersionKind::Semver,
        }
    }

    /// Parse a version string against a dialect's grammar
    ///
    /// Parsing is strict for every structured kind: partial matches and
    /// trailing characters fail. `Any` accepts every non-empty string
    /// unchanged.
    pub fn parse(text: &str, kind: VersionKind) -> Result<Self> {
        match kind {
            VersionKind::Any => {
                if text.is_empty() {
                    Err(VbumpError::invalid_format(
                        kind,
                        text,
                        "version string is empty",
                    ))
                } else {
                    Ok(VersionValue::Any(text.to_string()))
                }
            }
            VersionKind::Simple => SimpleVersion::parse(text).map(VersionValue::Simple),
            VersionKind::Python => PythonVersion::parse(text).map(VersionValue::Python),
            VersionKind::Semver => semver::Version::parse(text)
                .map(VersionValue::Semver)
                .map_err(|e| VbumpError::invalid_format(kind, text, e.to_string())),
        }
    }

    /// Parse a version string against the strictest grammar that accepts it
    ///
    /// Tries Simple, then Semver, then Python; anything else becomes an
    /// opaque `Any` value.
    pub fn parse_inferred(text: &str) -> Self {
        VersionValue::parse(text, VersionKind::Simple)
            .or_else(|_| VersionValue::parse(text, VersionKind::Semver))
            .or_else(|_| VersionValue::parse(text, VersionKind::Python))
            .unwrap_or_else(|_| VersionValue::Any(text.to_string()))
    }

    /// The dialect `parse_inferred` would choose for a string
    pub fn infer_kind(text: &str) -> VersionKind {
        VersionValue::parse_inferred(text).kind()
    }

    /// Compare two values of the same kind by that kind's precedence rules
    ///
    /// `Any` values and values of different kinds have no ordering and fail
    /// with `Unorderable`. Build metadata (Semver) and the local segment
    /// (Python) are excluded from the comparison.
    pub fn compare(&self, other: &Self) -> Result<Ordering> {
        match (self, other) {
            (VersionValue::Simple(a), VersionValue::Simple(b)) => Ok(a.cmp(b)),
            (VersionValue::Python(a), VersionValue::Python(b)) => Ok(a.cmp_precedence(b)),
            (VersionValue::Semver(a), VersionValue::Semver(b)) => Ok(a.cmp_precedence(b)),
            _ => Err(VbumpError::Unorderable(self.kind())),
        }
    }
}

impl fmt::Display for VersionValue {
    /// Canonical text form of the value
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionValue::Any(s) => write!(f, "{s}"),
            VersionValue::Simple(v) => write!(f, "{v}"),
            VersionValue::Python(v) => write!(f, "{v}"),
            VersionValue::Semver(v) => write!(f, "{v}"),
        }
    }
}
