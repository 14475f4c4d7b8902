use std::path::PathBuf;

use thiserror::Error;

use crate::domain::VersionKind;

/// Unified error type for vbump operations
#[derive(Error, Debug)]
pub enum VbumpError {
    #[error("Invalid {kind} version '{text}': {reason}")]
    InvalidFormat {
        kind: VersionKind,
        text: String,
        reason: String,
    },

    #[error("Cannot cast '{text}' to {target}: {reason}")]
    UncastableValue {
        text: String,
        target: VersionKind,
        reason: String,
    },

    #[error("Directive '{directive}' is not supported for {kind} versions")]
    UnsupportedDirective {
        directive: String,
        kind: VersionKind,
    },

    #[error("Version '{0}' has no pre-release, post or dev segment to release")]
    AlreadyReleased(String),

    #[error("No version occurrence found in {}", path.display())]
    VersionNotFound { path: PathBuf },

    #[error("Ambiguous version occurrences in {}: '{first}' vs '{second}'", path.display())]
    AmbiguousMatch {
        path: PathBuf,
        first: String,
        second: String,
    },

    #[error("Versions of kind {0} have no ordering")]
    Unorderable(VersionKind),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Hook error: {0}")]
    Hook(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in vbump
pub type Result<T> = std::result::Result<T, VbumpError>;

impl VbumpError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        VbumpError::Config(msg.into())
    }

    /// Create a hook error with context
    pub fn hook(msg: impl Into<String>) -> Self {
        VbumpError::Hook(msg.into())
    }

    /// Create an invalid-format error for a kind and input text
    pub fn invalid_format(
        kind: VersionKind,
        text: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        VbumpError::InvalidFormat {
            kind,
            text: text.into(),
            reason: reason.into(),
        }
    }

    /// Create an uncastable-value error for a target kind
    pub fn uncastable(
        text: impl Into<String>,
        target: VersionKind,
        reason: impl Into<String>,
    ) -> Self {
        VbumpError::UncastableValue {
            text: text.into(),
            target,
            reason: reason.into(),
        }
    }
}
