use std::fmt;
use std::str::FromStr;

use crate::domain::VersionKind;
use crate::error::{Result, VbumpError};

/// Strict three-component version (major.minor.patch, nothing else)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SimpleVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl SimpleVersion {
    /// Create a new simple version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SimpleVersion {
            major,
            minor,
            patch,
        }
    }

    /// Parse a simple version from a string
    ///
    /// The string must be exactly three dot-separated decimal numbers; any
    /// prefix, suffix or extra component is rejected.
    pub fn parse(text: &str) -> Result<Self> {
        let parts: Vec<&str> = text.split('.').collect();
        if parts.len() != 3 {
            return Err(VbumpError::invalid_format(
                VersionKind::Simple,
                text,
                "expected exactly major.minor.patch",
            ));
        }

        let mut components = [0u64; 3];
        for (i, part) in parts.iter().enumerate() {
            let name = ["major", "minor", "patch"][i];
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
                return Err(VbumpError::invalid_format(
                    VersionKind::Simple,
                    text,
                    format!("{name} component '{part}' is not a number"),
                ));
            }
            components[i] = part.parse().map_err(|_| {
                VbumpError::invalid_format(
                    VersionKind::Simple,
                    text,
                    format!("{name} component '{part}' is out of range"),
                )
            })?;
        }

        Ok(SimpleVersion::new(
            components[0],
            components[1],
            components[2],
        ))
    }
}

impl FromStr for SimpleVersion {
    type Err = VbumpError;

    fn from_str(s: &str) -> Result<Self> {
        SimpleVersion::parse(s)
    }
}

impl fmt::Display for SimpleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let v = SimpleVersion::parse("1.2.3").unwrap();
        assert_eq!(v, SimpleVersion::new(1, 2, 3));
    }

    #[test]
    fn test_parse_zero() {
        let v = SimpleVersion::parse("0.0.0").unwrap();
        assert_eq!(v, SimpleVersion::new(0, 0, 0));
    }

    #[test]
    fn test_parse_wrong_arity() {
        assert!(SimpleVersion::parse("1.2").is_err());
        assert!(SimpleVersion::parse("1.2.3.4").is_err());
        assert!(SimpleVersion::parse("1").is_err());
    }

    #[test]
    fn test_parse_rejects_prefix_and_suffix() {
        assert!(SimpleVersion::parse("v1.2.3").is_err());
        assert!(SimpleVersion::parse("1.2.3a1").is_err());
        assert!(SimpleVersion::parse("1.2.3-rc.1").is_err());
        assert!(SimpleVersion::parse(" 1.2.3").is_err());
    }

    #[test]
    fn test_parse_rejects_signs() {
        assert!(SimpleVersion::parse("1.+2.3").is_err());
        assert!(SimpleVersion::parse("-1.2.3").is_err());
    }

    #[test]
    fn test_parse_leading_zeros_canonicalize() {
        // accepted on input, rendered without padding
        let v = SimpleVersion::parse("01.02.03").unwrap();
        assert_eq!(v.to_string(), "1.2.3");
    }

    #[test]
    fn test_display_roundtrip() {
        let v = SimpleVersion::parse("10.20.30").unwrap();
        assert_eq!(v.to_string(), "10.20.30");
        assert_eq!(SimpleVersion::parse(&v.to_string()).unwrap(), v);
    }

    #[test]
    fn test_ordering() {
        let a = SimpleVersion::new(1, 2, 3);
        let b = SimpleVersion::new(1, 3, 0);
        let c = SimpleVersion::new(2, 0, 0);
        assert!(a < b);
        assert!(b < c);
    }
}
