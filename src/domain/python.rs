//! PEP 440 version handling
//!
//! Covers the subset of PEP 440 used by version manifests: epoch, release,
//! one pre-release tag (a/b/rc), post-release, dev-release and a local
//! segment. Alternate spellings (`alpha`, `beta`, `c`, `preview`) and a
//! single `.`/`-`/`_` separator before suffixes are accepted on input and
//! normalized to the canonical form on output.
//!
//! https://peps.python.org/pep-0440/

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::prerelease::PreStage;
use crate::domain::VersionKind;
use crate::error::{Result, VbumpError};

/// Anchored grammar for the supported PEP 440 subset, compiled once and
/// shared read-only across threads.
static PEP440: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)^
        (?:(?P<epoch>[0-9]+)!)?
        (?P<release>[0-9]+(?:\.[0-9]+)*)
        (?:[._-]?(?P<pre_tag>alpha|beta|preview|rc|a|b|c)(?P<pre_n>[0-9]+))?
        (?:[._-]?post(?P<post>[0-9]+))?
        (?:[._-]?dev(?P<dev>[0-9]+))?
        (?:\+(?P<local>[a-z0-9]+(?:\.[a-z0-9]+)*))?
        $",
    )
    .expect("PEP 440 grammar is valid")
});

/// Parsed PEP 440 version
///
/// Invariants: `release` has at least one component; an epoch of zero is
/// stored as `None`; the local segment never participates in precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonVersion {
    pub epoch: Option<u64>,
    pub release: Vec<u64>,
    pub pre: Option<(PreStage, u64)>,
    pub post: Option<u64>,
    pub dev: Option<u64>,
    pub local: Option<String>,
}

impl PythonVersion {
    /// Parse a PEP 440 version string
    ///
    /// Parsing is strict: the whole string must match the grammar, trailing
    /// characters fail.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = |reason: &str| VbumpError::invalid_format(VersionKind::Python, text, reason);

        if text.is_empty() {
            return Err(invalid("version string is empty"));
        }

        let lowered = text.to_lowercase();
        let caps = PEP440
            .captures(&lowered)
            .ok_or_else(|| invalid("does not match the PEP 440 grammar"))?;

        let number = |name: &str| -> Result<Option<u64>> {
            caps.name(name)
                .map(|m| {
                    m.as_str()
                        .parse::<u64>()
                        .map_err(|_| invalid(&format!("{name} number is out of range")))
                })
                .transpose()
        };

        // An explicit zero epoch normalizes away, so `0!1.2` == `1.2`.
        let epoch = number("epoch")?.filter(|&e| e != 0);

        let release = caps["release"]
            .split('.')
            .map(|part| {
                part.parse::<u64>()
                    .map_err(|_| invalid("release component is out of range"))
            })
            .collect::<Result<Vec<u64>>>()?;

        let pre = match caps.name("pre_tag") {
            Some(tag) => {
                let stage = PreStage::from_label(tag.as_str())
                    .ok_or_else(|| invalid("unknown pre-release tag"))?;
                let n = number("pre_n")?.unwrap_or(0);
                Some((stage, n))
            }
            None => None,
        };

        Ok(PythonVersion {
            epoch,
            release,
            pre,
            post: number("post")?,
            dev: number("dev")?,
            local: caps.name("local").map(|m| m.as_str().to_string()),
        })
    }

    /// The first three release components, padded with zeros
    pub fn release3(&self) -> (u64, u64, u64) {
        let get = |i: usize| self.release.get(i).copied().unwrap_or(0);
        (get(0), get(1), get(2))
    }

    /// Compare two versions by PEP 440 precedence
    ///
    /// Epoch first, then the release component-wise with missing trailing
    /// components read as zero, then pre-release (tagged orders before
    /// untagged; alpha < beta < rc, then by number), then post-release
    /// (absent orders before present), then dev-release (present orders
    /// before absent). The local segment is ignored.
    pub fn cmp_precedence(&self, other: &Self) -> Ordering {
        let epoch = self.epoch.unwrap_or(0).cmp(&other.epoch.unwrap_or(0));
        if epoch != Ordering::Equal {
            return epoch;
        }

        let len = self.release.len().max(other.release.len());
        for i in 0..len {
            let a = self.release.get(i).copied().unwrap_or(0);
            let b = other.release.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }

        let pre_key = |pre: &Option<(PreStage, u64)>| match pre {
            Some((stage, n)) => (0u8, *stage, *n),
            None => (1u8, PreStage::Alpha, 0),
        };
        let post_key = |post: &Option<u64>| match post {
            Some(n) => (1u8, *n),
            None => (0u8, 0),
        };
        let dev_key = |dev: &Option<u64>| match dev {
            Some(n) => (0u8, *n),
            None => (1u8, 0),
        };

        pre_key(&self.pre)
            .cmp(&pre_key(&other.pre))
            .then(post_key(&self.post).cmp(&post_key(&other.post)))
            .then(dev_key(&self.dev).cmp(&dev_key(&other.dev)))
    }
}

impl FromStr for PythonVersion {
    type Err = VbumpError;

    fn from_str(s: &str) -> Result<Self> {
        PythonVersion::parse(s)
    }
}

impl fmt::Display for PythonVersion {
    /// Canonical PEP 440 form: `{epoch}!{release}{a|b|rc}{N}.post{N}.dev{N}+{local}`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(epoch) = self.epoch {
            write!(f, "{epoch}!")?;
        }

        let release: Vec<String> = self.release.iter().map(u64::to_string).collect();
        write!(f, "{}", release.join("."))?;

        if let Some((stage, n)) = &self.pre {
            write!(f, "{stage}{n}")?;
        }
        if let Some(post) = self.post {
            write!(f, ".post{post}")?;
        }
        if let Some(dev) = self.dev {
            write!(f, ".dev{dev}")?;
        }
        if let Some(local) = &self.local {
            write!(f, "+{local}")?;
        }

        Ok(())
    }
}
