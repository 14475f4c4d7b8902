//! Successor computation under a bump directive
//!
//! Directives cover the numeric components (major/minor/patch), the
//! pre-release ladder (alpha/beta/rc), post- and dev-releases, suffix
//! stripping (release), and explicit version literals. Every computation
//! returns a new value.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::cast::cast;
use crate::domain::prerelease::{self, PreStage};
use crate::domain::python::PythonVersion;
use crate::domain::simple::SimpleVersion;
use crate::domain::version::{VersionKind, VersionValue};
use crate::error::{Result, VbumpError};

/// What to do when a version does not parse under the requested kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnInvalidVersion {
    /// Fail with `InvalidFormat`
    #[default]
    Error,
    /// Re-read the text as opaque and cast it into the requested kind
    Cast,
}

/// A requested version transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BumpDirective {
    Major,
    Minor,
    Patch,
    Alpha,
    Beta,
    Rc,
    Post,
    Dev,
    Release,
    /// Replace the version with the given literal
    Explicit(String),
}

impl BumpDirective {
    /// Parse a CLI bump target
    ///
    /// The known directive words map to their variants; anything else is
    /// taken as an explicit version literal.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "major" => BumpDirective::Major,
            "minor" => BumpDirective::Minor,
            "patch" => BumpDirective::Patch,
            "alpha" => BumpDirective::Alpha,
            "beta" => BumpDirective::Beta,
            "rc" => BumpDirective::Rc,
            "post" => BumpDirective::Post,
            "dev" => BumpDirective::Dev,
            "release" => BumpDirective::Release,
            _ => BumpDirective::Explicit(s.to_string()),
        }
    }
}

impl fmt::Display for BumpDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BumpDirective::Major => "major",
            BumpDirective::Minor => "minor",
            BumpDirective::Patch => "patch",
            BumpDirective::Alpha => "alpha",
            BumpDirective::Beta => "beta",
            BumpDirective::Rc => "rc",
            BumpDirective::Post => "post",
            BumpDirective::Dev => "dev",
            BumpDirective::Release => "release",
            BumpDirective::Explicit(text) => text,
        };
        write!(f, "{name}")
    }
}

impl BumpDirective {
    fn stage(&self) -> Option<PreStage> {
        match self {
            BumpDirective::Alpha => Some(PreStage::Alpha),
            BumpDirective::Beta => Some(PreStage::Beta),
            BumpDirective::Rc => Some(PreStage::Rc),
            _ => None,
        }
    }
}

/// Compute the next version under a directive
///
/// The current value must already be of the wanted kind (cast first if it is
/// not). For non-explicit directives the result is a strictly newer point on
/// the kind's development line; `Release` on a value with nothing to strip
/// fails with `AlreadyReleased`, and directives a kind cannot express fail
/// with `UnsupportedDirective`.
pub fn bump(
    current: &VersionValue,
    directive: &BumpDirective,
    policy: OnInvalidVersion,
) -> Result<VersionValue> {
    let unsupported = || VbumpError::UnsupportedDirective {
        directive: directive.to_string(),
        kind: current.kind(),
    };

    match directive {
        BumpDirective::Explicit(text) => bump_explicit(current, text, policy),
        _ => match current {
            VersionValue::Any(_) => Err(unsupported()),
            VersionValue::Simple(v) => bump_simple(v, directive).ok_or_else(unsupported),
            VersionValue::Python(v) => bump_python(v, directive),
            VersionValue::Semver(v) => bump_semver(v, directive),
        },
    }
}

fn bump_explicit(
    current: &VersionValue,
    text: &str,
    policy: OnInvalidVersion,
) -> Result<VersionValue> {
    let target = current.kind();
    match VersionValue::parse(text, target) {
        Ok(v) => Ok(v),
        Err(err) => match policy {
            OnInvalidVersion::Error => Err(err),
            OnInvalidVersion::Cast => cast(&VersionValue::Any(text.to_string()), target),
        },
    }
}

fn bump_simple(v: &SimpleVersion, directive: &BumpDirective) -> Option<VersionValue> {
    let next = match directive {
        BumpDirective::Major => SimpleVersion::new(v.major + 1, 0, 0),
        BumpDirective::Minor => SimpleVersion::new(v.major, v.minor + 1, 0),
        BumpDirective::Patch => SimpleVersion::new(v.major, v.minor, v.patch + 1),
        _ => return None,
    };
    Some(VersionValue::Simple(next))
}

fn bump_python(v: &PythonVersion, directive: &BumpDirective) -> Result<VersionValue> {
    let (major, minor, patch) = v.release3();

    // Numeric bumps canonicalize the release to three components; a bumped
    // version never carries the old local segment.
    let numeric = |release: Vec<u64>| PythonVersion {
        epoch: v.epoch,
        release,
        pre: None,
        post: None,
        dev: None,
        local: None,
    };

    let next = match directive {
        BumpDirective::Major => numeric(vec![major + 1, 0, 0]),
        BumpDirective::Minor => numeric(vec![major, minor + 1, 0]),
        BumpDirective::Patch => numeric(vec![major, minor, patch + 1]),

        BumpDirective::Alpha | BumpDirective::Beta | BumpDirective::Rc => {
            let stage = directive.stage().expect("stage directive");
            let n = match v.pre {
                Some((current, n)) if current == stage => n + 1,
                _ => 1,
            };
            PythonVersion {
                epoch: v.epoch,
                release: v.release.clone(),
                pre: Some((stage, n)),
                post: None,
                dev: None,
                local: None,
            }
        }

        BumpDirective::Post => PythonVersion {
            epoch: v.epoch,
            release: v.release.clone(),
            pre: v.pre,
            post: Some(v.post.map_or(1, |n| n + 1)),
            dev: None,
            local: None,
        },

        BumpDirective::Dev => PythonVersion {
            epoch: v.epoch,
            release: v.release.clone(),
            pre: v.pre,
            post: v.post,
            dev: Some(v.dev.map_or(1, |n| n + 1)),
            local: None,
        },

        BumpDirective::Release => {
            if v.pre.is_none() && v.post.is_none() && v.dev.is_none() {
                return Err(VbumpError::AlreadyReleased(v.to_string()));
            }
            PythonVersion {
                epoch: v.epoch,
                release: v.release.clone(),
                pre: None,
                post: None,
                dev: None,
                local: None,
            }
        }

        BumpDirective::Explicit(_) => unreachable!("explicit handled by the dispatcher"),
    };

    Ok(VersionValue::Python(next))
}

fn bump_semver(v: &semver::Version, directive: &BumpDirective) -> Result<VersionValue> {
    let rebuild = |major: u64, minor: u64, patch: u64, ids: &[String]| -> Result<semver::Version> {
        Ok(semver::Version {
            major,
            minor,
            patch,
            pre: prerelease::prerelease_from_ids(ids)?,
            build: semver::BuildMetadata::EMPTY,
        })
    };

    let ids = prerelease::identifiers(&v.pre);
    let (prefix, post, dev) = prerelease::split_trailing(&ids);

    let next = match directive {
        BumpDirective::Major => rebuild(v.major + 1, 0, 0, &[])?,
        BumpDirective::Minor => rebuild(v.major, v.minor + 1, 0, &[])?,
        BumpDirective::Patch => rebuild(v.major, v.minor, v.patch + 1, &[])?,

        BumpDirective::Alpha | BumpDirective::Beta | BumpDirective::Rc => {
            let stage = directive.stage().expect("stage directive");
            let n = match prerelease::stage_of(&ids) {
                Some((current, n)) if current == stage => n + 1,
                _ => 1,
            };
            rebuild(
                v.major,
                v.minor,
                v.patch,
                &[stage.label().to_string(), n.to_string()],
            )?
        }

        BumpDirective::Post => {
            let mut next_ids = prefix;
            next_ids.push("post".to_string());
            next_ids.push(post.map_or(1, |n| n + 1).to_string());
            rebuild(v.major, v.minor, v.patch, &next_ids)?
        }

        BumpDirective::Dev => {
            let mut next_ids = prefix;
            if let Some(n) = post {
                next_ids.push("post".to_string());
                next_ids.push(n.to_string());
            }
            next_ids.push("dev".to_string());
            next_ids.push(dev.map_or(1, |n| n + 1).to_string());
            rebuild(v.major, v.minor, v.patch, &next_ids)?
        }

        BumpDirective::Release => {
            if v.pre.is_empty() {
                return Err(VbumpError::AlreadyReleased(v.to_string()));
            }
            rebuild(v.major, v.minor, v.patch, &[])?
        }

        BumpDirective::Explicit(_) => unreachable!("explicit handled by the dispatcher"),
    };

    Ok(VersionValue::Semver(next))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bump_text(text: &str, kind: VersionKind, target: &str) -> Result<String> {
        let current = VersionValue::parse(text, kind).unwrap();
        bump(&current, &BumpDirective::parse(target), OnInvalidVersion::Error)
            .map(|v| v.to_string())
    }

    fn python(text: &str, target: &str) -> String {
        bump_text(text, VersionKind::Python, target).unwrap()
    }

    fn sem(text: &str, target: &str) -> String {
        bump_text(text, VersionKind::Semver, target).unwrap()
    }

    #[test]
    fn test_directive_parse() {
        assert_eq!(BumpDirective::parse("major"), BumpDirective::Major);
        assert_eq!(BumpDirective::parse("RC"), BumpDirective::Rc);
        assert_eq!(
            BumpDirective::parse("1.2.3"),
            BumpDirective::Explicit("1.2.3".to_string())
        );
    }

    #[test]
    fn test_python_major_minor_patch() {
        assert_eq!(python("1.2.3", "major"), "2.0.0");
        assert_eq!(python("1.2.3", "minor"), "1.3.0");
        assert_eq!(python("1.2.3", "patch"), "1.2.4");
        // short releases canonicalize to three components
        assert_eq!(python("1.2", "major"), "2.0.0");
    }

    #[test]
    fn test_python_numeric_bump_strips_suffixes() {
        assert_eq!(python("1.2.3a1", "major"), "2.0.0");
        assert_eq!(python("1.2.3a1", "patch"), "1.2.4");
        assert_eq!(python("1.2.3.post1.dev2+local", "minor"), "1.3.0");
    }

    #[test]
    fn test_python_numeric_bump_keeps_epoch() {
        assert_eq!(python("1!1.2.3", "major"), "1!2.0.0");
    }

    #[test]
    fn test_python_stage_increments_same_stage() {
        assert_eq!(python("1.2.3", "alpha"), "1.2.3a1");
        assert_eq!(python("1.2.3a1", "alpha"), "1.2.3a2");
        assert_eq!(python("1.2.3a5", "alpha"), "1.2.3a6");
        assert_eq!(python("1.2.3b1", "beta"), "1.2.3b2");
        assert_eq!(python("1.2.3rc1", "rc"), "1.2.3rc2");
    }

    #[test]
    fn test_python_stage_switch_resets_to_one() {
        assert_eq!(python("1.2.3b1", "alpha"), "1.2.3a1");
        assert_eq!(python("1.2.3a1", "beta"), "1.2.3b1");
        assert_eq!(python("1.2.3b2", "rc"), "1.2.3rc1");
    }

    #[test]
    fn test_python_stage_bump_twice() {
        let v = VersionValue::parse("1.2.3", VersionKind::Python).unwrap();
        let once = bump(&v, &BumpDirective::Alpha, OnInvalidVersion::Error).unwrap();
        let twice = bump(&once, &BumpDirective::Alpha, OnInvalidVersion::Error).unwrap();
        assert_eq!(once.to_string(), "1.2.3a1");
        assert_eq!(twice.to_string(), "1.2.3a2");
        assert_eq!(once.compare(&twice).unwrap(), std::cmp::Ordering::Less);
    }

    #[test]
    fn test_python_stage_clears_post_dev() {
        assert_eq!(python("1.2.3a1.post2.dev3", "alpha"), "1.2.3a2");
    }

    #[test]
    fn test_python_post() {
        assert_eq!(python("1.2.3", "post"), "1.2.3.post1");
        assert_eq!(python("1.2.3.post1", "post"), "1.2.3.post2");
        // pre-release tag is kept, dev is cleared
        assert_eq!(python("1.2.3a1.dev2", "post"), "1.2.3a1.post1");
    }

    #[test]
    fn test_python_dev() {
        assert_eq!(python("1.2.3", "dev"), "1.2.3.dev1");
        assert_eq!(python("1.2.3.dev1", "dev"), "1.2.3.dev2");
        // pre-release and post are kept
        assert_eq!(python("1.2.3a1.post1", "dev"), "1.2.3a1.post1.dev1");
    }

    #[test]
    fn test_python_release_strips_everything() {
        assert_eq!(python("1.2.3a1", "release"), "1.2.3");
        assert_eq!(python("1.2.3b2", "release"), "1.2.3");
        assert_eq!(python("1.2.3.post1", "release"), "1.2.3");
        assert_eq!(python("1.2.3.dev1", "release"), "1.2.3");
        assert_eq!(python("1.2.3a1.post1.dev1", "release"), "1.2.3");
    }

    #[test]
    fn test_python_release_on_final_fails() {
        assert!(matches!(
            bump_text("1.2.3", VersionKind::Python, "release"),
            Err(VbumpError::AlreadyReleased(_))
        ));
    }

    #[test]
    fn test_python_bump_drops_local() {
        assert_eq!(python("1.2.3+local.1", "patch"), "1.2.4");
        assert_eq!(python("1.2.3a1+local.1", "alpha"), "1.2.3a2");
        assert_eq!(python("1.2.3+local.1", "post"), "1.2.3.post1");
    }

    #[test]
    fn test_python_non_explicit_bump_orders_greater() {
        for (text, target) in [
            ("1.2.3", "major"),
            ("1.2.3", "minor"),
            ("1.2.3a1", "patch"),
            ("1.2.3a1", "alpha"),
            ("1.2.3", "post"),
            ("1.2.3.post1", "dev"),
        ] {
            let current = VersionValue::parse(text, VersionKind::Python).unwrap();
            let next =
                bump(&current, &BumpDirective::parse(target), OnInvalidVersion::Error).unwrap();
            assert_eq!(
                current.compare(&next).unwrap(),
                std::cmp::Ordering::Less,
                "bump {text} {target} should grow"
            );
        }
    }

    #[test]
    fn test_simple_bumps() {
        assert_eq!(bump_text("1.2.3", VersionKind::Simple, "major").unwrap(), "2.0.0");
        assert_eq!(bump_text("1.2.3", VersionKind::Simple, "minor").unwrap(), "1.3.0");
        assert_eq!(bump_text("1.2.3", VersionKind::Simple, "patch").unwrap(), "1.2.4");
    }

    #[test]
    fn test_simple_rejects_stage_directives() {
        for target in ["alpha", "beta", "rc", "post", "dev", "release"] {
            assert!(matches!(
                bump_text("1.2.3", VersionKind::Simple, target),
                Err(VbumpError::UnsupportedDirective { .. })
            ));
        }
    }

    #[test]
    fn test_any_rejects_all_but_explicit() {
        for target in ["major", "minor", "patch", "alpha", "release"] {
            assert!(matches!(
                bump_text("snapshot-5", VersionKind::Any, target),
                Err(VbumpError::UnsupportedDirective { .. })
            ));
        }
        assert_eq!(
            bump_text("snapshot-5", VersionKind::Any, "snapshot-6").unwrap(),
            "snapshot-6"
        );
    }

    #[test]
    fn test_semver_major_minor_patch() {
        assert_eq!(sem("1.2.3", "major"), "2.0.0");
        assert_eq!(sem("1.2.3", "minor"), "1.3.0");
        assert_eq!(sem("1.2.3", "patch"), "1.2.4");
    }

    #[test]
    fn test_semver_patch_clears_prerelease_and_build() {
        assert_eq!(sem("1.2.3-alpha.1+build.9", "patch"), "1.2.4");
    }

    #[test]
    fn test_semver_stage_bumps() {
        assert_eq!(sem("1.2.3", "alpha"), "1.2.3-alpha.1");
        assert_eq!(sem("1.2.3-alpha.1", "alpha"), "1.2.3-alpha.2");
        assert_eq!(sem("1.2.3-beta.1", "alpha"), "1.2.3-alpha.1");
        assert_eq!(sem("1.2.3-alpha.1", "beta"), "1.2.3-beta.1");
        // a bare stage identifier counts as iteration zero
        assert_eq!(sem("1.2.3-alpha", "alpha"), "1.2.3-alpha.1");
    }

    #[test]
    fn test_semver_post_dev_pairs() {
        assert_eq!(sem("1.2.3", "post"), "1.2.3-post.1");
        assert_eq!(sem("1.2.3-post.1", "post"), "1.2.3-post.2");
        assert_eq!(sem("1.2.3-alpha.1", "post"), "1.2.3-alpha.1.post.1");
        assert_eq!(sem("1.2.3-alpha.1.post.1", "dev"), "1.2.3-alpha.1.post.1.dev.1");
        // post clears a pending dev pair
        assert_eq!(sem("1.2.3-alpha.1.post.1.dev.2", "post"), "1.2.3-alpha.1.post.2");
    }

    #[test]
    fn test_semver_release() {
        assert_eq!(sem("1.2.3-rc.2", "release"), "1.2.3");
        assert_eq!(sem("1.2.3-alpha.1.post.1.dev.1", "release"), "1.2.3");
        assert!(matches!(
            bump_text("1.2.3", VersionKind::Semver, "release"),
            Err(VbumpError::AlreadyReleased(_))
        ));
    }

    #[test]
    fn test_explicit_parses_against_current_kind() {
        assert_eq!(bump_text("1.2.3", VersionKind::Simple, "9.9.9").unwrap(), "9.9.9");
        assert_eq!(python("1.2.3", "2.0.0a1"), "2.0.0a1");
    }

    #[test]
    fn test_explicit_invalid_with_error_policy() {
        assert!(matches!(
            bump_text("1.2.3", VersionKind::Simple, "not-a-version"),
            Err(VbumpError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_explicit_invalid_with_cast_policy() {
        let current = VersionValue::parse("1.2.3", VersionKind::Simple).unwrap();

        // castable text goes through the any -> simple rule
        let next = bump(
            &current,
            &BumpDirective::Explicit("2.0.0rc1".to_string()),
            OnInvalidVersion::Cast,
        )
        .unwrap();
        assert_eq!(next.to_string(), "2.0.0");

        // text with no numeric release still fails, now as uncastable
        let err = bump(
            &current,
            &BumpDirective::Explicit("not-a-version".to_string()),
            OnInvalidVersion::Cast,
        )
        .unwrap_err();
        assert!(matches!(err, VbumpError::UncastableValue { .. }));
    }
}
