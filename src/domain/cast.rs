//! Lossy, rule-based conversion between version dialects
//!
//! Every conversion either follows a documented rule or fails with
//! `UncastableValue`; nothing is dropped beyond what the rules state. Inputs
//! are never mutated.

use crate::domain::prerelease::{self, PreStage};
use crate::domain::python::PythonVersion;
use crate::domain::simple::SimpleVersion;
use crate::domain::version::{VersionKind, VersionValue};
use crate::error::{Result, VbumpError};

/// Cast a version value to the target kind
pub fn cast(value: &VersionValue, target: VersionKind) -> Result<VersionValue> {
    if value.kind() == target {
        return Ok(value.clone());
    }

    match (value, target) {
        // Everything formats to an opaque string.
        (_, VersionKind::Any) => Ok(VersionValue::Any(value.to_string())),

        (VersionValue::Any(s), VersionKind::Simple) => {
            simple_from_loose(s).map(VersionValue::Simple)
        }
        (VersionValue::Python(p), VersionKind::Simple) => {
            simple_from_python(p).map(VersionValue::Simple)
        }
        (VersionValue::Semver(v), VersionKind::Simple) => Ok(VersionValue::Simple(
            SimpleVersion::new(v.major, v.minor, v.patch),
        )),

        (VersionValue::Simple(v), VersionKind::Python) => Ok(VersionValue::Python(PythonVersion {
            epoch: None,
            release: vec![v.major, v.minor, v.patch],
            pre: None,
            post: None,
            dev: None,
            local: None,
        })),
        (VersionValue::Semver(v), VersionKind::Python) => {
            semver_to_python(v).map(VersionValue::Python)
        }

        (VersionValue::Simple(v), VersionKind::Semver) => Ok(VersionValue::Semver(
            semver::Version::new(v.major, v.minor, v.patch),
        )),
        (VersionValue::Python(p), VersionKind::Semver) => {
            python_to_semver(p).map(VersionValue::Semver)
        }

        // Opaque text casts to a structured kind only by re-parsing it
        // strictly against the target grammar.
        (VersionValue::Any(s), kind) => VersionValue::parse(s, kind)
            .map_err(|e| VbumpError::uncastable(s, kind, e.to_string())),

        // All same-kind pairs were handled by the identity arm.
        _ => unreachable!("same-kind cast is the identity"),
    }
}

fn simple_from_python(p: &PythonVersion) -> Result<SimpleVersion> {
    if p.release.len() > 3 {
        return Err(VbumpError::uncastable(
            p.to_string(),
            VersionKind::Simple,
            "release has more than three components",
        ));
    }
    let (major, minor, patch) = p.release3();
    Ok(SimpleVersion::new(major, minor, patch))
}

/// Extract a numeric release from loosely-structured version text
///
/// Strips an epoch prefix, a local/build suffix, and anything from the first
/// pre/post/dev marker on; the remaining dot-separated components must all be
/// numeric and at most three.
fn simple_from_loose(text: &str) -> Result<SimpleVersion> {
    let uncastable =
        |reason: &str| VbumpError::uncastable(text, VersionKind::Simple, reason);

    let lowered = text.to_lowercase();

    let rest = match lowered.find('!') {
        Some(pos) => {
            let epoch = &lowered[..pos];
            if epoch.is_empty() || !epoch.chars().all(|c| c.is_ascii_digit()) {
                return Err(uncastable("invalid epoch prefix"));
            }
            &lowered[pos + 1..]
        }
        None => lowered.as_str(),
    };

    let rest = match rest.find('+') {
        Some(pos) => &rest[..pos],
        None => rest,
    };

    let release = rest[..release_end(rest)].trim_end_matches(['.', '-', '_']);
    if release.is_empty() {
        return Err(uncastable("no numeric release found"));
    }

    let parts: Vec<&str> = release.split('.').collect();
    if parts.len() > 3 {
        return Err(uncastable("release has more than three components"));
    }
    for part in &parts {
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return Err(uncastable(&format!("release component '{part}' is not a number")));
        }
    }

    let component = |i: usize| -> Result<u64> {
        match parts.get(i) {
            Some(part) => part
                .parse()
                .map_err(|_| uncastable(&format!("release component '{part}' is out of range"))),
            None => Ok(0),
        }
    };

    Ok(SimpleVersion::new(component(0)?, component(1)?, component(2)?))
}

/// Byte offset where the numeric release ends and suffix markers begin
fn release_end(text: &str) -> usize {
    const MARKERS: [&str; 11] = [
        "alpha", "beta", "preview", "rc", "post", "dev", "a", "b", "c", "-", "_",
    ];

    let mut earliest = text.len();
    for marker in MARKERS {
        if let Some(pos) = text.find(marker) {
            // only cut at a segment boundary, not inside an opaque token
            let before = &text[..pos];
            let at_boundary = before.is_empty()
                || before.ends_with('.')
                || before.chars().last().is_some_and(|c| c.is_ascii_digit());
            if at_boundary {
                earliest = earliest.min(pos);
            }
        }
    }
    earliest
}

fn python_to_semver(p: &PythonVersion) -> Result<semver::Version> {
    let uncastable =
        |reason: &str| VbumpError::uncastable(p.to_string(), VersionKind::Semver, reason);

    if p.epoch.is_some() {
        return Err(uncastable("epoch has no semver representation"));
    }
    if p.release.len() > 3 {
        return Err(uncastable("release has more than three components"));
    }
    let (major, minor, patch) = p.release3();

    // Pre-release tag becomes a stage/number identifier pair; post and dev
    // are appended as further pairs (semver has no native concept of either).
    let mut ids: Vec<String> = Vec::new();
    if let Some((stage, n)) = &p.pre {
        ids.push(stage.label().to_string());
        ids.push(n.to_string());
    }
    if let Some(n) = p.post {
        ids.push("post".to_string());
        ids.push(n.to_string());
    }
    if let Some(n) = p.dev {
        ids.push("dev".to_string());
        ids.push(n.to_string());
    }

    let build = match &p.local {
        Some(local) => semver::BuildMetadata::new(local)
            .map_err(|e| uncastable(&format!("local segment is not valid build metadata: {e}")))?,
        None => semver::BuildMetadata::EMPTY,
    };

    Ok(semver::Version {
        major,
        minor,
        patch,
        pre: prerelease::prerelease_from_ids(&ids)?,
        build,
    })
}

fn semver_to_python(v: &semver::Version) -> Result<PythonVersion> {
    let ids = prerelease::identifiers(&v.pre);
    let (prefix, post, dev) = prerelease::split_trailing(&ids);

    // A stage identifier followed by a pure number maps onto the pre-release
    // tag; any other sequence is preserved verbatim in the local segment.
    let (pre, leftover) = match prefix.as_slice() {
        [stage, n] if prerelease::is_numeric(n) => match PreStage::from_label(stage) {
            Some(stage) => {
                let n = n.parse().map_err(|_| {
                    VbumpError::uncastable(
                        v.to_string(),
                        VersionKind::Python,
                        "pre-release number is out of range",
                    )
                })?;
                (Some((stage, n)), Vec::new())
            }
            None => (None, prefix),
        },
        _ => (None, prefix),
    };

    let mut local_parts: Vec<String> = Vec::new();
    if !leftover.is_empty() {
        local_parts.push(leftover.join("."));
    }
    if !v.build.is_empty() {
        local_parts.push(v.build.as_str().to_string());
    }
    let local = if local_parts.is_empty() {
        None
    } else {
        // PEP 440 normalizes '-' and '_' in local segments to dots
        Some(local_parts.join(".").to_lowercase().replace(['-', '_'], "."))
    };

    Ok(PythonVersion {
        epoch: None,
        release: vec![v.major, v.minor, v.patch],
        pre,
        post,
        dev,
        local,
    })
}
