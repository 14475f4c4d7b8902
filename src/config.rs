use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{OnInvalidVersion, VersionKind};
use crate::error::{Result, VbumpError};

const DEFAULT_CONTEXT_LINES: usize = 3;

/// Returns the default number of context lines shown around a change.
fn default_context_lines() -> usize {
    DEFAULT_CONTEXT_LINES
}

/// Returns the default tag naming pattern.
fn default_tag_pattern() -> String {
    "v{version}".to_string()
}

/// Complete configuration for a vbump invocation.
///
/// Contains the current version, per-kind defaults, the review/apply policy
/// knobs, and the ordered list of file targets.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// The project's current version, as written in its manifests
    pub current_version: Option<String>,

    /// Kind assumed for targets that declare none; unset means infer
    pub default_kind: Option<VersionKind>,

    #[serde(default)]
    pub on_invalid_version: OnInvalidVersion,

    /// Context lines captured on each side of a planned change
    #[serde(default = "default_context_lines")]
    pub context_lines: usize,

    #[serde(default)]
    pub tag: TagConfig,

    #[serde(default)]
    pub hooks: HooksConfig,

    #[serde(default, rename = "file")]
    pub files: Vec<FileTarget>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            current_version: None,
            default_kind: None,
            on_invalid_version: OnInvalidVersion::default(),
            context_lines: DEFAULT_CONTEXT_LINES,
            tag: TagConfig::default(),
            hooks: HooksConfig::default(),
            files: Vec::new(),
        }
    }
}

/// One file to update on each bump.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FileTarget {
    /// Path relative to the project root
    pub src: PathBuf,

    /// Version dialect used in this file; unset falls back to
    /// `default_kind`, then to inference
    #[serde(default)]
    pub kind: Option<VersionKind>,

    /// Search template containing `{version}`; unset locates the current
    /// version text directly
    #[serde(default)]
    pub search: Option<String>,
}

/// Git tagging behavior after a successful bump.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TagConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Tag naming pattern, `{version}` is substituted (e.g. `v{version}`)
    #[serde(default = "default_tag_pattern")]
    pub pattern: String,
}

impl Default for TagConfig {
    fn default() -> Self {
        TagConfig {
            enabled: false,
            pattern: default_tag_pattern(),
        }
    }
}

/// Hook scripts run around the apply step.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct HooksConfig {
    /// Runs after review, before any file is written; a failure aborts
    pub before: Option<String>,

    /// Runs after all writes; failures are reported as warnings
    pub after: Option<String>,
}

/// A configuration together with the directory it governs.
///
/// File targets are resolved relative to `root`.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub root: PathBuf,
}

/// Loads configuration from an explicit path or by discovery.
///
/// Discovery walks up from the working directory and takes the first source
/// that carries vbump configuration:
/// 1. `vbump.toml` (the whole file);
/// 2. `pyproject.toml`, table `[tool.vbump]`, with `project.version` as a
///    fallback for `current_version`;
/// 3. `package.json`, key `"vbump"`, with the top-level `"version"` as
///    fallback;
/// 4. `Cargo.toml`, table `[package.metadata.vbump]`, with
///    `package.version` as fallback;
/// 5. a user-level `vbump.toml` in the platform config directory.
///
/// Returns `Ok(None)` when no source is found. A source that exists but
/// cannot be parsed is an error, not a fallthrough.
pub fn load_config(explicit: Option<&Path>) -> Result<Option<LoadedConfig>> {
    if let Some(path) = explicit {
        let config = parse_vbump_toml(path)?;
        return Ok(Some(LoadedConfig {
            root: parent_of(path),
            config,
        }));
    }

    if let Some(path) = find_up("vbump.toml") {
        let config = parse_vbump_toml(&path)?;
        return Ok(Some(LoadedConfig {
            root: parent_of(&path),
            config,
        }));
    }

    if let Some(path) = find_up("pyproject.toml") {
        if let Some(config) = parse_pyproject_toml(&path)? {
            return Ok(Some(LoadedConfig {
                root: parent_of(&path),
                config,
            }));
        }
    }

    if let Some(path) = find_up("package.json") {
        if let Some(config) = parse_package_json(&path)? {
            return Ok(Some(LoadedConfig {
                root: parent_of(&path),
                config,
            }));
        }
    }

    if let Some(path) = find_up("Cargo.toml") {
        if let Some(config) = parse_cargo_toml(&path)? {
            return Ok(Some(LoadedConfig {
                root: parent_of(&path),
                config,
            }));
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join("vbump.toml");
        if path.exists() {
            let config = parse_vbump_toml(&path)?;
            let root = std::env::current_dir()?;
            return Ok(Some(LoadedConfig { root, config }));
        }
    }

    Ok(None)
}

/// Parse a standalone vbump.toml file.
pub fn parse_vbump_toml(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| VbumpError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Parse the `[tool.vbump]` table of a pyproject.toml.
///
/// Returns `Ok(None)` when the file carries no vbump table.
pub fn parse_pyproject_toml(path: &Path) -> Result<Option<Config>> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)
        .map_err(|e| VbumpError::config(format!("failed to parse {}: {e}", path.display())))?;

    let Some(section) = value.get("tool").and_then(|t| t.get("vbump")) else {
        return Ok(None);
    };
    let mut config: Config = section.clone().try_into().map_err(|e| {
        VbumpError::config(format!("invalid [tool.vbump] in {}: {e}", path.display()))
    })?;

    if config.current_version.is_none() {
        config.current_version = value
            .get("project")
            .and_then(|p| p.get("version"))
            .and_then(|v| v.as_str())
            .map(String::from);
    }

    Ok(Some(config))
}

/// Parse the `"vbump"` key of a package.json.
///
/// Returns `Ok(None)` when the file carries no vbump key.
pub fn parse_package_json(path: &Path) -> Result<Option<Config>> {
    let content = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| VbumpError::config(format!("failed to parse {}: {e}", path.display())))?;

    let Some(section) = value.get("vbump") else {
        return Ok(None);
    };
    let mut config: Config = serde_json::from_value(section.clone()).map_err(|e| {
        VbumpError::config(format!("invalid \"vbump\" key in {}: {e}", path.display()))
    })?;

    if config.current_version.is_none() {
        config.current_version = value
            .get("version")
            .and_then(|v| v.as_str())
            .map(String::from);
    }

    Ok(Some(config))
}

/// Parse the `[package.metadata.vbump]` table of a Cargo.toml.
///
/// Returns `Ok(None)` when the file carries no vbump table.
pub fn parse_cargo_toml(path: &Path) -> Result<Option<Config>> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)
        .map_err(|e| VbumpError::config(format!("failed to parse {}: {e}", path.display())))?;

    let Some(section) = value
        .get("package")
        .and_then(|p| p.get("metadata"))
        .and_then(|m| m.get("vbump"))
    else {
        return Ok(None);
    };
    let mut config: Config = section.clone().try_into().map_err(|e| {
        VbumpError::config(format!(
            "invalid [package.metadata.vbump] in {}: {e}",
            path.display()
        ))
    })?;

    if config.current_version.is_none() {
        config.current_version = value
            .get("package")
            .and_then(|p| p.get("version"))
            .and_then(|v| v.as_str())
            .map(String::from);
    }

    Ok(Some(config))
}

fn parent_of(path: &Path) -> PathBuf {
    path.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn find_up(name: &str) -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;
    loop {
        let candidate = current.join(name);
        if candidate.exists() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.context_lines, 3);
        assert_eq!(config.on_invalid_version, OnInvalidVersion::Error);
        assert!(!config.tag.enabled);
        assert_eq!(config.tag.pattern, "v{version}");
        assert!(config.files.is_empty());
    }

    #[test]
    fn test_parse_full_document() {
        let config: Config = toml::from_str(
            r#"
current_version = "1.2.3a1"
default_kind = "python"
on_invalid_version = "cast"
context_lines = 5

[tag]
enabled = true
pattern = "release-{version}"

[hooks]
before = "scripts/check.sh"

[[file]]
src = "pyproject.toml"

[[file]]
src = "package.json"
kind = "semver"
search = "\"version\": \"{version}\""
"#,
        )
        .unwrap();

        assert_eq!(config.current_version.as_deref(), Some("1.2.3a1"));
        assert_eq!(config.default_kind, Some(VersionKind::Python));
        assert_eq!(config.on_invalid_version, OnInvalidVersion::Cast);
        assert_eq!(config.context_lines, 5);
        assert!(config.tag.enabled);
        assert_eq!(config.tag.pattern, "release-{version}");
        assert_eq!(config.hooks.before.as_deref(), Some("scripts/check.sh"));
        assert_eq!(config.hooks.after, None);
        assert_eq!(config.files.len(), 2);
        assert_eq!(config.files[1].kind, Some(VersionKind::Semver));
        assert_eq!(
            config.files[1].search.as_deref(),
            Some("\"version\": \"{version}\"")
        );
    }

    #[test]
    fn test_parse_minimal_document_uses_defaults() {
        let config: Config = toml::from_str("current_version = \"0.1.0\"").unwrap();
        assert_eq!(config.current_version.as_deref(), Some("0.1.0"));
        assert_eq!(config.context_lines, 3);
        assert_eq!(config.default_kind, None);
        assert_eq!(config.on_invalid_version, OnInvalidVersion::Error);
    }

    #[test]
    fn test_kind_names_deserialize_lowercase() {
        for (name, kind) in [
            ("any", VersionKind::Any),
            ("simple", VersionKind::Simple),
            ("python", VersionKind::Python),
            ("semver", VersionKind::Semver),
        ] {
            let config: Config =
                toml::from_str(&format!("default_kind = \"{name}\"")).unwrap();
            assert_eq!(config.default_kind, Some(kind));
        }
    }

    #[test]
    fn test_config_roundtrips_through_toml() {
        let config: Config = toml::from_str(
            "current_version = \"1.0.0\"\ndefault_kind = \"semver\"\n[[file]]\nsrc = \"a.txt\"\n",
        )
        .unwrap();
        let rendered = toml::to_string_pretty(&config).unwrap();
        let reparsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(config, reparsed);
    }
}
