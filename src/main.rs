use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};

use vbump::config::{self, Config, FileTarget, LoadedConfig};
use vbump::domain::{bump, cast, BumpDirective, OnInvalidVersion, VersionKind, VersionValue};
use vbump::git_ops::GitRepo;
use vbump::hooks::{HookContext, HookExecutor};
use vbump::planner::{plan_change, ChangeRecord, Locator};
use vbump::{apply, ui};

#[derive(Parser)]
#[command(name = "vbump")]
#[command(about = "Bump version numbers across project files, with review")]
#[command(version)]
#[command(arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show current version
    Current {
        #[arg(short, long, help = "Custom configuration file path")]
        config: Option<PathBuf>,
    },
    /// Show resolved configuration
    Config {
        #[arg(short, long, help = "Custom configuration file path")]
        config: Option<PathBuf>,
    },
    /// Bump the version across configured files
    Bump {
        /// Directive (major, minor, patch, alpha, beta, rc, post, dev,
        /// release) or an explicit version literal
        #[arg(default_value = "patch")]
        target: String,

        #[arg(short, long, help = "Custom configuration file path")]
        config: Option<PathBuf>,

        #[arg(short, long, help = "Accept all changes without prompting")]
        yes: bool,

        #[arg(long, help = "Preview what would happen without making changes")]
        dry_run: bool,

        #[arg(long, help = "Skip git tag creation")]
        no_tag: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Current { config } => run_current(config.as_deref()),
        Commands::Config { config } => run_config(config.as_deref()),
        Commands::Bump {
            target,
            config,
            yes,
            dry_run,
            no_tag,
        } => run_bump(config.as_deref(), &target, yes, dry_run, no_tag),
    }
}

fn load_required_config(path: Option<&Path>) -> Result<LoadedConfig> {
    config::load_config(path)?.ok_or_else(|| {
        anyhow!("No configuration found (vbump.toml, pyproject.toml, package.json or Cargo.toml)")
    })
}

fn run_current(config_path: Option<&Path>) -> Result<()> {
    let loaded = load_required_config(config_path)?;
    match loaded.config.current_version {
        Some(version) => {
            println!("{version}");
            Ok(())
        }
        None => bail!("No current_version found in configuration"),
    }
}

fn run_config(config_path: Option<&Path>) -> Result<()> {
    let loaded = load_required_config(config_path)?;
    print!("{}", toml::to_string_pretty(&loaded.config)?);
    Ok(())
}

fn run_bump(
    config_path: Option<&Path>,
    target: &str,
    yes: bool,
    dry_run: bool,
    no_tag: bool,
) -> Result<()> {
    let LoadedConfig { config, root } = load_required_config(config_path)?;

    let current_text = config
        .current_version
        .clone()
        .ok_or_else(|| anyhow!("No current_version found in configuration"))?;

    let directive = BumpDirective::parse(target);

    // The transition at the base kind drives the summary, hooks and tag;
    // each file then renders it in its own kind.
    let base_kind = config
        .default_kind
        .unwrap_or_else(|| VersionValue::infer_kind(&current_text));
    let current = parse_with_policy(&current_text, base_kind, config.on_invalid_version)?;
    let new_value = bump(&current, &directive, config.on_invalid_version)?;

    ui::display_bump_summary(&current.to_string(), &new_value.to_string());

    if config.files.is_empty() {
        bail!("No [[file]] targets configured");
    }

    let mut records: Vec<ChangeRecord> = Vec::new();
    let mut failed = 0usize;
    for file in &config.files {
        let path = root.join(&file.src);
        match plan_target(&path, file, &config, &directive, &current_text) {
            Ok(record) => records.push(record),
            Err(e) => {
                ui::display_warning(&format!("{}: {e}", path.display()));
                failed += 1;
            }
        }
    }

    if records.is_empty() {
        bail!("No changes could be planned ({failed} target(s) failed)");
    }

    if dry_run {
        for record in &records {
            ui::display_change(record);
        }
        ui::display_dry_run_note(records.len());
        return Ok(());
    }

    if yes {
        ui::accept_all(&mut records);
    } else if !ui::review_changes(&mut records)? {
        ui::display_status("Bump cancelled, nothing written");
        return Ok(());
    }

    let accepted: Vec<&ChangeRecord> = records.iter().filter(|r| r.is_accepted()).collect();
    if accepted.is_empty() {
        ui::display_status("No changes accepted, nothing written");
        return Ok(());
    }

    let context = HookContext {
        old_version: current.to_string(),
        new_version: new_value.to_string(),
        directive: directive.to_string(),
        files: accepted.iter().map(|r| r.path.clone()).collect(),
    };

    if let Some(script) = &config.hooks.before {
        HookExecutor::execute(script, &context)?;
    }

    let mut applied = 0usize;
    for record in &accepted {
        match apply::apply_record(record) {
            Ok(()) => {
                ui::display_success(&format!("Updated {}", record.path.display()));
                applied += 1;
            }
            Err(e) => ui::display_warning(&format!("{}: {e}", record.path.display())),
        }
    }

    if applied == 0 {
        bail!("No files could be updated");
    }

    if let Some(script) = &config.hooks.after {
        HookExecutor::execute_permissive(script, &context);
    }

    if config.tag.enabled && !no_tag {
        create_tag(&config, &new_value);
    }

    Ok(())
}

/// Plan the change for one configured target; failures stay scoped to it.
fn plan_target(
    path: &Path,
    file: &FileTarget,
    config: &Config,
    directive: &BumpDirective,
    current_text: &str,
) -> vbump::Result<ChangeRecord> {
    let kind = file.kind.or(config.default_kind);

    let locator = match &file.search {
        Some(template) => Locator::from_template(template, kind)?,
        None => {
            let text = version_text_for_kind(current_text, kind, config.on_invalid_version)?;
            Locator::literal(&text)?
        }
    };

    let content = fs::read_to_string(path)?;
    plan_change(
        path,
        &content,
        &locator,
        kind,
        directive,
        config.on_invalid_version,
        config.context_lines,
    )
}

/// The current version as it is written in a file of the given kind.
fn version_text_for_kind(
    current: &str,
    kind: Option<VersionKind>,
    policy: OnInvalidVersion,
) -> vbump::Result<String> {
    match kind {
        None => Ok(current.to_string()),
        Some(kind) => parse_with_policy(current, kind, policy).map(|v| v.to_string()),
    }
}

fn parse_with_policy(
    text: &str,
    kind: VersionKind,
    policy: OnInvalidVersion,
) -> vbump::Result<VersionValue> {
    match VersionValue::parse(text, kind) {
        Ok(value) => Ok(value),
        Err(err) => match policy {
            OnInvalidVersion::Error => Err(err),
            OnInvalidVersion::Cast => cast(&VersionValue::parse_inferred(text), kind),
        },
    }
}

fn create_tag(config: &Config, new_value: &VersionValue) {
    let repo = match GitRepo::discover() {
        Ok(repo) => repo,
        Err(e) => {
            ui::display_warning(&format!("Not tagging: {e}"));
            return;
        }
    };

    match repo.is_dirty() {
        Ok(true) => ui::display_warning(
            "Working tree has uncommitted changes; the tag will point at the current HEAD",
        ),
        Ok(false) => {}
        Err(e) => ui::display_warning(&format!("Could not check working tree: {e}")),
    }

    let tag_name = config
        .tag
        .pattern
        .replace("{version}", &new_value.to_string());

    match repo.create_tag(&tag_name) {
        Ok(()) => ui::display_success(&format!("Created tag: {tag_name}")),
        Err(e) => ui::display_warning(&format!("Failed to create tag '{tag_name}': {e}")),
    }
}
