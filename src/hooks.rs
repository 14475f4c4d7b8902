use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Result, VbumpError};
use crate::ui;

/// Context information passed to a hook script
#[derive(Debug, Clone)]
pub struct HookContext {
    /// Version before the bump, in its canonical text form
    pub old_version: String,
    /// Version after the bump
    pub new_version: String,
    /// The directive word (or explicit literal) that drove the bump
    pub directive: String,
    /// Files the bump touches, in target order
    pub files: Vec<PathBuf>,
}

impl HookContext {
    /// Convert context to environment variables for the hook script
    ///
    /// Maps context fields to VBUMP_* environment variables; files are
    /// newline-joined.
    pub fn to_env_vars(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();

        env.insert("VBUMP_OLD_VERSION".to_string(), self.old_version.clone());
        env.insert("VBUMP_NEW_VERSION".to_string(), self.new_version.clone());
        env.insert("VBUMP_DIRECTIVE".to_string(), self.directive.clone());

        let files: Vec<String> = self
            .files
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        env.insert("VBUMP_FILES".to_string(), files.join("\n"));

        env
    }
}

/// Executes vbump hook scripts
pub struct HookExecutor;

impl HookExecutor {
    /// Execute a hook script with the given context
    ///
    /// The script runs with environment variables set from the context. Exit
    /// code 0 succeeds; anything else is a failure.
    pub fn execute(script_path: &str, context: &HookContext) -> Result<()> {
        let path = Path::new(script_path);

        if !path.exists() {
            return Err(VbumpError::hook(format!(
                "Hook script not found: {script_path}"
            )));
        }

        if !path.is_file() {
            return Err(VbumpError::hook(format!(
                "Hook path is not a file: {script_path}"
            )));
        }

        let mut cmd = Command::new(script_path);
        for (key, value) in context.to_env_vars() {
            cmd.env(key, value);
        }

        let output = cmd.output().map_err(|e| {
            VbumpError::hook(format!("Failed to execute hook {script_path}: {e}"))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VbumpError::hook(format!(
                "Hook {} failed with exit code {}: {}",
                script_path,
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        Ok(())
    }

    /// Try to execute a hook, reporting errors but not failing
    ///
    /// Used for after-apply hooks where the files are already written and a
    /// hook failure must not retroactively fail the bump.
    pub fn execute_permissive(script_path: &str, context: &HookContext) {
        match Self::execute(script_path, context) {
            Ok(()) => ui::display_success(&format!("Hook executed: {script_path}")),
            Err(e) => ui::display_warning(&format!("Hook warning: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> HookContext {
        HookContext {
            old_version: "1.2.3".to_string(),
            new_version: "1.2.4".to_string(),
            directive: "patch".to_string(),
            files: vec![PathBuf::from("a.toml"), PathBuf::from("b.json")],
        }
    }

    #[test]
    fn test_context_env_vars() {
        let env = context().to_env_vars();
        assert_eq!(env.get("VBUMP_OLD_VERSION"), Some(&"1.2.3".to_string()));
        assert_eq!(env.get("VBUMP_NEW_VERSION"), Some(&"1.2.4".to_string()));
        assert_eq!(env.get("VBUMP_DIRECTIVE"), Some(&"patch".to_string()));
        assert_eq!(env.get("VBUMP_FILES"), Some(&"a.toml\nb.json".to_string()));
    }

    #[test]
    fn test_nonexistent_hook_fails() {
        let result = HookExecutor::execute("/nonexistent/path/to/hook.sh", &context());
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Hook script not found"));
    }

    #[test]
    fn test_hook_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = HookExecutor::execute(dir.path().to_str().unwrap(), &context());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not a file"));
    }

    #[cfg(unix)]
    #[test]
    fn test_hook_exit_codes() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();

        let ok_path = dir.path().join("ok.sh");
        std::fs::write(&ok_path, "#!/bin/sh\ntest \"$VBUMP_NEW_VERSION\" = \"1.2.4\"\n").unwrap();
        std::fs::set_permissions(&ok_path, std::fs::Permissions::from_mode(0o755)).unwrap();
        assert!(HookExecutor::execute(ok_path.to_str().unwrap(), &context()).is_ok());

        let fail_path = dir.path().join("fail.sh");
        std::fs::write(&fail_path, "#!/bin/sh\nexit 3\n").unwrap();
        std::fs::set_permissions(&fail_path, std::fs::Permissions::from_mode(0o755)).unwrap();
        let err = HookExecutor::execute(fail_path.to_str().unwrap(), &context()).unwrap_err();
        assert!(err.to_string().contains("exit code 3"));
    }
}
