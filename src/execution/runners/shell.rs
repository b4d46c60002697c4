//! `shell` runner: executes a bash command.
//!
//! Handles:
//! - Placeholder substitution from context variables (`{name}`)
//! - Script generation in a temporary directory
//! - Working directory selection (`cwd` parameter or runner default)
//! - Stdout capture into the context under `{step_id}_stdout`

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use log::{debug, error, warn};
use once_cell::sync::Lazy;
use serde_json::Value;
use tempfile::{Builder, TempPath};

use crate::execution::step::{Step, StepError, StepResult};
use crate::workflow::{FlowContext, StepConfig};

/// Directory where generated step scripts are written.
static SCRIPT_DIR: Lazy<PathBuf> = Lazy::new(|| std::env::temp_dir().join("flowrunner_scripts"));

#[derive(Debug, Default, Clone)]
pub struct ShellStep {
    working_dir: Option<PathBuf>,
}

impl ShellStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory commands run in when a step has no `cwd`.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

/// Context key holding a step's captured stdout.
pub fn stdout_key(step_id: &str) -> String {
    format!("{}_stdout", step_id)
}

impl Step for ShellStep {
    fn execute(&self, ctx: &mut FlowContext, config: &StepConfig) -> Result<StepResult, StepError> {
        let command = config
            .param_str("command")
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| format!("Step '{}' has no command specified", config.id))?;

        let command_text = render_command(command, ctx);
        let script_path = create_execution_script(&ctx.instance_id, &config.id, &command_text)?;

        let working_dir = config
            .param_str("cwd")
            .map(PathBuf::from)
            .or_else(|| self.working_dir.clone());

        let output = execute_with_bash(&script_path, working_dir.as_deref());

        let script_display = script_path.display().to_string();
        if let Err(e) = script_path.close() {
            warn!("Failed to clean up script {}: {}", script_display, e);
        }
        let output = output?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if output.status.success() {
            debug!("Step '{}' completed successfully", config.id);
            if !stdout.trim().is_empty() {
                debug!("Step '{}' output:\n{}", config.id, stdout);
            }
            ctx.set_variable(stdout_key(&config.id), stdout.trim_end());
            return Ok(StepResult::success());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        error!(
            "Step '{}' failed with exit code: {:?}",
            config.id,
            output.status.code()
        );
        if !stderr.trim().is_empty() {
            error!("stderr:\n{}", stderr);
        }

        let message = match output.status.code() {
            Some(code) => format!("Command exited with code {}", code),
            None => "Command terminated by signal".to_string(),
        };
        Ok(StepResult::fail(message, true))
    }
}

/// Replaces `{name}` placeholders with context variables.
///
/// String values are inserted verbatim, other values as JSON.
fn render_command(command: &str, ctx: &FlowContext) -> String {
    ctx.variables
        .iter()
        .fold(command.to_string(), |text, (key, value)| {
            let placeholder = format!("{{{}}}", key);
            if !text.contains(&placeholder) {
                return text;
            }
            let replacement = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            text.replace(&placeholder, &replacement)
        })
}

/// Keeps ASCII letters, digits, `-` and `_`; everything else becomes `_`.
fn file_name_safe(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// Writes a bash script for the step under a unique name.
///
/// The script is removed when the returned path is dropped.
fn create_execution_script(
    instance_id: &str,
    step_id: &str,
    command_text: &str,
) -> Result<TempPath, StepError> {
    fs::create_dir_all(&*SCRIPT_DIR)?;

    let owner = if instance_id.is_empty() { "adhoc" } else { instance_id };
    let prefix = format!("{}_{}_", file_name_safe(owner), file_name_safe(step_id));
    let mut file = Builder::new()
        .prefix(&prefix)
        .suffix(".sh")
        .tempfile_in(&*SCRIPT_DIR)?;

    writeln!(file, "#!/bin/bash")?;
    writeln!(file, "set -e")?;
    writeln!(file, "{}", command_text)?;
    file.flush()?;

    let script_path = file.into_temp_path();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&script_path, fs::Permissions::from_mode(0o755))?;
    }

    Ok(script_path)
}

fn execute_with_bash(script_path: &Path, working_dir: Option<&Path>) -> Result<Output, StepError> {
    let mut cmd = Command::new("bash");
    cmd.arg(script_path);

    if let Some(dir) = working_dir {
        cmd.current_dir(dir);
        debug!("Executing in directory: {}", dir.display());
    }

    Ok(cmd.output()?)
}
