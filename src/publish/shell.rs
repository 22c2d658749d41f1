//! Shell execution utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::process::Command;

/// Captured result of one finished command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Command line as displayed to the user
    pub command: String,
    /// Exit code, `None` when killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs programs in a fixed working directory
#[derive(Debug, Clone)]
pub struct Shell {
    /// Current working directory
    cwd: PathBuf,
}

impl Shell {
    /// Create a shell with a specific working directory
    pub fn with_cwd(cwd: PathBuf) -> Self {
        Self { cwd }
    }

    /// Run `program` with `args` and capture its output.
    ///
    /// A non-zero exit is not an error here; only failing to start is.
    pub async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let command = display_command(program, args);
        tracing::debug!("Running '{}' in {}", command, self.cwd.display());

        let output = Command::new(program)
            .args(args)
            .current_dir(&self.cwd)
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("Failed to start '{command}'"))?;

        let result = CommandOutput {
            command,
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !result.success() {
            tracing::warn!("'{}' exited with {:?}", result.command, result.code);
        }
        Ok(result)
    }
}

/// Render a command line for transcripts and logs
pub fn display_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}
