//! Build, commit and push the site

use std::fmt::Write as _;

use super::shell::{display_command, CommandOutput, Shell};
use crate::core::config::SiteConfig;
use crate::core::project::Project;
use crate::site;

/// Transcript of a deployment run
#[derive(Debug, Clone, Default)]
pub struct DeployReport {
    pub transcript: String,
    pub success: bool,
}

enum StepError {
    /// The command ran and exited non-zero
    Failed(CommandOutput),
    /// The step could not run at all
    Aborted { command: String, reason: String },
}

/// Rebuild the site, then `git add`, `git commit` and optionally `git push`.
///
/// Stops at the first failing step; the transcript records every step's
/// output either way.
pub async fn deploy(project: &Project, config: &SiteConfig, message: &str) -> DeployReport {
    let message = config.commit_message_or_default(message).to_string();
    let mut report = DeployReport::default();

    tracing::info!("Deploying from {}", project.root.display());
    match run_steps(project, config, &message, &mut report.transcript).await {
        Ok(()) => {
            report.transcript.push_str("\n✅ DEPLOYMENT SUCCESSFUL! ✅\nYour website is now live.");
            report.success = true;
            tracing::info!("Deployment finished");
        }
        Err(error) => {
            report.transcript.push_str("\n\n❌ DEPLOYMENT FAILED! ❌\n");
            match error {
                StepError::Failed(output) => {
                    let _ = writeln!(
                        report.transcript,
                        "Command '{}' returned non-zero exit status {}.",
                        output.command,
                        output.code.map_or_else(|| "unknown".to_string(), |c| c.to_string())
                    );
                    report.transcript.push_str("\n--- STDOUT ---\n");
                    report.transcript.push_str(&output.stdout);
                    report.transcript.push_str("\n--- STDERR ---\n");
                    report.transcript.push_str(&output.stderr);
                    tracing::error!("Deployment failed at '{}'", output.command);
                }
                StepError::Aborted { command, reason } => {
                    let _ = writeln!(report.transcript, "Command '{command}' could not run.");
                    report.transcript.push_str(&reason);
                    tracing::error!("Deployment failed at '{}': {}", command, reason);
                }
            }
        }
    }

    report
}

async fn run_steps(
    project: &Project,
    config: &SiteConfig,
    message: &str,
    transcript: &mut String,
) -> Result<(), StepError> {
    transcript.push_str(">>> Building site...\n");
    let build_project = project.clone();
    let build_config = config.clone();
    let built = tokio::task::spawn_blocking(move || site::build(&build_project, &build_config))
        .await
        .map_err(|e| StepError::Aborted {
            command: "build".to_string(),
            reason: e.to_string(),
        })?;
    match built {
        Ok(build_report) => {
            transcript.push_str(&build_report.summary());
            transcript.push('\n');
        }
        Err(e) => {
            return Err(StepError::Aborted {
                command: "build".to_string(),
                reason: format!("{e:#}"),
            })
        }
    }

    let shell = Shell::with_cwd(project.root.clone());

    transcript.push_str(">>> Running git add . ...\n");
    let add = run_step(&shell, &["add", "."]).await?;
    append_output(transcript, &add);

    let _ = writeln!(transcript, ">>> Running git commit -m \"{message}\"...");
    let commit = run_step(&shell, &["commit", "-m", message]).await?;
    append_output(transcript, &commit);

    if config.deploy.push {
        transcript.push_str(">>> Running git push...\n");
        let push = run_step(&shell, &["push"]).await?;
        append_output(transcript, &push);
    } else {
        transcript.push_str(">>> Skipping git push (disabled in configuration)\n");
    }

    Ok(())
}

/// Append a step's stdout and stderr, skipping empty streams
fn append_output(transcript: &mut String, output: &CommandOutput) {
    for stream in [&output.stdout, &output.stderr] {
        if !stream.trim().is_empty() {
            transcript.push_str(stream.trim_end());
            transcript.push('\n');
        }
    }
}

async fn run_step(shell: &Shell, args: &[&str]) -> Result<CommandOutput, StepError> {
    match shell.run("git", args).await {
        Ok(output) if output.success() => Ok(output),
        Ok(output) => Err(StepError::Failed(output)),
        Err(e) => Err(StepError::Aborted {
            command: display_command("git", args),
            reason: format!("{e:#}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fails_outside_a_repository() {
        let dir = tempfile::tempdir().unwrap();
        // A dangling gitdir stops git from looking above the temp dir
        std::fs::write(dir.path().join(".git"), "gitdir: /nonexistent/sitesmith\n").unwrap();
        let config = SiteConfig::default();
        let project = Project::new(dir.path(), &config);

        let report = deploy(&project, &config, "").await;

        assert!(!report.success);
        assert!(report.transcript.starts_with(">>> Building site...\n"));
        assert!(report.transcript.contains("Build finished: 0 pages."));
        assert!(report.transcript.contains(">>> Running git add . ..."));
        assert!(report.transcript.contains("DEPLOYMENT FAILED"));
        assert!(!report.transcript.contains("git commit"));
    }

    #[tokio::test]
    async fn broken_template_stops_before_git() {
        let dir = tempfile::tempdir().unwrap();
        let config = SiteConfig::default();
        let project = Project::new(dir.path(), &config);
        std::fs::create_dir_all(&project.templates).unwrap();
        std::fs::write(project.templates.join("index.html"), "{% if %}").unwrap();

        let report = deploy(&project, &config, "Update").await;

        assert!(!report.success);
        assert!(report.transcript.contains("Command 'build' could not run."));
        assert!(!report.transcript.contains("git add"));
    }

    fn git(dir: &std::path::Path, args: &[&str]) {
        let output = std::process::Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap();
        assert!(output.status.success(), "git {args:?} failed");
    }

    #[tokio::test]
    async fn commits_without_push() {
        let dir = tempfile::tempdir().unwrap();
        git(dir.path(), &["init", "--quiet"]);
        git(dir.path(), &["config", "user.name", "Site Editor"]);
        git(dir.path(), &["config", "user.email", "editor@example.com"]);
        git(dir.path(), &["config", "commit.gpgsign", "false"]);
        std::fs::write(dir.path().join("README"), "shop site\n").unwrap();

        let mut config = SiteConfig::default();
        config.deploy.push = false;
        let project = Project::new(dir.path(), &config);

        let report = deploy(&project, &config, "First publish").await;

        assert!(report.success, "{}", report.transcript);
        assert!(report
            .transcript
            .contains(">>> Running git commit -m \"First publish\"..."));
        assert!(report.transcript.contains("(root-commit)"));
        assert!(report
            .transcript
            .contains(">>> Skipping git push (disabled in configuration)"));
        assert!(!report.transcript.contains("Running git push"));
        assert!(report.transcript.ends_with("DEPLOYMENT SUCCESSFUL! ✅\nYour website is now live."));

        let log = std::process::Command::new("git")
            .args(["log", "--format=%s"])
            .current_dir(dir.path())
            .output()
            .unwrap();
        assert_eq!(String::from_utf8_lossy(&log.stdout).trim(), "First publish");
    }

    #[test]
    fn output_streams_are_appended() {
        let output = CommandOutput {
            command: "git commit".to_string(),
            code: Some(0),
            stdout: "[main abc123] Update\n".to_string(),
            stderr: "hint: something\n".to_string(),
        };
        let mut transcript = String::new();
        append_output(&mut transcript, &output);
        assert_eq!(transcript, "[main abc123] Update\nhint: something\n");

        let quiet = CommandOutput {
            stdout: String::new(),
            stderr: "  \n".to_string(),
            ..output
        };
        let mut transcript = String::new();
        append_output(&mut transcript, &quiet);
        assert!(transcript.is_empty());
    }
}
