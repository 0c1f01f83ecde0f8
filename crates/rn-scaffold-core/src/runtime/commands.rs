//! Post-materialization commands: dependency install, pod install, git init
//!
//! Each step runs as a child process with streamed output and a timeout.
//! Failures carry the command to run by hand and never undo the project.

use crate::config::{PackageManager, ProjectConfig};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

/// Timeout for dependency installation
const INSTALL_TIMEOUT: Duration = Duration::from_secs(600);
/// Timeout for `pod install`
const PODS_TIMEOUT: Duration = Duration::from_secs(900);
/// Timeout for each git invocation
const GIT_TIMEOUT: Duration = Duration::from_secs(60);

pub const INITIAL_COMMIT_MESSAGE: &str = "Initial commit";

/// An external command run after the project is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalStep {
    Install(PackageManager),
    Pods,
    Git,
}

impl ExternalStep {
    /// Steps to run for a configuration, in order
    pub fn planned(config: &ProjectConfig, pods_supported: bool) -> Vec<ExternalStep> {
        let mut steps = Vec::new();
        if !config.skip_install {
            steps.push(ExternalStep::Install(config.package_manager));
            if !config.skip_pods && pods_supported {
                steps.push(ExternalStep::Pods);
            }
        }
        if !config.skip_git {
            steps.push(ExternalStep::Git);
        }
        steps
    }

    /// Steps the project still needs but the configuration skipped, in order
    pub fn deferred(config: &ProjectConfig, pods_supported: bool) -> Vec<ExternalStep> {
        let mut steps = Vec::new();
        if config.skip_install {
            steps.push(ExternalStep::Install(config.package_manager));
        }
        if pods_supported && (config.skip_install || config.skip_pods) {
            steps.push(ExternalStep::Pods);
        }
        steps
    }

    /// Position in the run order
    pub fn order(&self) -> u8 {
        match self {
            ExternalStep::Install(_) => 0,
            ExternalStep::Pods => 1,
            ExternalStep::Git => 2,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ExternalStep::Install(_) => "Installing dependencies",
            ExternalStep::Pods => "Installing CocoaPods",
            ExternalStep::Git => "Initializing git repository",
        }
    }

    /// Shell command the user can run to finish the step by hand
    pub fn manual_command(&self) -> String {
        match self {
            ExternalStep::Install(manager) => format!("{} install", manager),
            ExternalStep::Pods => "cd ios && pod install && cd ..".to_string(),
            ExternalStep::Git => format!(
                "git init && git add -A && git commit -m \"{}\"",
                INITIAL_COMMIT_MESSAGE
            ),
        }
    }

    /// Invocations as (program, args, working directory relative to the project)
    fn invocations(&self) -> Vec<(&'static str, Vec<&'static str>, &'static str)> {
        match self {
            ExternalStep::Install(manager) => vec![(manager.command(), vec!["install"], "")],
            ExternalStep::Pods => vec![("pod", vec!["install"], "ios")],
            ExternalStep::Git => vec![
                ("git", vec!["init", "--quiet"], ""),
                ("git", vec!["add", "-A"], ""),
                (
                    "git",
                    vec!["commit", "--quiet", "-m", INITIAL_COMMIT_MESSAGE],
                    "",
                ),
            ],
        }
    }

    fn timeout(&self) -> Duration {
        match self {
            ExternalStep::Install(_) => INSTALL_TIMEOUT,
            ExternalStep::Pods => PODS_TIMEOUT,
            ExternalStep::Git => GIT_TIMEOUT,
        }
    }

    /// Run the step inside `project_dir`
    pub async fn run(&self, project_dir: &Path) -> Result<()> {
        for (program, args, subdir) in self.invocations() {
            let cwd: PathBuf = if subdir.is_empty() {
                project_dir.to_path_buf()
            } else {
                project_dir.join(subdir)
            };
            run_streaming(program, &args, &cwd, self.timeout())
                .await
                .with_context(|| {
                    format!(
                        "{} failed. Run it manually in {}:\n  {}",
                        self.description(),
                        project_dir.display(),
                        self.manual_command()
                    )
                })?;
        }
        Ok(())
    }
}

/// Run a command, echoing its output, and fail on non-zero exit or timeout
pub async fn run_streaming(
    program: &str,
    args: &[&str],
    cwd: &Path,
    limit: Duration,
) -> Result<()> {
    let display = format!("{} {}", program, args.join(" "));
    println!("{} {}", "Running:".dimmed(), display.yellow());

    let mut child = TokioCommand::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("Failed to start {}", program))?;

    let stdout = child
        .stdout
        .take()
        .context("Failed to capture stdout")?;
    let stderr = child
        .stderr
        .take()
        .context("Failed to capture stderr")?;

    let mut stdout_reader = BufReader::new(stdout).lines();
    let mut stderr_reader = BufReader::new(stderr).lines();

    let output_task = async {
        let (mut stdout_done, mut stderr_done) = (false, false);
        while !(stdout_done && stderr_done) {
            tokio::select! {
                line = stdout_reader.next_line(), if !stdout_done => {
                    match line {
                        Ok(Some(line)) => println!("  {}", line.dimmed()),
                        Ok(None) => stdout_done = true,
                        Err(e) => {
                            eprintln!("{} {}", "Error reading stdout:".red(), e);
                            stdout_done = true;
                        }
                    }
                }
                line = stderr_reader.next_line(), if !stderr_done => {
                    match line {
                        Ok(Some(line)) => eprintln!("  {}", line.yellow()),
                        Ok(None) => stderr_done = true,
                        Err(e) => {
                            eprintln!("{} {}", "Error reading stderr:".red(), e);
                            stderr_done = true;
                        }
                    }
                }
            }
        }
    };

    if timeout(limit, output_task).await.is_err() {
        let _ = child.kill().await;
        anyhow::bail!("{} timed out after {} seconds", display, limit.as_secs());
    }

    match timeout(Duration::from_secs(5), child.wait()).await {
        Ok(Ok(status)) if status.success() => Ok(()),
        Ok(Ok(status)) => anyhow::bail!(
            "{} exited with code {}",
            display,
            status.code().unwrap_or(-1)
        ),
        Ok(Err(e)) => Err(e).with_context(|| format!("Failed to wait for {}", display)),
        Err(_) => {
            let _ = child.kill().await;
            anyhow::bail!("{} hung after closing its output", display)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planned_steps_respect_skips() {
        let mut config = ProjectConfig::new("MyApp", "com.acme.myapp", "My App");
        config.package_manager = PackageManager::Yarn;
        assert_eq!(
            ExternalStep::planned(&config, true),
            vec![
                ExternalStep::Install(PackageManager::Yarn),
                ExternalStep::Pods,
                ExternalStep::Git
            ]
        );
        assert_eq!(
            ExternalStep::planned(&config, false),
            vec![ExternalStep::Install(PackageManager::Yarn), ExternalStep::Git]
        );

        config.skip_install = true;
        config.skip_git = true;
        assert!(ExternalStep::planned(&config, true).is_empty());
    }

    #[test]
    fn test_deferred_steps_follow_skips() {
        let mut config = ProjectConfig::new("MyApp", "com.acme.myapp", "My App");
        assert!(ExternalStep::deferred(&config, true).is_empty());

        config.skip_pods = true;
        assert_eq!(ExternalStep::deferred(&config, true), vec![ExternalStep::Pods]);
        assert!(ExternalStep::deferred(&config, false).is_empty());

        config.skip_install = true;
        config.skip_git = true;
        assert_eq!(
            ExternalStep::deferred(&config, true),
            vec![ExternalStep::Install(PackageManager::Npm), ExternalStep::Pods]
        );
    }

    #[test]
    fn test_manual_commands() {
        assert_eq!(
            ExternalStep::Install(PackageManager::Pnpm).manual_command(),
            "pnpm install"
        );
        assert_eq!(ExternalStep::Pods.manual_command(), "cd ios && pod install && cd ..");
    }

    #[tokio::test]
    async fn test_missing_program_fails_with_manual_hint() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = run_streaming(
            "rn-scaffold-definitely-not-a-binary",
            &[],
            dir.path(),
            Duration::from_secs(5),
        )
        .await;
        assert!(result.is_err());
    }
}
