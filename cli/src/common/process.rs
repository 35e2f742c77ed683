//! # Jolt Process Execution Utilities (`common::process`)
//!
//! File: cli/src/common/process.rs
//!
//! ## Overview
//!
//! Every Jolt command ends up invoking an external binary. This module is the
//! single place that spawns them, with two modes:
//!
//! - **Capture** (`capture`): stdin closed, stdout/stderr collected. Used by the
//!   configuration resolver for small JSON responses (`compose config`,
//!   `terraform output -json`, `git rev-parse HEAD`).
//! - **Streamed** (`run_streamed`): stdio inherited, exit code returned so the
//!   caller can relay it. Used by `jolt run`.
//!
//! Spawn errors are classified into `JoltError::CommandNotFound` (the binary is
//! missing) and `JoltError::CommandSpawn` (anything else). A non-zero exit on a
//! capture that requires success becomes `JoltError::ExternalCommand`.
//!
//! ## Architecture
//!
//! The resolver does not call these functions directly; it goes through the
//! `ToolRunner` trait so tests can substitute a fake that counts invocations or
//! delays responses. `SystemRunner` is the real implementation.
//!
//! ## Usage
//!
//! ```rust
//! let (program, args) = process::split_command("docker compose")?;
//! let output = process::capture(&program, &[args, vec!["ps".into()]].concat()).await?;
//! if output.success() {
//!     println!("{}", output.stdout);
//! }
//! ```
//!
use crate::common::system;
use crate::core::error::{JoltError, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Renders `program args...` for logs and error messages.
pub fn display_command(program: &str, args: &[String]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

/// Splits a resolved command string such as `docker compose` into program and leading args.
pub fn split_command(command: &str) -> Result<(String, Vec<String>)> {
    let mut parts = shlex::split(command)
        .ok_or_else(|| JoltError::ArgumentParsing(format!("Unbalanced quotes in command '{}'", command)))?
        .into_iter();
    let program = parts
        .next()
        .ok_or_else(|| JoltError::ArgumentParsing("Empty command".to_string()))?;
    Ok((program, parts.collect()))
}

fn classify_spawn_error(cmd: String, source: std::io::Error) -> JoltError {
    if source.kind() == ErrorKind::NotFound {
        JoltError::CommandNotFound { cmd }
    } else {
        JoltError::CommandSpawn { cmd, source }
    }
}

/// Runs a process to completion and captures its output. Non-zero exits are not errors here.
pub async fn capture(program: &str, args: &[String]) -> Result<CommandOutput> {
    let rendered = display_command(program, args);
    debug!("Capturing: {}", rendered);

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| classify_spawn_error(program.to_string(), e))?;

    let result = CommandOutput {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    debug!("'{}' exited with {:?}", rendered, result.code);
    Ok(result)
}

/// Turns an unsuccessful `CommandOutput` into `JoltError::ExternalCommand`.
pub fn ensure_success(program: &str, args: &[String], output: CommandOutput) -> Result<CommandOutput> {
    if output.success() {
        return Ok(output);
    }
    let status = output
        .code
        .map(|c| c.to_string())
        .unwrap_or_else(|| "terminated by signal".to_string());
    Err(JoltError::ExternalCommand {
        cmd: display_command(program, args),
        status,
        output: output.stderr.trim().to_string(),
    }
    .into())
}

/// Runs a process with inherited stdio and returns its exit code.
pub async fn run_streamed(program: &str, args: &[String]) -> Result<i32> {
    let rendered = display_command(program, args);
    debug!("Running: {}", rendered);

    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|e| classify_spawn_error(program.to_string(), e))?;

    match status.code() {
        Some(code) => Ok(code),
        None => {
            warn!("'{}' was terminated by a signal", rendered);
            // Shell convention for "killed".
            Ok(128)
        }
    }
}

/// The seam through which the resolver reaches external tools.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Runs `program args...` and captures its output.
    async fn capture(&self, program: &str, args: &[String]) -> Result<CommandOutput>;

    /// Whether `program` can be found on PATH.
    fn is_on_path(&self, program: &str) -> bool;
}

/// Runs real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl ToolRunner for SystemRunner {
    async fn capture(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        capture(program, args).await
    }

    fn is_on_path(&self, program: &str) -> bool {
        system::is_on_path(program)
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_command() {
        let (program, args) = split_command("docker compose").unwrap();
        assert_eq!(program, "docker");
        assert_eq!(args, vec!["compose"]);

        let (program, args) = split_command("ssh -i '/keys/my key.pem'").unwrap();
        assert_eq!(program, "ssh");
        assert_eq!(args, vec!["-i", "/keys/my key.pem"]);
    }

    #[test]
    fn test_split_command_rejects_empty_and_unbalanced() {
        assert!(split_command("   ").is_err());
        assert!(split_command("docker 'compose").is_err());
    }

    #[test]
    fn test_display_command() {
        assert_eq!(display_command("git", &[]), "git");
        assert_eq!(
            display_command("git", &["rev-parse".into(), "HEAD".into()]),
            "git rev-parse HEAD"
        );
    }

    #[test]
    fn test_ensure_success_reports_stderr() {
        let output = CommandOutput {
            code: Some(2),
            stdout: String::new(),
            stderr: "  no outputs found \n".into(),
        };
        let err = ensure_success("terraform", &["output".into()], output).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("terraform output"));
        assert!(msg.contains("Status: 2"));
        assert!(msg.contains("no outputs found"));
    }

    #[tokio::test]
    async fn test_capture_missing_binary_is_classified() {
        let err = capture("jolt-definitely-not-a-real-binary", &[])
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<JoltError>(),
            Some(JoltError::CommandNotFound { .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_capture_and_stream_real_process() {
        let output = capture("sh", &["-c".into(), "echo hi; echo oops >&2; exit 3".into()])
            .await
            .unwrap();
        assert_eq!(output.code, Some(3));
        assert_eq!(output.stdout.trim(), "hi");
        assert_eq!(output.stderr.trim(), "oops");
        assert!(!output.success());

        let code = run_streamed("sh", &["-c".into(), "exit 5".into()]).await.unwrap();
        assert_eq!(code, 5);
    }
}
