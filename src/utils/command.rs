use anyhow::{Context, Result};
use std::fmt;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;

/// An external program with its arguments.
///
/// Calls come in two flavours with different error contracts:
/// [`ExternalCommand::output_checked`] is strict and turns a failed
/// invocation into an error, [`ExternalCommand::run_best_effort`] only logs.
/// [`ExternalCommand::capture`] is used for the test runner, whose failure is
/// recorded by the caller rather than judged here.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalCommand {
    program: String,
    args: Vec<String>,
}

/// Exit status and stderr of a finished process
#[derive(Debug, Clone)]
pub struct CapturedRun {
    pub status: ExitStatus,
    pub stderr: String,
}

impl CapturedRun {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Exit code; a process killed by a signal maps to `128 + signal`
    pub fn exit_code(&self) -> i32 {
        if let Some(code) = self.status.code() {
            return code;
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = self.status.signal() {
                return 128 + signal;
            }
        }
        1
    }
}

impl ExternalCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    /// Run and return stdout; non-zero exit is an error carrying stderr
    pub async fn output_checked(&self) -> Result<String> {
        log::debug!("exec: {}", self);
        let output = self
            .command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .with_context(|| format!("Failed to execute: {}", self))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Command `{}` failed ({}): {}", self, output.status, stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Run with inherited stdout; failures are logged and otherwise ignored
    pub async fn run_best_effort(&self) {
        log::debug!("exec (best effort): {}", self);
        match self.command().stdin(Stdio::null()).status().await {
            Ok(status) if status.success() => {}
            Ok(status) => log::warn!("`{}` exited with {}", self, status),
            Err(e) => log::warn!("Failed to execute `{}`: {}", self, e),
        }
    }

    /// Run with inherited stdout and captured stderr, whatever the exit status
    pub async fn capture(&self) -> Result<CapturedRun> {
        log::info!("exec: {}", self);
        let output = self
            .command()
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .output()
            .await
            .with_context(|| format!("Failed to execute: {}", self))?;

        Ok(CapturedRun {
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

impl fmt::Display for ExternalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}
