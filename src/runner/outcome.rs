//! Run outcome persisted as sentinel files in the results directory.
//!
//! `failed_run` holds the runner's exit code as text and `stderr.log` its
//! captured stderr. Their absence means the run finished cleanly. This is the
//! only place that knows the on-disk format.

use crate::utils::config::Config;
use anyhow::{Context, Result};
use std::fs;

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Clean,
    Failed {
        /// `None` if the marker did not hold an integer
        exit_code: Option<i32>,
        /// `None` if `stderr.log` is missing
        stderr: Option<String>,
    },
}

impl RunOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }

    /// Write the sentinels for a failed run; a clean outcome writes nothing
    pub fn persist(&self, config: &Config) -> Result<()> {
        let RunOutcome::Failed { exit_code, stderr } = self else {
            return Ok(());
        };

        if let Some(stderr) = stderr {
            let path = config.stderr_file();
            fs::write(&path, stderr)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }

        let path = config.failed_run_file();
        let code = exit_code.map(|c| c.to_string()).unwrap_or_default();
        fs::write(&path, code).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn load(config: &Config) -> Result<Self> {
        let marker = config.failed_run_file();
        if !marker.is_file() {
            return Ok(RunOutcome::Clean);
        }

        let raw = fs::read_to_string(&marker)
            .with_context(|| format!("Failed to read {}", marker.display()))?;
        let exit_code = raw.trim().parse::<i32>().ok();
        if exit_code.is_none() {
            log::warn!("{} does not hold an exit code: {:?}", marker.display(), raw);
        }

        let stderr_path = config.stderr_file();
        let stderr = if stderr_path.is_file() {
            let bytes = fs::read(&stderr_path)
                .with_context(|| format!("Failed to read {}", stderr_path.display()))?;
            Some(String::from_utf8_lossy(&bytes).to_string())
        } else {
            None
        };

        Ok(RunOutcome::Failed { exit_code, stderr })
    }
}
