use std::path::{Path, PathBuf};

/// Name of the runner manifest inside the results directory
pub const RESULTS_FILE: &str = "results.json";
/// Per-test measurement manifest inside a test's `outDir`
pub const RESULTS_CHART_FILE: &str = "results-chart.json";
/// Sentinel holding the runner's exit code
pub const FAILED_RUN_FILE: &str = "failed_run";
/// Sentinel holding the runner's captured stderr
pub const STDERR_FILE: &str = "stderr.log";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory tast writes its results into
    pub results_dir: PathBuf,

    /// Path to the tast binary, as seen by the runner user
    pub tast_path: String,

    /// Run tast through `sudo -u <user> --login` and chown the results dir to them
    pub run_as: Option<String>,

    /// Fixed DUT address; skips discovery when set
    pub dut_address: Option<String>,

    /// Command printing the DUT address on stdout
    pub target_ip_command: String,

    /// Reporting helpers
    pub test_case_command: String,
    pub test_set_command: String,
    pub raise_command: String,

    /// stderr fragment meaning the on-device test binary is gone
    pub missing_runner_signature: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("/tmp/results"),
            tast_path: "./tast".to_string(),
            run_as: Some("cros".to_string()),
            dut_address: None,
            target_ip_command: "lava-target-ip".to_string(),
            test_case_command: "lava-test-case".to_string(),
            test_set_command: "lava-test-set".to_string(),
            raise_command: "lava-test-raise".to_string(),
            missing_runner_signature:
                "'/usr/local/bin/local_test_runner': No such file or directory".to_string(),
        }
    }
}

impl Config {
    /// Default configuration pointed at another results directory
    pub fn with_results_dir(results_dir: impl Into<PathBuf>) -> Self {
        Self {
            results_dir: results_dir.into(),
            ..Self::default()
        }
    }

    pub fn results_file(&self) -> PathBuf {
        self.results_dir.join(RESULTS_FILE)
    }

    pub fn failed_run_file(&self) -> PathBuf {
        self.results_dir.join(FAILED_RUN_FILE)
    }

    pub fn stderr_file(&self) -> PathBuf {
        self.results_dir.join(STDERR_FILE)
    }

    pub fn results_chart_file(out_dir: &Path) -> PathBuf {
        out_dir.join(RESULTS_CHART_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let config = Config::default();
        assert_eq!(config.results_file(), PathBuf::from("/tmp/results/results.json"));
        assert_eq!(config.failed_run_file(), PathBuf::from("/tmp/results/failed_run"));
        assert_eq!(config.stderr_file(), PathBuf::from("/tmp/results/stderr.log"));
        assert_eq!(config.run_as.as_deref(), Some("cros"));
    }

    #[test]
    fn test_with_results_dir_keeps_other_defaults() {
        let config = Config::with_results_dir("/var/tmp/x");
        assert_eq!(config.results_file(), PathBuf::from("/var/tmp/x/results.json"));
        assert_eq!(config.target_ip_command, "lava-target-ip");
        assert_eq!(
            Config::results_chart_file(Path::new("/tmp/a")),
            PathBuf::from("/tmp/a/results-chart.json")
        );
    }
}
