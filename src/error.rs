use thiserror::Error;

/// Terminal conditions escalated through `lava-test-raise`.
///
/// Each variant renders to the exact message sent to the harness.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CriticalFailure {
    /// The on-device test binary is missing, results are meaningless
    #[error("cros-partition-corrupt")]
    PartitionCorrupt,

    #[error("Tast tests run failed, stderr not found")]
    StderrMissing,

    #[error("Tast tests run failed, results not found")]
    ResultsMissing,

    /// Manifest unreadable, malformed or empty
    #[error("Tast tests run failed, no results")]
    NoResults,

    /// Results were reported but the run itself did not finish cleanly
    #[error("Tast tests run failed")]
    RunFailed,

    /// Legacy mode: the run stage failed before translation
    #[error("Tast tests run_tests failed")]
    RunStageFailed,
}

impl CriticalFailure {
    /// Process exit status after escalation
    pub fn exit_code(&self) -> i32 {
        1
    }
}
