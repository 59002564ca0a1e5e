use std::fmt;
use std::path::PathBuf;

/// Test case verdict as understood by `lava-test-case --result`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Pass,
    Fail,
    Skip,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Pass => "pass",
            Verdict::Fail => "fail",
            Verdict::Skip => "skip",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single performance value reported as its own test case
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// `<group>.<submetric>`
    pub name: String,
    /// Scalar rendered as text, as passed to `--measurement`
    pub value: String,
    pub units: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestCaseResult {
    pub name: String,
    pub verdict: Verdict,
    pub out_dir: PathBuf,
    pub measurements: Vec<Measurement>,
}

impl TestCaseResult {
    pub fn has_measurements(&self) -> bool {
        !self.measurements.is_empty()
    }
}

/// Counts of what the translate stage reported
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslateSummary {
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
    pub measurements: u32,
}

impl TranslateSummary {
    pub fn record(&mut self, result: &TestCaseResult) {
        match result.verdict {
            Verdict::Pass => self.passed += 1,
            Verdict::Fail => self.failed += 1,
            Verdict::Skip => self.skipped += 1,
        }
        self.measurements += result.measurements.len() as u32;
    }

    pub fn total(&self) -> u32 {
        self.passed + self.failed + self.skipped
    }
}
