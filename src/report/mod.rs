pub mod lava;
pub mod types;

use crate::error::CriticalFailure;
use crate::parser::tast;
use crate::runner::RunOutcome;
use crate::utils::config::Config;
use colored::Colorize;

pub use lava::{LavaReporter, Reporter};
pub use types::{Measurement, TestCaseResult, TranslateSummary, Verdict};

/// Translate whatever the results directory holds and report it.
///
/// Every parseable test case is reported before a recorded run failure is
/// turned into [`CriticalFailure::RunFailed`]. The only exceptions are a
/// missing on-device runner and a failure marker without stderr, which
/// short-circuit before the manifest is read.
pub async fn report_results(
    config: &Config,
    reporter: &dyn Reporter,
) -> Result<TranslateSummary, CriticalFailure> {
    let outcome = RunOutcome::load(config).map_err(|e| {
        log::error!("Failed to load run outcome: {:#}", e);
        CriticalFailure::RunFailed
    })?;

    if let RunOutcome::Failed { stderr, exit_code } = &outcome {
        log::warn!("tast run did not finish cleanly (exit code {:?})", exit_code);
        let Some(stderr) = stderr else {
            return Err(CriticalFailure::StderrMissing);
        };
        dump_stderr(stderr);
        if stderr.contains(&config.missing_runner_signature) {
            return Err(CriticalFailure::PartitionCorrupt);
        }
    }

    let records = tast::load_manifest(config)?;
    let mut summary = TranslateSummary::default();

    for record in &records {
        let mut result = tast::to_result(record);
        match tast::load_chart(&result.out_dir) {
            Ok(Some(chart)) => result.measurements = tast::parse_measurements(&chart),
            Ok(None) => {}
            Err(e) => log::warn!("{}: ignoring results-chart: {:#}", result.name, e),
        }

        report_case(reporter, &result).await;
        summary.record(&result);
    }

    log::info!(
        "Reported {} test(s): {} passed, {} failed, {} skipped, {} measurement(s)",
        summary.total(),
        summary.passed,
        summary.failed,
        summary.skipped,
        summary.measurements
    );

    if outcome.is_failed() {
        return Err(CriticalFailure::RunFailed);
    }
    Ok(summary)
}

/// Report one case; measurements go into a test set named after the case
pub async fn report_case(reporter: &dyn Reporter, result: &TestCaseResult) {
    if !result.has_measurements() {
        reporter.test_case(&result.name, result.verdict, None).await;
        return;
    }

    reporter.test_set_start(&result.name).await;
    for measurement in &result.measurements {
        reporter
            .test_case(&measurement.name, result.verdict, Some(measurement))
            .await;
    }
    reporter.test_set_stop(&result.name).await;
}

/// Raise `failure` through the harness and return the exit status to use
pub async fn escalate(reporter: &dyn Reporter, failure: &CriticalFailure) -> i32 {
    println!("{} {}", "✗".red().bold(), failure.to_string().red());
    reporter.critical(&failure.to_string()).await;
    failure.exit_code()
}

fn dump_stderr(stderr: &str) {
    println!("### BEGIN STDERR DUMP ###");
    println!("{}", stderr);
    println!("### END STDERR DUMP ###");
}
