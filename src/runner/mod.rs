pub mod outcome;

use crate::utils::command::ExternalCommand;
use crate::utils::config::Config;
use anyhow::{Context, Result};
use colored::Colorize;

pub use outcome::RunOutcome;

/// Run tast against the DUT, recording a failed run in the results directory.
///
/// Returns the runner's exit code. A non-zero code is not an error here: the
/// stderr and code are persisted as sentinels so the translate stage can still
/// harvest partial results, and the caller decides whether to escalate.
pub async fn run_tests(config: &Config, selectors: &[String]) -> Result<i32> {
    prepare_results_dir(config).await?;
    let address = resolve_dut(config).await?;

    println!(
        "{} Running tast against {} ({} selector(s))",
        "▶".green().bold(),
        address.cyan(),
        selectors.len()
    );

    let run = tast_command(config, &address, selectors).capture().await?;
    if run.success() {
        log::info!("tast finished cleanly");
        return Ok(0);
    }

    let exit_code = run.exit_code();
    println!(
        "{} Failed to run tast tests: exit code {}",
        "✗".red().bold(),
        exit_code
    );
    RunOutcome::Failed {
        exit_code: Some(exit_code),
        stderr: Some(run.stderr),
    }
    .persist(config)?;

    Ok(exit_code)
}

/// DUT address: the configured one, else the trimmed output of discovery
pub async fn resolve_dut(config: &Config) -> Result<String> {
    if let Some(address) = &config.dut_address {
        return Ok(address.clone());
    }

    let output = ExternalCommand::new(&config.target_ip_command)
        .output_checked()
        .await
        .context("Failed to discover DUT address")?;
    let address = output.trim();
    if address.is_empty() {
        anyhow::bail!("`{}` printed no DUT address", config.target_ip_command);
    }

    log::debug!("DUT address: {}", address);
    Ok(address.to_string())
}

/// Create the results directory and hand it to the runner user
async fn prepare_results_dir(config: &Config) -> Result<()> {
    let dir = &config.results_dir;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let Some(user) = &config.run_as else {
        return Ok(());
    };

    let uid = ExternalCommand::new("id")
        .args(["-u", user.as_str()])
        .output_checked()
        .await
        .with_context(|| format!("Failed to look up user {}", user))?;
    let uid: u32 = uid
        .trim()
        .parse()
        .with_context(|| format!("Unexpected uid for {}: {:?}", user, uid))?;

    #[cfg(unix)]
    std::os::unix::fs::chown(dir, Some(uid), Some(0))
        .with_context(|| format!("Failed to chown {} to {}", dir.display(), user))?;
    #[cfg(not(unix))]
    log::warn!("Skipping chown of {} to uid {}", dir.display(), uid);

    Ok(())
}

/// Full tast invocation, wrapped in `sudo` when a runner user is configured
pub fn tast_command(config: &Config, address: &str, selectors: &[String]) -> ExternalCommand {
    let tast_args = [
        "run".to_string(),
        format!("-resultsdir={}", config.results_dir.display()),
        "-sysinfo=false".to_string(),
        "-build=false".to_string(),
        address.to_string(),
    ];

    let cmd = match &config.run_as {
        Some(user) => ExternalCommand::new("sudo")
            .args(["-u", user.as_str(), "--login"])
            .arg(&config.tast_path),
        None => ExternalCommand::new(&config.tast_path),
    };

    cmd.args(tast_args).args(selectors.iter().cloned())
}
