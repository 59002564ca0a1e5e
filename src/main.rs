use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

use tast_lava::report::{LavaReporter, Reporter};
use tast_lava::{escalate, report_results, run_tests, Config, CriticalFailure};

#[derive(Parser, Debug)]
#[command(name = "tast-lava")]
#[command(version)]
#[command(about = "Run tast tests on a LAVA DUT and report the results to LAVA", long_about = None)]
#[command(override_usage = "tast-lava [OPTIONS] <--run [SELECTOR]...|--results|SELECTOR...>")]
struct Cli {
    /// Directory tast writes results into [default: /tmp/results]
    #[arg(long, env = "TAST_RESULTS_DIR")]
    results_dir: Option<PathBuf>,

    /// Path to the tast binary [default: ./tast]
    #[arg(long = "tast", env = "TAST_PATH")]
    tast_path: Option<String>,

    /// User tast runs as, via sudo [default: cros]
    #[arg(long, env = "TAST_RUN_AS")]
    run_as: Option<String>,

    /// Run tast directly instead of through sudo
    #[arg(long, default_value = "false")]
    no_sudo: bool,

    /// DUT address; skips discovery
    #[arg(long, env = "TAST_DUT")]
    dut: Option<String>,

    /// Command printing the DUT address [default: lava-target-ip]
    #[arg(long, env = "TAST_TARGET_IP_COMMAND")]
    target_ip_command: Option<String>,

    /// Debug logging
    #[arg(short, long, default_value = "false")]
    verbose: bool,

    /// Only run tast, recording a failed run in the results directory
    #[arg(
        long,
        num_args = 0..,
        allow_hyphen_values = true,
        value_name = "SELECTOR",
        conflicts_with_all = ["results", "tests"]
    )]
    run: Option<Vec<String>>,

    /// Only report the contents of the results directory
    #[arg(long, default_value = "false", conflicts_with = "tests")]
    results: bool,

    /// Tests to run, then report (legacy mode)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "SELECTOR")]
    tests: Vec<String>,
}

#[derive(Debug, PartialEq)]
enum Mode {
    Run(Vec<String>),
    Results,
    RunAndReport(Vec<String>),
}

impl Cli {
    fn mode(&self) -> Option<Mode> {
        if let Some(selectors) = &self.run {
            return Some(Mode::Run(selectors.clone()));
        }
        if self.results {
            return Some(Mode::Results);
        }
        if self.tests.is_empty() {
            return None;
        }
        Some(Mode::RunAndReport(self.tests.clone()))
    }

    fn config(&self) -> Config {
        let mut config = Config::default();
        if let Some(dir) = &self.results_dir {
            config.results_dir = dir.clone();
        }
        if let Some(tast) = &self.tast_path {
            config.tast_path = tast.clone();
        }
        if let Some(user) = &self.run_as {
            config.run_as = Some(user.clone());
        }
        if self.no_sudo {
            config.run_as = None;
        }
        if let Some(command) = &self.target_ip_command {
            config.target_ip_command = command.clone();
        }
        config.dut_address = self.dut.clone();
        config
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(mode) = cli.mode() else {
        println!("No tests provided");
        std::process::exit(1);
    };

    let config = cli.config();
    log::debug!("{:?}", config);
    let reporter = LavaReporter::new(&config);

    let code = dispatch(mode, &config, &reporter).await;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

async fn dispatch(mode: Mode, config: &Config, reporter: &dyn Reporter) -> i32 {
    match mode {
        Mode::Run(selectors) => match run_tests(config, &selectors).await {
            Ok(code) => code,
            Err(e) => {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
                1
            }
        },

        Mode::Results => translate(config, reporter).await,

        Mode::RunAndReport(selectors) => {
            let code = match run_tests(config, &selectors).await {
                Ok(code) => code,
                Err(e) => {
                    eprintln!("{} {:#}", "Error:".red().bold(), e);
                    1
                }
            };
            if code != 0 {
                escalate(reporter, &CriticalFailure::RunStageFailed).await;
                return code;
            }
            translate(config, reporter).await
        }
    }
}

async fn translate(config: &Config, reporter: &dyn Reporter) -> i32 {
    match report_results(config, reporter).await {
        Ok(summary) => {
            println!(
                "{} Reported {} test(s) ({} passed, {} failed, {} skipped)",
                "✓".green().bold(),
                summary.total(),
                summary.passed.to_string().green(),
                summary.failed.to_string().red(),
                summary.skipped.to_string().yellow()
            );
            0
        }
        Err(failure) => escalate(reporter, &failure).await,
    }
}
