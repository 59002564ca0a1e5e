use super::types::{Measurement, Verdict};
use crate::utils::command::ExternalCommand;
use crate::utils::config::Config;
use async_trait::async_trait;

/// Sink for translated results.
///
/// Reporting is best-effort: implementations swallow their own failures so a
/// dropped report never aborts the run.
#[async_trait]
pub trait Reporter: Send + Sync {
    async fn test_case(&self, name: &str, verdict: Verdict, measurement: Option<&Measurement>);

    async fn test_set_start(&self, name: &str);

    async fn test_set_stop(&self, name: &str);

    async fn critical(&self, message: &str);
}

/// Reports through the LAVA `lava-test-*` helper commands
pub struct LavaReporter {
    test_case_command: String,
    test_set_command: String,
    raise_command: String,
}

impl LavaReporter {
    pub fn new(config: &Config) -> Self {
        Self {
            test_case_command: config.test_case_command.clone(),
            test_set_command: config.test_set_command.clone(),
            raise_command: config.raise_command.clone(),
        }
    }

    pub fn test_case_command(
        &self,
        name: &str,
        verdict: Verdict,
        measurement: Option<&Measurement>,
    ) -> ExternalCommand {
        let cmd = ExternalCommand::new(&self.test_case_command)
            .arg(name)
            .args(["--result", verdict.as_str()]);
        match measurement {
            Some(m) => cmd.args([
                "--measurement",
                m.value.as_str(),
                "--units",
                m.units.as_str(),
            ]),
            None => cmd,
        }
    }

    pub fn test_set_command(&self, action: &str, name: &str) -> ExternalCommand {
        ExternalCommand::new(&self.test_set_command).args([action, name])
    }

    pub fn raise_command(&self, message: &str) -> ExternalCommand {
        ExternalCommand::new(&self.raise_command).arg(message)
    }
}

#[async_trait]
impl Reporter for LavaReporter {
    async fn test_case(&self, name: &str, verdict: Verdict, measurement: Option<&Measurement>) {
        self.test_case_command(name, verdict, measurement)
            .run_best_effort()
            .await;
    }

    async fn test_set_start(&self, name: &str) {
        self.test_set_command("start", name).run_best_effort().await;
    }

    async fn test_set_stop(&self, name: &str) {
        self.test_set_command("stop", name).run_best_effort().await;
    }

    async fn critical(&self, message: &str) {
        self.raise_command(message).run_best_effort().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_test_case_shape() {
        let reporter = LavaReporter::new(&Config::default());
        let cmd = reporter.test_case_command("t1", Verdict::Pass, None);
        assert_eq!(cmd.to_string(), "lava-test-case t1 --result pass");
    }

    #[test]
    fn test_measurement_test_case_shape() {
        let reporter = LavaReporter::new(&Config::default());
        let m = Measurement {
            name: "g.m1".to_string(),
            value: "5".to_string(),
            units: "ms".to_string(),
        };
        let cmd = reporter.test_case_command(&m.name, Verdict::Fail, Some(&m));
        assert_eq!(
            cmd.arguments(),
            ["g.m1", "--result", "fail", "--measurement", "5", "--units", "ms"]
        );
    }

    #[test]
    fn test_set_and_raise_shapes() {
        let reporter = LavaReporter::new(&Config::default());
        assert_eq!(
            reporter.test_set_command("start", "ui.Login").to_string(),
            "lava-test-set start ui.Login"
        );
        let raise = reporter.raise_command("Tast tests run failed");
        assert_eq!(raise.program(), "lava-test-raise");
        assert_eq!(raise.arguments(), ["Tast tests run failed"]);
    }

    #[tokio::test]
    async fn test_missing_helpers_do_not_fail() {
        let config = Config {
            test_case_command: "/nonexistent/lava-test-case".to_string(),
            raise_command: "/nonexistent/lava-test-raise".to_string(),
            ..Config::default()
        };
        let reporter = LavaReporter::new(&config);
        reporter.test_case("t", Verdict::Pass, None).await;
        reporter.critical("boom").await;
    }
}
