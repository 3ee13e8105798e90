use crate::core::{Config, DriverTrait, RunMode};
use crate::errors::Result;
use crate::page::CounterPage;
use crate::scenarios::Scenario;
use crate::utils::screenshot::ScreenshotManager;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub group: String,
    pub name: String,
    pub passed: bool,
    pub attempts: u32,
    pub error: Option<String>,
    pub screenshots: Vec<PathBuf>,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<ScenarioOutcome>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.passed)
    }

    pub async fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, serde_json::to_vec_pretty(self)?).await?;
        Ok(())
    }
}

/// Runs scenarios serially against one page, re-running a failed scenario
/// from `visit()` up to the configured number of retries.
pub struct SuiteRunner<D: DriverTrait> {
    page: CounterPage<D>,
    retries: u32,
    screenshots_folder: Option<PathBuf>,
}

impl<D: DriverTrait> SuiteRunner<D> {
    pub fn new(page: CounterPage<D>, config: &Config, mode: RunMode) -> Self {
        Self {
            page,
            retries: config.retries_for(mode),
            screenshots_folder: config
                .screenshot_on_failure
                .then(|| config.screenshots_folder.clone()),
        }
    }

    pub fn page(&self) -> &CounterPage<D> {
        &self.page
    }

    pub async fn run(&self, scenarios: &[Scenario<D>]) -> SuiteReport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(%run_id, scenarios = scenarios.len(), retries = self.retries, "suite started");

        let mut outcomes = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            outcomes.push(self.run_scenario(scenario).await);
        }

        let report = SuiteReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            outcomes,
        };
        info!(
            %run_id,
            passed = report.passed(),
            failed = report.failed(),
            "suite finished"
        );
        report
    }

    pub async fn run_scenario(&self, scenario: &Scenario<D>) -> ScenarioOutcome {
        let start_time = Instant::now();
        let title = scenario.title();
        let mut screenshots = Vec::new();
        let mut last_error = None;
        let max_attempts = self.retries + 1;

        for attempt in 1..=max_attempts {
            match self.attempt(scenario).await {
                Ok(()) => {
                    info!(scenario = %title, attempt, "passed");
                    return ScenarioOutcome {
                        group: scenario.group.to_string(),
                        name: scenario.name.to_string(),
                        passed: true,
                        attempts: attempt,
                        error: None,
                        screenshots,
                        duration_ms: start_time.elapsed().as_millis() as u64,
                    };
                }
                Err(e) => {
                    warn!(scenario = %title, attempt, max_attempts, error = %e, "attempt failed");
                    if let Some(folder) = &self.screenshots_folder {
                        match ScreenshotManager::capture_failure(
                            self.page.driver(),
                            folder,
                            &title,
                            attempt,
                        )
                        .await
                        {
                            Ok(path) => screenshots.push(path),
                            Err(shot_err) => {
                                warn!(scenario = %title, error = %shot_err, "screenshot failed")
                            }
                        }
                    }
                    last_error = Some(e.to_string());
                }
            }
        }

        error!(scenario = %title, attempts = max_attempts, "failed");
        ScenarioOutcome {
            group: scenario.group.to_string(),
            name: scenario.name.to_string(),
            passed: false,
            attempts: max_attempts,
            error: last_error,
            screenshots,
            duration_ms: start_time.elapsed().as_millis() as u64,
        }
    }

    async fn attempt(&self, scenario: &Scenario<D>) -> Result<()> {
        self.page.visit().await?;
        (scenario.run)(&self.page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::counter_suite;
    use crate::testing::{Faults, SimulatedCounter};

    fn config(screenshots_folder: Option<PathBuf>) -> Config {
        Config {
            default_command_timeout_ms: 100,
            poll_interval_ms: 5,
            screenshot_on_failure: screenshots_folder.is_some(),
            screenshots_folder: screenshots_folder.unwrap_or_default(),
            ..Default::default()
        }
    }

    fn runner(faults: Faults, config: &Config, mode: RunMode) -> SuiteRunner<SimulatedCounter> {
        let page = CounterPage::new(SimulatedCounter::new().with_faults(faults), config).unwrap();
        SuiteRunner::new(page, config, mode)
    }

    fn display_scenario() -> Scenario<SimulatedCounter> {
        counter_suite()
            .into_iter()
            .find(|s| s.name == "should have visible counter display")
            .unwrap()
    }

    #[tokio::test]
    async fn test_full_suite_passes() {
        let config = config(None);
        let runner = runner(Faults::default(), &config, RunMode::Run);

        let report = runner.run(&counter_suite()).await;
        assert!(report.all_passed());
        assert_eq!(report.failed(), 0);
        assert!(report.outcomes.iter().all(|o| o.attempts == 1));
        assert!(report.finished_at >= report.started_at);
    }

    #[tokio::test]
    async fn test_flaky_load_recovers_within_retries() {
        let config = config(None);
        let runner = runner(
            Faults {
                flaky_loads: 2,
                ..Default::default()
            },
            &config,
            RunMode::Run,
        );

        let outcome = runner.run_scenario(&display_scenario()).await;
        assert!(outcome.passed);
        assert_eq!(outcome.attempts, 3);
        assert_eq!(runner.page().driver().loads().await, 3);
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let config = config(None);
        let runner = runner(
            Faults {
                flaky_loads: 3,
                ..Default::default()
            },
            &config,
            RunMode::Run,
        );

        let outcome = runner.run_scenario(&display_scenario()).await;
        assert!(!outcome.passed);
        assert_eq!(outcome.attempts, 3);
        assert!(outcome.error.unwrap().contains("visible=false"));
    }

    #[tokio::test]
    async fn test_open_mode_does_not_retry() {
        let config = config(None);
        let runner = runner(
            Faults {
                flaky_loads: 1,
                ..Default::default()
            },
            &config,
            RunMode::Open,
        );

        let outcome = runner.run_scenario(&display_scenario()).await;
        assert!(!outcome.passed);
        assert_eq!(outcome.attempts, 1);
    }

    #[tokio::test]
    async fn test_failed_attempts_leave_screenshots() {
        let folder = std::env::temp_dir().join(format!("e2e-runner-{}", Uuid::new_v4()));
        let config = config(Some(folder.clone()));
        let runner = runner(
            Faults {
                flaky_loads: 1,
                ..Default::default()
            },
            &config,
            RunMode::Run,
        );

        let outcome = runner.run_scenario(&display_scenario()).await;
        assert!(outcome.passed);
        assert_eq!(outcome.attempts, 2);
        assert_eq!(outcome.screenshots.len(), 1);
        assert!(outcome.screenshots[0].starts_with(&folder));
        assert!(tokio::fs::metadata(&outcome.screenshots[0]).await.is_ok());

        tokio::fs::remove_dir_all(&folder).await.unwrap();
    }

    #[tokio::test]
    async fn test_report_round_trips_through_json_file() {
        let config = config(None);
        let runner = runner(Faults::default(), &config, RunMode::Run);
        let report = runner.run(&[display_scenario()]).await;

        let path = std::env::temp_dir()
            .join(format!("e2e-report-{}", Uuid::new_v4()))
            .join("report.json");
        report.write_json(&path).await.unwrap();

        let raw = tokio::fs::read_to_string(&path).await.unwrap();
        let parsed: SuiteReport = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.run_id, report.run_id);
        assert_eq!(parsed.outcomes.len(), 1);
        assert!(parsed.outcomes[0].passed);

        tokio::fs::remove_dir_all(path.parent().unwrap()).await.unwrap();
    }
}
