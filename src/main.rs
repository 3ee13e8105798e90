use anyhow::Context;
use clap::Parser;
use counter_e2e::{
    counter_suite, ChromeDriver, Config, CounterPage, LocatorStrategy, RunMode, SuiteRunner,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Run the counter widget end-to-end suite in Chrome
#[derive(Debug, Parser)]
#[command(name = "counter-e2e", version)]
struct Cli {
    /// JSON configuration file; every field is optional
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides base_url from the configuration and environment
    #[arg(long)]
    base_url: Option<String>,

    /// `run` is headless with retries, `open` shows the browser without retries
    #[arg(long, value_enum, default_value = "run")]
    mode: RunMode,

    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Built-in selector set; replaces any `selectors` from the configuration
    #[arg(long, value_enum)]
    locators: Option<LocatorStrategy>,

    /// Only run scenarios whose title contains this text
    #[arg(long)]
    filter: Option<String>,

    /// Write the JSON suite report here
    #[arg(long)]
    report: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    info!(
        base_url = %config.base_url,
        mode = ?cli.mode,
        locators = ?config.locators,
        "starting counter suite"
    );

    let driver = ChromeDriver::launch(&config)
        .await
        .context("failed to launch Chrome")?;
    let page = CounterPage::with_locators(Arc::new(driver), config.locator_set(), &config)?;
    let runner = SuiteRunner::new(page, &config, cli.mode);

    let scenarios: Vec<_> = counter_suite()
        .into_iter()
        .filter(|s| {
            cli.filter
                .as_deref()
                .map_or(true, |needle| s.title().contains(needle))
        })
        .collect();

    let report = runner.run(&scenarios).await;

    for outcome in &report.outcomes {
        if outcome.passed {
            info!(
                "PASS {} > {} ({} attempt(s))",
                outcome.group, outcome.name, outcome.attempts
            );
        } else {
            error!(
                "FAIL {} > {}: {}",
                outcome.group,
                outcome.name,
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    if let Some(path) = &cli.report {
        report
            .write_json(path)
            .await
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        info!(path = %path.display(), "report written");
    }

    info!(
        passed = report.passed(),
        failed = report.failed(),
        "done"
    );

    Ok(if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    }
    .apply_env();

    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.default_command_timeout_ms = timeout_ms;
    }
    if let Some(strategy) = cli.locators {
        config.locators = strategy;
        config.selectors = None;
    }
    if cli.mode == RunMode::Open {
        config.headless = false;
    }

    config.validate()?;
    Ok(config)
}
