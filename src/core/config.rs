use crate::errors::{E2eError, Result};
use crate::locators::{LocatorSet, LocatorStrategy};
use crate::utils::poll::PollOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const BASE_URL_ENV: &str = "COUNTER_E2E_BASE_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub viewport: Viewport,
    pub headless: bool,
    pub default_command_timeout_ms: u64,
    pub poll_interval_ms: u64,
    pub retries: RetryConfig,
    pub screenshot_on_failure: bool,
    pub screenshots_folder: PathBuf,
    pub locators: LocatorStrategy,
    /// Explicit selectors; take precedence over `locators` when set.
    pub selectors: Option<LocatorSet>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Re-runs of a failed scenario, per run mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub run_mode: u32,
    pub open_mode: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Headless batch run.
    Run,
    /// Interactive run with a visible browser.
    Open,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            viewport: Viewport::default(),
            headless: true,
            default_command_timeout_ms: 4000,
            poll_interval_ms: 50,
            retries: RetryConfig::default(),
            screenshot_on_failure: true,
            screenshots_folder: PathBuf::from("target/e2e-screenshots"),
            locators: LocatorStrategy::default(),
            selectors: None,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            run_mode: 2,
            open_mode: 0,
        }
    }
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            E2eError::ConfigurationError(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            E2eError::ConfigurationError(format!("malformed {}: {}", path.display(), e))
        })
    }

    pub fn apply_env(mut self) -> Self {
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                self.base_url = base_url;
            }
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            E2eError::ConfigurationError(format!("invalid base_url {:?}: {}", self.base_url, e))
        })?;
        if url.cannot_be_a_base() {
            return Err(E2eError::ConfigurationError(format!(
                "base_url {:?} cannot be used as a base",
                self.base_url
            )));
        }
        if self.default_command_timeout_ms == 0 {
            return Err(E2eError::ConfigurationError(
                "default_command_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(E2eError::ConfigurationError(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Root URL of the widget, which is what `visit()` navigates to.
    pub fn root_url(&self) -> Result<String> {
        let base = Url::parse(&self.base_url).map_err(|e| {
            E2eError::ConfigurationError(format!("invalid base_url {:?}: {}", self.base_url, e))
        })?;
        Ok(base.to_string())
    }

    pub fn locator_set(&self) -> LocatorSet {
        match &self.selectors {
            Some(selectors) => selectors.clone(),
            None => self.locators.locator_set(),
        }
    }

    pub fn retries_for(&self, mode: RunMode) -> u32 {
        match mode {
            RunMode::Run => self.retries.run_mode,
            RunMode::Open => self.retries.open_mode,
        }
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.default_command_timeout_ms)
    }

    pub fn poll_options(&self) -> PollOptions {
        PollOptions::new(
            self.command_timeout(),
            Duration::from_millis(self.poll_interval_ms),
        )
    }
}
