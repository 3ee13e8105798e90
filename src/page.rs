//! Page object for the counter widget.
//!
//! Every operation re-reads live UI state through the driver and returns the
//! page itself, so a test reads as one sequential chain:
//!
//! ```ignore
//! page.visit().await?
//!     .increment().await?
//!     .assert_value(1).await?
//!     .decrement().await?
//!     .assert_value(0).await?;
//! ```
//!
//! Verifications poll until the expected state appears or the command timeout
//! elapses. An element that never shows up fails with
//! [`E2eError::LocatorNotFound`]; one that shows up in the wrong state fails
//! with [`E2eError::AssertionTimeout`] carrying the last observed state.

use crate::actions::{CommandRegistry, RESET_COUNTER};
use crate::core::{Config, DriverTrait};
use crate::errors::{E2eError, Result};
use crate::locators::{LocatorName, LocatorSet};
use crate::types::ElementState;
use crate::utils::poll::{poll_until, PollOptions, PollTimeout, Probe};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

pub const HEADING_TEXT: &str = "Counter:";
pub const INCREMENT_LABEL: &str = "Increment";
pub const DECREMENT_LABEL: &str = "Decrement";

pub struct CounterPage<D: DriverTrait> {
    driver: Arc<D>,
    locators: LocatorSet,
    commands: CommandRegistry<D>,
    root_url: String,
    poll: PollOptions,
}

impl<D: DriverTrait> fmt::Debug for CounterPage<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CounterPage")
            .field("root_url", &self.root_url)
            .field("locators", &self.locators)
            .field("commands", &self.commands.list_commands())
            .finish_non_exhaustive()
    }
}

impl<D: DriverTrait> CounterPage<D> {
    pub fn new(driver: D, config: &Config) -> Result<Self> {
        Self::with_locators(Arc::new(driver), LocatorSet::default(), config)
    }

    pub fn with_locators(driver: Arc<D>, locators: LocatorSet, config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            driver,
            locators,
            commands: CommandRegistry::with_builtins(),
            root_url: config.root_url()?,
            poll: config.poll_options(),
        })
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn locators(&self) -> &LocatorSet {
        &self.locators
    }

    pub fn commands_mut(&mut self) -> &mut CommandRegistry<D> {
        &mut self.commands
    }

    pub fn root_url(&self) -> &str {
        &self.root_url
    }

    pub async fn visit(&self) -> Result<&Self> {
        debug!(url = %self.root_url, "visit");
        self.driver.navigate(&self.root_url).await?;
        Ok(self)
    }

    pub async fn increment(&self) -> Result<&Self> {
        self.click_when_actionable(LocatorName::Increment).await?;
        Ok(self)
    }

    /// Clicks decrement. The widget keeps the value at 0 if it is already 0.
    pub async fn decrement(&self) -> Result<&Self> {
        self.click_when_actionable(LocatorName::Decrement).await?;
        Ok(self)
    }

    pub async fn assert_value(&self, expected: u64) -> Result<&Self> {
        let expected_text = expected.to_string();
        self.expect(
            LocatorName::Counter,
            &format!("text {:?}", expected_text),
            |state| state.text == expected_text,
        )
        .await?;
        Ok(self)
    }

    /// Reads the counter as soon as it is present.
    pub async fn current_value(&self) -> Result<u64> {
        let state = self
            .expect(LocatorName::Counter, "counter to be present", |_| true)
            .await?;
        state
            .text
            .trim()
            .parse()
            .map_err(|_| E2eError::InvalidCounterText {
                selector: self.locators.counter().to_string(),
                text: state.text.clone(),
            })
    }

    pub async fn verify_labels(&self) -> Result<&Self> {
        for (name, label) in [
            (LocatorName::Increment, INCREMENT_LABEL),
            (LocatorName::Decrement, DECREMENT_LABEL),
        ] {
            self.expect(
                name,
                &format!("visible, enabled, text {:?}", label),
                |state| state.is_actionable() && state.text == label,
            )
            .await?;
        }
        Ok(self)
    }

    pub async fn verify_display(&self) -> Result<&Self> {
        self.expect(LocatorName::Counter, "visible, text \"0\"", |state| {
            state.visible && state.text == "0"
        })
        .await?;
        Ok(self)
    }

    pub async fn verify_structure(&self) -> Result<&Self> {
        self.expect(
            LocatorName::Heading,
            &format!("visible, containing {:?}", HEADING_TEXT),
            |state| state.visible && state.text.contains(HEADING_TEXT),
        )
        .await?;

        let heading = self.locators.heading();
        let counter = self.locators.counter();
        let driver = self.driver.as_ref();
        let outcome = poll_until(self.poll, move || async move {
            Ok(if driver.exists_within(heading, counter).await? {
                Probe::Ready(())
            } else {
                Probe::Pending(None)
            })
        })
        .await?;

        self.settle(
            &format!("{} {}", heading, counter),
            "counter inside heading",
            outcome,
        )?;
        Ok(self)
    }

    /// Structure, then display, then labels. Stops at the first failure.
    pub async fn verify_all(&self) -> Result<&Self> {
        self.verify_structure().await?;
        self.verify_display().await?;
        self.verify_labels().await?;
        Ok(self)
    }

    /// From 0, three decrement attempts must all leave the counter at 0.
    pub async fn verify_floor_at_zero(&self) -> Result<&Self> {
        self.assert_value(0).await?;

        self.decrement().await?.assert_value(0).await?;

        self.decrement()
            .await?
            .decrement()
            .await?
            .assert_value(0)
            .await?;

        Ok(self)
    }

    pub async fn run_command(&self, name: &str) -> Result<&Self> {
        self.commands
            .execute(name, self.driver.as_ref(), &self.locators)
            .await?;
        Ok(self)
    }

    pub async fn reset(&self) -> Result<&Self> {
        self.run_command(RESET_COUNTER).await
    }

    async fn click_when_actionable(&self, name: LocatorName) -> Result<()> {
        self.expect(name, "visible and enabled", ElementState::is_actionable)
            .await?;
        let selector = self.locators.get(name);
        debug!(element = %name, selector, "click");
        self.driver.click(selector).await
    }

    async fn expect<F>(&self, name: LocatorName, expected: &str, check: F) -> Result<ElementState>
    where
        F: Fn(&ElementState) -> bool + Send + Sync,
    {
        let selector = self.locators.get(name);
        let driver = self.driver.as_ref();
        let check = &check;

        let outcome = poll_until(self.poll, move || async move {
            Ok(match driver.inspect(selector).await? {
                Some(state) if check(&state) => Probe::Ready(state),
                Some(state) => Probe::Pending(Some(state.to_string())),
                None => Probe::Pending(None),
            })
        })
        .await?;

        self.settle(selector, expected, outcome)
    }

    fn settle<T>(
        &self,
        selector: &str,
        expected: &str,
        outcome: std::result::Result<T, PollTimeout>,
    ) -> Result<T> {
        outcome.map_err(|timeout| {
            warn!(
                selector,
                expected,
                attempts = timeout.attempts,
                elapsed_ms = timeout.elapsed.as_millis() as u64,
                "assertion did not settle"
            );
            match timeout.last_observed {
                None => E2eError::LocatorNotFound {
                    selector: selector.to_string(),
                },
                Some(actual) => E2eError::AssertionTimeout {
                    selector: selector.to_string(),
                    expected: expected.to_string(),
                    actual,
                    timeout_ms: self.poll.timeout.as_millis() as u64,
                },
            }
        })
    }
}
