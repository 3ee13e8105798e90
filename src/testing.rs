//! In-memory stand-in for the counter widget.
//!
//! `SimulatedCounter` implements [`DriverTrait`] by modelling the widget
//! itself: a heading containing the counter display, and two buttons driving
//! the `n -> n + 1` / `n -> max(n - 1, 0)` state machine. [`Faults`] switch on
//! specific misbehaviours so failure paths of the page object can be tested
//! without a browser.

use crate::core::DriverTrait;
use crate::errors::{E2eError, Result};
use crate::locators::{LocatorName, LocatorSet};
use crate::types::ElementState;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

/// Deliberate deviations from the correct widget.
#[derive(Debug, Clone, Default)]
pub struct Faults {
    /// Decrement below zero instead of stopping at the floor.
    pub allow_negative: bool,
    /// Counter reads that still show the previous value after each click.
    pub render_lag: u32,
    /// Override the text of the increment button.
    pub increment_label: Option<String>,
    /// Override the text of the heading.
    pub heading_text: Option<String>,
    pub hidden: Option<LocatorName>,
    pub disabled: Option<LocatorName>,
    pub missing: Option<LocatorName>,
    /// Render the counter display outside the heading.
    pub counter_outside_heading: bool,
    /// Number of initial page loads that render the counter hidden.
    pub flaky_loads: u32,
}

#[derive(Debug, Default)]
struct WidgetState {
    url: Option<String>,
    loads: u32,
    value: i64,
    displayed: String,
    pending_display: Option<String>,
    pending_reads: u32,
    counter_hidden_this_load: bool,
    clicks: Vec<LocatorName>,
}

pub struct SimulatedCounter {
    locators: LocatorSet,
    faults: Faults,
    state: RwLock<WidgetState>,
}

impl SimulatedCounter {
    pub fn new() -> Self {
        Self::with_locators(LocatorSet::default())
    }

    pub fn with_locators(locators: LocatorSet) -> Self {
        Self {
            locators,
            faults: Faults::default(),
            state: RwLock::new(WidgetState::default()),
        }
    }

    pub fn with_faults(mut self, faults: Faults) -> Self {
        self.faults = faults;
        self
    }

    pub fn locators(&self) -> &LocatorSet {
        &self.locators
    }

    /// Internal widget value, independent of what is currently rendered.
    pub async fn value(&self) -> i64 {
        self.state.read().await.value
    }

    pub async fn loads(&self) -> u32 {
        self.state.read().await.loads
    }

    pub async fn clicks(&self) -> Vec<LocatorName> {
        self.state.read().await.clicks.clone()
    }

    fn label(&self, name: LocatorName) -> String {
        match name {
            LocatorName::Increment => self
                .faults
                .increment_label
                .clone()
                .unwrap_or_else(|| "Increment".to_string()),
            LocatorName::Decrement => "Decrement".to_string(),
            _ => String::new(),
        }
    }

    fn render(&self, name: LocatorName, state: &WidgetState) -> Option<ElementState> {
        if state.url.is_none() || self.faults.missing == Some(name) {
            return None;
        }

        let text = match name {
            LocatorName::Counter => state.displayed.clone(),
            LocatorName::Heading => {
                let title = self
                    .faults
                    .heading_text
                    .clone()
                    .unwrap_or_else(|| "Counter: ".to_string());
                if self.faults.counter_outside_heading {
                    title
                } else {
                    format!("{}{}", title, state.displayed)
                }
            }
            _ => self.label(name),
        };

        let hidden = self.faults.hidden == Some(name)
            || (name == LocatorName::Counter && state.counter_hidden_this_load);

        Some(ElementState {
            text,
            visible: !hidden,
            enabled: self.faults.disabled != Some(name),
        })
    }
}

impl Default for SimulatedCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DriverTrait for SimulatedCounter {
    async fn navigate(&self, url: &str) -> Result<()> {
        let mut state = self.state.write().await;
        state.loads += 1;
        state.url = Some(url.to_string());
        state.value = 0;
        state.displayed = "0".to_string();
        state.pending_display = None;
        state.pending_reads = 0;
        state.counter_hidden_this_load = state.loads <= self.faults.flaky_loads;
        state.clicks.clear();
        tracing::debug!(url, load = state.loads, "simulated page load");
        Ok(())
    }

    async fn inspect(&self, selector: &str) -> Result<Option<ElementState>> {
        let name = match self.locators.name_of(selector) {
            Some(name) => name,
            None => return Ok(None),
        };

        let mut state = self.state.write().await;

        // A lagging counter shows its stale text for a few reads before
        // catching up with the last click.
        if name == LocatorName::Counter && state.pending_display.is_some() {
            if state.pending_reads > 0 {
                state.pending_reads -= 1;
            } else if let Some(next) = state.pending_display.take() {
                state.displayed = next;
            }
        }

        Ok(self.render(name, &state))
    }

    async fn exists_within(&self, ancestor: &str, descendant: &str) -> Result<bool> {
        let state = self.state.read().await;
        let ancestor = self.locators.name_of(ancestor);
        let descendant = self.locators.name_of(descendant);
        let (Some(ancestor), Some(descendant)) = (ancestor, descendant) else {
            return Ok(false);
        };

        Ok(ancestor == LocatorName::Heading
            && descendant == LocatorName::Counter
            && !self.faults.counter_outside_heading
            && self.render(ancestor, &state).is_some()
            && self.render(descendant, &state).is_some())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let name = self.locators.name_of(selector);
        let rendered = name.and_then(|name| self.render(name, &state));

        let (Some(name), Some(element)) = (name, rendered) else {
            return Err(E2eError::LocatorNotFound {
                selector: selector.to_string(),
            });
        };

        state.clicks.push(name);
        if !element.enabled {
            return Ok(());
        }

        match name {
            LocatorName::Increment => state.value += 1,
            LocatorName::Decrement => {
                if state.value > 0 || self.faults.allow_negative {
                    state.value -= 1;
                }
            }
            _ => {}
        }

        if self.faults.render_lag == 0 {
            state.displayed = state.value.to_string();
        } else {
            state.pending_display = Some(state.value.to_string());
            state.pending_reads = self.faults.render_lag;
        }
        Ok(())
    }

    async fn execute_script(&self, _script: &str) -> Result<Value> {
        Err(E2eError::JavaScriptFailed(
            "the simulated widget does not evaluate scripts".to_string(),
        ))
    }

    async fn take_screenshot(&self) -> Result<Vec<u8>> {
        let state = self.state.read().await;
        Ok(format!("simulated counter at {}", state.displayed).into_bytes())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.state.read().await.url.clone().unwrap_or_default())
    }

    async fn set_text(&self, selector: &str, text: &str) -> Result<()> {
        let mut state = self.state.write().await;
        if self.locators.name_of(selector) != Some(LocatorName::Counter)
            || self.render(LocatorName::Counter, &state).is_none()
        {
            return Err(E2eError::LocatorNotFound {
                selector: selector.to_string(),
            });
        }
        state.displayed = text.to_string();
        state.pending_display = None;
        state.pending_reads = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://localhost:3000/";

    #[tokio::test]
    async fn test_nothing_renders_before_navigation() {
        let driver = SimulatedCounter::new();
        let counter = driver.locators().counter().to_string();
        assert_eq!(driver.inspect(&counter).await.unwrap(), None);
        assert!(matches!(
            driver.click(&counter).await,
            Err(E2eError::LocatorNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_fresh_load_renders_widget() {
        let driver = SimulatedCounter::new();
        driver.navigate(URL).await.unwrap();
        let locators = driver.locators().clone();

        assert_eq!(
            driver.inspect(locators.counter()).await.unwrap(),
            Some(ElementState::new("0", true, true))
        );
        assert_eq!(
            driver.read_text(locators.heading()).await.unwrap().as_deref(),
            Some("Counter: 0")
        );
        assert_eq!(
            driver.read_text(locators.increment()).await.unwrap().as_deref(),
            Some("Increment")
        );
        assert!(driver
            .exists_within(locators.heading(), locators.counter())
            .await
            .unwrap());
        assert_eq!(driver.current_url().await.unwrap(), URL);
    }

    #[tokio::test]
    async fn test_decrement_floors_at_zero() {
        let driver = SimulatedCounter::new();
        driver.navigate(URL).await.unwrap();
        let locators = driver.locators().clone();

        driver.click(locators.decrement()).await.unwrap();
        assert_eq!(driver.value().await, 0);
        driver.click(locators.increment()).await.unwrap();
        driver.click(locators.decrement()).await.unwrap();
        driver.click(locators.decrement()).await.unwrap();
        assert_eq!(driver.value().await, 0);
        assert_eq!(driver.clicks().await.len(), 4);
    }

    #[tokio::test]
    async fn test_render_lag_delays_display() {
        let driver = SimulatedCounter::new().with_faults(Faults {
            render_lag: 2,
            ..Default::default()
        });
        driver.navigate(URL).await.unwrap();
        let locators = driver.locators().clone();

        driver.click(locators.increment()).await.unwrap();
        for expected in ["0", "0", "1"] {
            let text = driver.read_text(locators.counter()).await.unwrap();
            assert_eq!(text.as_deref(), Some(expected));
        }
    }

    #[tokio::test]
    async fn test_navigation_resets_state() {
        let driver = SimulatedCounter::new();
        driver.navigate(URL).await.unwrap();
        let increment = driver.locators().increment().to_string();
        driver.click(&increment).await.unwrap();
        driver.click(&increment).await.unwrap();

        driver.navigate(URL).await.unwrap();
        assert_eq!(driver.value().await, 0);
        assert_eq!(driver.loads().await, 2);
        assert!(driver.clicks().await.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_button_ignores_clicks() {
        let driver = SimulatedCounter::new().with_faults(Faults {
            disabled: Some(LocatorName::Increment),
            ..Default::default()
        });
        driver.navigate(URL).await.unwrap();
        let increment = driver.locators().increment().to_string();

        driver.click(&increment).await.unwrap();
        assert_eq!(driver.value().await, 0);
        assert!(!driver.is_enabled(&increment).await.unwrap());
    }

    #[tokio::test]
    async fn test_scripts_are_rejected() {
        let driver = SimulatedCounter::new();
        assert!(matches!(
            driver.execute_script("document.title").await,
            Err(E2eError::JavaScriptFailed(_))
        ));
    }
}
