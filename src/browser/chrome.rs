use crate::browser::navigation::NavigationManager;
use crate::core::{Config, DriverTrait};
use crate::errors::{E2eError, Result};
use crate::types::ElementState;
use crate::utils::javascript;
use crate::utils::poll::PollOptions;
use async_trait::async_trait;
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, LaunchOptions, Tab};
use serde_json::Value;
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

/// Chrome driven over the DevTools protocol
pub struct ChromeDriver {
    // Owns the browser process; dropping it closes Chrome.
    _browser: Browser,
    tab: Arc<Tab>,
    load_poll: PollOptions,
}

impl ChromeDriver {
    pub async fn launch(config: &Config) -> Result<Self> {
        let args = vec![
            OsStr::new("--no-sandbox"),
            OsStr::new("--disable-dev-shm-usage"),
        ];

        let launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .window_size(Some((config.viewport.width, config.viewport.height)))
            .idle_browser_timeout(Duration::from_secs(300))
            .args(args)
            .build()
            .map_err(|e| E2eError::LaunchFailed(e.to_string()))?;

        let browser =
            Browser::new(launch_options).map_err(|e| E2eError::LaunchFailed(e.to_string()))?;

        let tab = browser
            .new_tab()
            .map_err(|e| E2eError::LaunchFailed(e.to_string()))?;
        tab.set_default_timeout(config.command_timeout());

        tracing::info!(
            headless = config.headless,
            width = config.viewport.width,
            height = config.viewport.height,
            "chrome launched"
        );

        Ok(Self {
            _browser: browser,
            tab,
            load_poll: config.poll_options(),
        })
    }
}

#[async_trait]
impl DriverTrait for ChromeDriver {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| E2eError::NavigationFailed(e.to_string()))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| E2eError::NavigationFailed(e.to_string()))?;

        let result = NavigationManager::wait_for_document_ready(self, self.load_poll).await?;
        tracing::debug!(
            url = %result.url,
            duration_ms = result.duration_ms,
            "navigation complete"
        );
        Ok(())
    }

    async fn inspect(&self, selector: &str) -> Result<Option<ElementState>> {
        let result = self
            .execute_script(&javascript::inspect_script(selector))
            .await?;
        javascript::decode_element_state(result)
    }

    async fn exists_within(&self, ancestor: &str, descendant: &str) -> Result<bool> {
        let result = self
            .execute_script(&javascript::contains_script(ancestor, descendant))
            .await?;
        Ok(javascript::decode::<bool>(result)?.unwrap_or(false))
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.tab
            .find_element(selector)
            .map_err(|_| E2eError::LocatorNotFound {
                selector: selector.to_string(),
            })?
            .click()
            .map_err(|e| E2eError::ChromeError(e.to_string()))?;

        Ok(())
    }

    async fn execute_script(&self, script: &str) -> Result<Value> {
        let result = self
            .tab
            .evaluate(script, false)
            .map_err(|e| E2eError::JavaScriptFailed(e.to_string()))?;

        Ok(result.value.unwrap_or(Value::Null))
    }

    async fn take_screenshot(&self) -> Result<Vec<u8>> {
        self.tab
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| E2eError::ScreenshotFailed(e.to_string()))
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.tab.get_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locators::LocatorSet;

    const FIXTURE: &str = "data:text/html,\
        <h1 data-testid='counter-heading'>Counter: <span data-testid='counter'>0</span></h1>\
        <button data-testid='increment-btn'>Increment</button>\
        <button data-testid='decrement-btn'>Decrement</button>\
        <script>\
        let n = 0; const c = document.querySelector('[data-testid=counter]');\
        document.querySelector('[data-testid=increment-btn]').onclick = () => c.textContent = ++n;\
        document.querySelector('[data-testid=decrement-btn]').onclick = () => c.textContent = n = Math.max(0, n - 1);\
        </script>";

    #[tokio::test]
    #[ignore = "requires a local Chrome install"]
    async fn test_driver_against_inline_fixture() {
        let driver = ChromeDriver::launch(&Config::default()).await.unwrap();
        let locators = LocatorSet::default();
        driver.navigate(FIXTURE).await.unwrap();

        assert_eq!(
            driver.inspect(locators.counter()).await.unwrap(),
            Some(ElementState::new("0", true, true))
        );
        assert!(driver
            .exists_within(locators.heading(), locators.counter())
            .await
            .unwrap());

        driver.click(locators.increment()).await.unwrap();
        driver.click(locators.increment()).await.unwrap();
        driver.click(locators.decrement()).await.unwrap();
        assert_eq!(
            driver.read_text(locators.counter()).await.unwrap().as_deref(),
            Some("1")
        );

        driver.set_text(locators.counter(), "0").await.unwrap();
        assert_eq!(
            driver.read_text(locators.counter()).await.unwrap().as_deref(),
            Some("0")
        );

        assert!(matches!(
            driver.click("#nowhere").await,
            Err(E2eError::LocatorNotFound { .. })
        ));
        assert!(!driver.take_screenshot().await.unwrap().is_empty());
    }
}
