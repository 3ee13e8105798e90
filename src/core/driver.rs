use crate::errors::{E2eError, Result};
use crate::types::ElementState;
use crate::utils::javascript;
use async_trait::async_trait;
use serde_json::Value;

/// The browser-automation engine the page object calls into.
///
/// Implementations own element location and event dispatch. Polling is not
/// their concern: every query here is a single instantaneous read, and the
/// page object wraps them in [`crate::utils::poll_until`].
#[async_trait]
pub trait DriverTrait: Send + Sync {
    /// Navigate to a URL and wait for the document to finish loading
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Current state of the first element matching `selector`, if any
    async fn inspect(&self, selector: &str) -> Result<Option<ElementState>>;

    /// Whether `descendant` matches somewhere inside the first `ancestor` match
    async fn exists_within(&self, ancestor: &str, descendant: &str) -> Result<bool>;

    /// Click the first element matching `selector`
    async fn click(&self, selector: &str) -> Result<()>;

    /// Execute JavaScript in the page
    async fn execute_script(&self, script: &str) -> Result<Value>;

    /// Take a PNG screenshot
    async fn take_screenshot(&self) -> Result<Vec<u8>>;

    /// Get current URL
    async fn current_url(&self) -> Result<String>;

    async fn exists(&self, selector: &str) -> Result<bool> {
        Ok(self.inspect(selector).await?.is_some())
    }

    async fn read_text(&self, selector: &str) -> Result<Option<String>> {
        Ok(self.inspect(selector).await?.map(|state| state.text))
    }

    async fn is_visible(&self, selector: &str) -> Result<bool> {
        Ok(self
            .inspect(selector)
            .await?
            .map(|state| state.visible)
            .unwrap_or(false))
    }

    async fn is_enabled(&self, selector: &str) -> Result<bool> {
        Ok(self
            .inspect(selector)
            .await?
            .map(|state| state.enabled)
            .unwrap_or(false))
    }

    /// Overwrite the text content of an element
    async fn set_text(&self, selector: &str, text: &str) -> Result<()> {
        let result = self
            .execute_script(&javascript::set_text_script(selector, text))
            .await?;
        match javascript::decode::<bool>(result)? {
            Some(true) => Ok(()),
            _ => Err(E2eError::LocatorNotFound {
                selector: selector.to_string(),
            }),
        }
    }
}
