use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Locator not found: {selector}")]
    LocatorNotFound { selector: String },

    #[error(
        "Timed out after {timeout_ms}ms on {selector}: expected {expected}, last observed {actual}"
    )]
    AssertionTimeout {
        selector: String,
        expected: String,
        actual: String,
        timeout_ms: u64,
    },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Browser launch failed: {0}")]
    LaunchFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("JavaScript execution failed: {0}")]
    JavaScriptFailed(String),

    #[error("Screenshot failed: {0}")]
    ScreenshotFailed(String),

    #[error("Counter text {text:?} at {selector} is not a non-negative integer")]
    InvalidCounterText { selector: String, text: String },

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Chrome error: {0}")]
    ChromeError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Anyhow error: {0}")]
    AnyhowError(String),
}

pub type Result<T> = std::result::Result<T, E2eError>;

// headless_chrome reports everything as anyhow::Error
impl From<anyhow::Error> for E2eError {
    fn from(err: anyhow::Error) -> Self {
        E2eError::AnyhowError(err.to_string())
    }
}

impl E2eError {
    /// Selector the failure is attached to, when there is one.
    pub fn selector(&self) -> Option<&str> {
        match self {
            E2eError::LocatorNotFound { selector }
            | E2eError::AssertionTimeout { selector, .. }
            | E2eError::InvalidCounterText { selector, .. } => Some(selector),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assertion_timeout_message_names_selector_and_values() {
        let err = E2eError::AssertionTimeout {
            selector: "[data-testid=\"counter\"]".to_string(),
            expected: "text \"3\"".to_string(),
            actual: "text=\"2\" visible=true enabled=true".to_string(),
            timeout_ms: 4000,
        };

        let message = err.to_string();
        assert!(message.contains("[data-testid=\"counter\"]"));
        assert!(message.contains("expected text \"3\""));
        assert!(message.contains("text=\"2\""));
        assert!(message.contains("4000ms"));
        assert_eq!(err.selector(), Some("[data-testid=\"counter\"]"));
    }

    #[test]
    fn test_configuration_error_has_no_selector() {
        let err = E2eError::ConfigurationError("missing heading".to_string());
        assert!(err.selector().is_none());
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: E2eError = anyhow::anyhow!("tab crashed").into();
        assert!(matches!(err, E2eError::AnyhowError(ref m) if m == "tab crashed"));
    }
}
