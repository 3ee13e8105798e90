//! JavaScript probes evaluated in the page by script-capable drivers.
//!
//! Every probe returns a JSON string (or `null`) so the result survives the
//! remote-object round trip regardless of how the driver serializes values.

use crate::errors::{E2eError, Result};
use crate::types::ElementState;
use serde_json::Value;

/// Selectors are embedded as JSON string literals, which are valid JS.
fn js_string(raw: &str) -> String {
    Value::String(raw.to_string()).to_string()
}

pub fn inspect_script(selector: &str) -> String {
    format!(
        r#"
        (function() {{
            const element = document.querySelector({});
            if (!element) return null;

            const rect = element.getBoundingClientRect();
            const style = window.getComputedStyle(element);
            const visible = rect.width > 0 &&
                            rect.height > 0 &&
                            style.visibility !== 'hidden' &&
                            style.display !== 'none' &&
                            parseFloat(style.opacity) > 0;

            return JSON.stringify({{
                text: element.textContent || '',
                visible: visible,
                enabled: !element.disabled
            }});
        }})()
        "#,
        js_string(selector)
    )
}

pub fn contains_script(ancestor: &str, descendant: &str) -> String {
    format!(
        r#"
        (function() {{
            const parent = document.querySelector({});
            if (!parent) return JSON.stringify(false);
            return JSON.stringify(parent.querySelector({}) !== null);
        }})()
        "#,
        js_string(ancestor),
        js_string(descendant)
    )
}

pub fn set_text_script(selector: &str, text: &str) -> String {
    format!(
        r#"
        (function() {{
            const element = document.querySelector({});
            if (!element) return JSON.stringify(false);
            element.textContent = {};
            return JSON.stringify(true);
        }})()
        "#,
        js_string(selector),
        js_string(text)
    )
}

pub const READY_STATE_SCRIPT: &str = "JSON.stringify(document.readyState)";

/// Decode the JSON string a probe returned. `null` maps to `None`.
pub fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<Option<T>> {
    match value {
        Value::Null => Ok(None),
        Value::String(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        other => Err(E2eError::JavaScriptFailed(format!(
            "probe returned {} instead of a JSON string",
            other
        ))),
    }
}

pub fn decode_element_state(value: Value) -> Result<Option<ElementState>> {
    decode(value)
}
