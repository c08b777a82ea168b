//! Widget configuration.
//!
//! Every field has a default, so a page that sets nothing gets the stock
//! endpoints and copy. In the browser the values come from an optional
//! `window.tablesSelectConfig` object; a missing or malformed object falls back
//! to [`WidgetConfig::default`].

use serde::Deserialize;

pub const DEFAULT_RESERVED_URL: &str = "tables/reserved";
pub const DEFAULT_ALL_URL: &str = "tables/all";
pub const DEFAULT_LOADING_TEXT: &str = "Loading tables…";
pub const DEFAULT_FAILURE_TEXT: &str = "Failed to load tables";

/// Global the page may define before the widget boots.
pub const CONFIG_GLOBAL: &str = "tablesSelectConfig";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetConfig {
    pub reserved_url: String,
    /// `None` disables the all-tables attempt.
    pub all_url: Option<String>,
    pub loading_text: String,
    pub failure_text: String,
    /// Drop responses that resolve after a newer open was issued.
    pub discard_stale_responses: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            reserved_url: DEFAULT_RESERVED_URL.to_owned(),
            all_url: Some(DEFAULT_ALL_URL.to_owned()),
            loading_text: DEFAULT_LOADING_TEXT.to_owned(),
            failure_text: DEFAULT_FAILURE_TEXT.to_owned(),
            discard_stale_responses: true,
        }
    }
}

impl WidgetConfig {
    /// Parse a JSON config object; unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns the serde error when `raw` is not an object of the right shape.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Read `window.tablesSelectConfig`, falling back to defaults.
    #[cfg(feature = "hydrate")]
    pub fn from_window() -> Self {
        use wasm_bindgen::JsValue;

        let Some(window) = web_sys::window() else {
            return Self::default();
        };
        let value = match js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL)) {
            Ok(value) if !value.is_undefined() && !value.is_null() => value,
            _ => return Self::default(),
        };
        let raw = match js_sys::JSON::stringify(&value) {
            Ok(raw) => String::from(raw),
            Err(err) => {
                log::warn!("{CONFIG_GLOBAL} is not serializable, using defaults: {err:?}");
                return Self::default();
            }
        };
        Self::from_json(&raw).unwrap_or_else(|err| {
            log::warn!("{CONFIG_GLOBAL} is malformed, using defaults: {err}");
            Self::default()
        })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
