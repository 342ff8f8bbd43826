//! Proxy settings
//!
//! The most specific layer that actually sets a proxy field wins; fields a
//! layer leaves empty fall through to the less specific layers.

use serde::{Deserialize, Serialize};

/// HTTP proxy settings for a provider or node set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proxy {
    #[serde(rename = "http_proxy", default, skip_serializing_if = "Option::is_none")]
    pub http: Option<String>,

    #[serde(rename = "https_proxy", default, skip_serializing_if = "Option::is_none")]
    pub https: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_proxy: Option<String>,
}

impl Proxy {
    /// Overlay `overlay` field by field, returning a new value.
    ///
    /// An overlay field replaces the base field only when it is set and
    /// non-empty.
    pub fn override_with(&self, overlay: &Proxy) -> Proxy {
        Proxy {
            http: pick(&self.http, &overlay.http),
            https: pick(&self.https, &overlay.https),
            no_proxy: pick(&self.no_proxy, &overlay.no_proxy),
        }
    }

    /// Whether no field is set
    pub fn is_empty(&self) -> bool {
        [&self.http, &self.https, &self.no_proxy]
            .iter()
            .all(|f| f.as_deref().is_none_or(str::is_empty))
    }
}

fn pick(base: &Option<String>, overlay: &Option<String>) -> Option<String> {
    match overlay {
        Some(value) if !value.is_empty() => Some(value.clone()),
        _ => base.clone(),
    }
}
