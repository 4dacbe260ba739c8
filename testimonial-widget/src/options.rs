//! Page-wide runtime options
//!
//! Built once by the embedding code and handed to
//! [`PageContext`](crate::PageContext); nothing in the runtime reads ambient
//! globals.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use testimonial_feed::RetryPolicy;
use url::Url;

use crate::error::{WidgetError, WidgetResult};

/// Version stamped on every rendered widget.
pub const WIDGET_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_API_ENDPOINT: &str = "https://app.testimonials.example/api/widget/testimonials";
pub const DEFAULT_FRAME_URL: &str = "https://app.testimonials.example/embed/frame";
pub const DEFAULT_CACHE_KEY_PREFIX: &str = "testimonials_cache_";

/// Runtime options shared by every widget on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuntimeOptions {
    /// Version string stamped on rendered widgets.
    pub version: String,
    /// Log controller decisions at `info` instead of `debug`.
    pub debug: bool,
    /// Testimonials endpoint.
    pub api_endpoint: String,
    /// Standalone page loaded by the iframe fallback.
    pub frame_url: String,
    /// Origins allowed to post resize messages.
    pub trusted_origins: Vec<String>,
    pub request_timeout_ms: u64,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    pub cache_ttl_secs: u64,
    pub cache_key_prefix: String,
    /// Switch to the iframe as soon as loading fails. When off, the inline
    /// error offers a manual switch instead.
    pub auto_fallback: bool,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            version: WIDGET_VERSION.to_string(),
            debug: false,
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            frame_url: DEFAULT_FRAME_URL.to_string(),
            trusted_origins: vec!["https://app.testimonials.example".to_string()],
            request_timeout_ms: 10_000,
            max_retries: 2,
            retry_base_delay_ms: 1_000,
            cache_ttl_secs: 300,
            cache_key_prefix: DEFAULT_CACHE_KEY_PREFIX.to_string(),
            auto_fallback: true,
        }
    }
}

impl RuntimeOptions {
    /// Parse options from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> WidgetResult<Self> {
        let options: Self = serde_json::from_str(json)
            .map_err(|e| WidgetError::InvalidOptions(format!("malformed JSON: {e}")))?;
        options.validate()?;
        Ok(options)
    }

    /// Read and parse an options file.
    pub fn from_path(path: &Path) -> WidgetResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            WidgetError::InvalidOptions(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> WidgetResult<()> {
        check_http_url("apiEndpoint", &self.api_endpoint)?;
        check_http_url("frameUrl", &self.frame_url)?;

        if self.trusted_origins.is_empty() {
            return Err(WidgetError::InvalidOptions(
                "trustedOrigins must list at least one origin".to_string(),
            ));
        }
        for origin in &self.trusted_origins {
            let url = check_http_url("trustedOrigins", origin)?;
            if url.origin().ascii_serialization() != origin.trim_end_matches('/') {
                return Err(WidgetError::InvalidOptions(format!(
                    "trustedOrigins entry '{origin}' must be a bare origin (scheme://host[:port])"
                )));
            }
        }

        if self.request_timeout_ms == 0 {
            return Err(WidgetError::InvalidOptions(
                "requestTimeoutMs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries,
            Duration::from_millis(self.retry_base_delay_ms),
        )
    }
}

fn check_http_url(field: &str, value: &str) -> WidgetResult<Url> {
    let url = Url::parse(value)
        .map_err(|e| WidgetError::InvalidOptions(format!("{field} '{value}' is not a URL: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(WidgetError::InvalidOptions(format!(
            "{field} '{value}' must use http or https"
        )));
    }
    Ok(url)
}
