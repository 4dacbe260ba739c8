//! Generic HTTP helpers
//!
//! Shared by every HTTP-backed [`TestimonialSource`](crate::TestimonialSource):
//! send a request, map transport failures, classify the status code and parse
//! the body. Retrying is not done here.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::error::FeedError;
use crate::utils::log_sanitizer::truncate_for_log;

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request and returns the status code and response text
    ///
    /// # Returns
    /// * `Ok((status_code, response_text))` for any status the server sent
    /// * `Err(FeedError::Timeout)` when reqwest reports a timeout
    /// * `Err(FeedError::NetworkError)` when the server could not be reached
    pub async fn execute_request(
        request_builder: RequestBuilder,
        source_name: &str,
        url: &str,
    ) -> Result<(u16, String), FeedError> {
        log::debug!("[{source_name}] GET {url}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                FeedError::Timeout { after_ms: 0 }
            } else {
                FeedError::NetworkError {
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[{source_name}] Response Status: {status_code}");

        let response_text = response
            .text()
            .await
            .map_err(|e| FeedError::NetworkError {
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!(
            "[{source_name}] Response Body: {}",
            truncate_for_log(&response_text)
        );

        Ok((status_code, response_text))
    }

    /// Map a non-success status onto the error taxonomy
    ///
    /// 404 and 5xx mean the campaign cannot be served; everything else outside
    /// 2xx is treated as transient.
    pub fn check_status(status_code: u16, body: &str, campaign: &str) -> Result<(), FeedError> {
        match status_code {
            200..=299 => Ok(()),
            404 => Err(FeedError::NotFound {
                campaign: campaign.to_string(),
            }),
            500..=599 => Err(FeedError::ServerError {
                status: status_code,
                detail: truncate_for_log(body),
            }),
            _ => Err(FeedError::HttpStatus {
                status: status_code,
                detail: truncate_for_log(body),
            }),
        }
    }

    /// Parse JSON response
    ///
    /// # Returns
    /// * `Ok(T)` - successfully parsed
    /// * `Err(FeedError::ParseError)` - parsing failed
    pub fn parse_json<T>(response_text: &str, source_name: &str) -> Result<T, FeedError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::warn!("[{source_name}] JSON parse failed: {e}");
            log::warn!(
                "[{source_name}] Raw response: {}",
                truncate_for_log(response_text)
            );
            FeedError::ParseError {
                detail: e.to_string(),
            }
        })
    }
}
