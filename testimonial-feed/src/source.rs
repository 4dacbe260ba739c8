//! reqwest-backed testimonial source

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::error::{FeedError, Result};
use crate::http_client::HttpUtils;
use crate::traits::TestimonialSource;
use crate::types::{Testimonial, TestimonialQuery, TestimonialsEnvelope};

const SOURCE_NAME: &str = "feed";

/// Fetches testimonials with `GET <endpoint>?campaign=<id>&limit=<n>&sort=<key>`.
pub struct HttpTestimonialSource {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpTestimonialSource {
    /// Create a source for `endpoint`, which must be an absolute http(s) URL.
    pub fn new(endpoint: &str) -> Result<Self> {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    /// Create a source that shares an existing client.
    pub fn with_client(client: reqwest::Client, endpoint: &str) -> Result<Self> {
        let endpoint = parse_endpoint(endpoint)?;
        Ok(Self { client, endpoint })
    }

    /// Create a source whose client enforces `timeout` at the transport layer as well.
    pub fn with_timeout(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FeedError::NetworkError {
                detail: format!("Failed to build HTTP client: {e}"),
            })?;
        Self::with_client(client, endpoint)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Full request URL for `query`.
    pub fn request_url(&self, query: &TestimonialQuery) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().extend_pairs(query.query_pairs());
        url
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint).map_err(|e| FeedError::InvalidEndpoint {
        url: endpoint.to_string(),
        detail: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(FeedError::InvalidEndpoint {
            url: endpoint.to_string(),
            detail: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    Ok(url)
}

/// Decode a 2xx body into testimonials.
///
/// Invalid JSON is a [`FeedError::ParseError`]; JSON without a `testimonials`
/// array is a [`FeedError::MalformedPayload`]. Individual records that do not
/// decode are skipped.
pub(crate) fn decode_body(body: &str) -> Result<Vec<Testimonial>> {
    let value: serde_json::Value = HttpUtils::parse_json(body, SOURCE_NAME)?;
    let envelope: TestimonialsEnvelope =
        serde_json::from_value(value).map_err(|e| FeedError::MalformedPayload {
            detail: e.to_string(),
        })?;
    let items = envelope
        .testimonials
        .ok_or_else(|| FeedError::MalformedPayload {
            detail: "missing 'testimonials' array".to_string(),
        })?;

    let total = items.len();
    let decoded: Vec<Testimonial> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Testimonial>(item) {
            Ok(t) => Some(t),
            Err(e) => {
                log::warn!("[{SOURCE_NAME}] Skipping invalid testimonial: {e}");
                None
            }
        })
        .collect();
    if decoded.len() < total {
        log::warn!(
            "[{SOURCE_NAME}] Kept {} of {total} testimonials",
            decoded.len()
        );
    }
    Ok(decoded)
}

#[async_trait]
impl TestimonialSource for HttpTestimonialSource {
    fn id(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn fetch(&self, query: &TestimonialQuery) -> Result<Vec<Testimonial>> {
        let url = self.request_url(query);
        let request = self
            .client
            .get(url.clone())
            .header("Accept", "application/json");

        let (status, body) = HttpUtils::execute_request(request, SOURCE_NAME, url.as_str()).await?;
        HttpUtils::check_status(status, &body, &query.campaign)?;
        decode_body(&body)
    }
}
