use serde::{Deserialize, Serialize};

/// What the caller should do after a failed fetch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The failure may clear up on another attempt.
    Retry,
    /// The campaign cannot be served inline; switch to the frame renderer.
    Fallback,
}

/// Unified error type for testimonial loading.
///
/// Variants follow the way the widget reacts to them:
///
/// - [`NetworkError`](Self::NetworkError), [`Timeout`](Self::Timeout) and
///   [`Cancelled`](Self::Cancelled) mean the server could not be reached in time.
/// - [`NotFound`](Self::NotFound) and [`ServerError`](Self::ServerError) mean the
///   server answered but will not serve this campaign.
/// - [`HttpStatus`](Self::HttpStatus), [`ParseError`](Self::ParseError) and
///   [`MalformedPayload`](Self::MalformedPayload) are transient and retried by
///   [`DataLoader`](crate::DataLoader).
///
/// All variants are serializable for structured error reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum FeedError {
    /// The endpoint could not be reached (DNS failure, connection refused, CSP block, etc.).
    NetworkError {
        /// Error details.
        detail: String,
    },

    /// The request did not complete within the configured timeout.
    Timeout {
        /// Timeout that elapsed, in milliseconds.
        after_ms: u64,
    },

    /// The load was cancelled by its owner before it completed.
    Cancelled,

    /// The endpoint does not know the campaign (HTTP 404).
    NotFound {
        /// Campaign that was requested.
        campaign: String,
    },

    /// The endpoint failed with a 5xx status.
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Truncated response body.
        detail: String,
    },

    /// Any other non-success status (400, 403, 429, ...).
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Truncated response body.
        detail: String,
    },

    /// The response body is not valid JSON.
    ParseError {
        /// Details about the parse failure.
        detail: String,
    },

    /// The response is JSON but lacks the expected `testimonials` array.
    MalformedPayload {
        /// Details about the missing or mistyped field.
        detail: String,
    },

    /// The configured endpoint URL cannot be used.
    InvalidEndpoint {
        /// Offending URL.
        url: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// Transient failures kept happening until the retry budget ran out.
    RetriesExhausted {
        /// Total attempts made, including the first one.
        attempts: u32,
        /// The error of the final attempt.
        last: Box<FeedError>,
    },
}

impl FeedError {
    /// Classify the error into retry or fallback.
    ///
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn disposition(&self) -> Disposition {
        match self {
            Self::HttpStatus { .. } | Self::ParseError { .. } | Self::MalformedPayload { .. } => {
                Disposition::Retry
            }
            Self::NetworkError { .. }
            | Self::Timeout { .. }
            | Self::Cancelled
            | Self::NotFound { .. }
            | Self::ServerError { .. }
            | Self::InvalidEndpoint { .. }
            | Self::RetriesExhausted { .. } => Disposition::Fallback,
        }
    }

    /// Whether the error is an expected outcome, used to pick the log level.
    ///
    /// Returns `true` when `warn` is appropriate and `false` for `error`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::NotFound { .. } | Self::Cancelled | Self::HttpStatus { .. } => true,
            Self::RetriesExhausted { last, .. } => last.is_expected(),
            _ => false,
        }
    }

    /// Whether the server was never reached.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::Cancelled
        )
    }
}

impl std::fmt::Display for FeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { detail } => write!(f, "[feed] Network error: {detail}"),
            Self::Timeout { after_ms } => {
                write!(f, "[feed] Request timed out after {after_ms}ms")
            }
            Self::Cancelled => write!(f, "[feed] Request cancelled"),
            Self::NotFound { campaign } => {
                write!(f, "[feed] Campaign '{campaign}' not found")
            }
            Self::ServerError { status, .. } => {
                write!(f, "[feed] Server error (HTTP {status})")
            }
            Self::HttpStatus { status, detail } => {
                if detail.is_empty() {
                    write!(f, "[feed] Unexpected status HTTP {status}")
                } else {
                    write!(f, "[feed] Unexpected status HTTP {status}: {detail}")
                }
            }
            Self::ParseError { detail } => write!(f, "[feed] Parse error: {detail}"),
            Self::MalformedPayload { detail } => {
                write!(f, "[feed] Malformed payload: {detail}")
            }
            Self::InvalidEndpoint { url, detail } => {
                write!(f, "[feed] Invalid endpoint '{url}': {detail}")
            }
            Self::RetriesExhausted { attempts, last } => {
                write!(f, "[feed] Gave up after {attempts} attempts: {last}")
            }
        }
    }
}

impl std::error::Error for FeedError {}

/// Convenience type alias for `Result<T, FeedError>`.
pub type Result<T> = std::result::Result<T, FeedError>;
