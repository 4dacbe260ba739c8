//! Unified error type definition

use thiserror::Error;

// Re-export library error type
pub use testimonial_feed::FeedError;

/// Attribute that names the campaign on the host element.
pub const CAMPAIGN_ATTRIBUTE: &str = "data-campaign";

/// Host element attributes cannot produce a usable configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The campaign attribute is absent or blank.
    #[error("Missing campaign id: the {attribute} attribute is required")]
    MissingCampaign { attribute: &'static str },
}

impl ConfigError {
    /// One-line fix shown next to the inline error.
    pub fn remediation(&self) -> String {
        match self {
            Self::MissingCampaign { attribute } => {
                format!("Add {attribute}=\"your-campaign-id\" to the widget element.")
            }
        }
    }
}

/// Widget layer error type
#[derive(Error, Debug)]
pub enum WidgetError {
    /// Host element configuration is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The isolated rendering primitive is unavailable
    #[error("Isolated rendering unsupported: {0}")]
    PlatformUnsupported(String),

    /// Loading testimonials failed (converting from library)
    #[error("{0}")]
    Feed(#[from] FeedError),

    /// Markup could not be applied to the page
    #[error("Render error: {0}")]
    Render(String),

    /// Runtime options failed validation
    #[error("Invalid runtime options: {0}")]
    InvalidOptions(String),
}

impl WidgetError {
    /// Whether it is expected behavior, used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Config(_) | Self::PlatformUnsupported(_) => true,
            Self::Feed(e) => e.is_expected(),
            Self::Render(_) | Self::InvalidOptions(_) => false,
        }
    }
}

/// Widget layer Result type alias
pub type WidgetResult<T> = std::result::Result<T, WidgetError>;
