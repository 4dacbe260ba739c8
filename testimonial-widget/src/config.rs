//! Host element attributes → [`WidgetConfig`]

use testimonial_feed::{DEFAULT_LIMIT, MAX_LIMIT, SortOrder, TestimonialQuery};

use crate::error::{CAMPAIGN_ATTRIBUTE, ConfigError};
use crate::theme::ThemeName;
use crate::traits::AttributeSource;

pub const LIMIT_ATTRIBUTE: &str = "data-limit";
pub const SORT_ATTRIBUTE: &str = "data-sort";
pub const THEME_ATTRIBUTE: &str = "data-theme";
pub const TITLE_ATTRIBUTE: &str = "data-title";
pub const SHOW_RATING_ATTRIBUTE: &str = "data-show-rating";
pub const ANIMATION_ATTRIBUTE: &str = "data-animation";
pub const ALLOW_FALLBACK_ATTRIBUTE: &str = "data-allow-fallback";

pub const DEFAULT_TITLE: &str = "What our customers say";

/// Per-element widget configuration. Never mutated after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    pub campaign_id: String,
    pub limit: u32,
    pub sort: SortOrder,
    pub theme: ThemeName,
    pub title: String,
    pub show_rating: bool,
    pub animation: bool,
    pub allow_iframe_fallback: bool,
}

impl WidgetConfig {
    /// Config with defaults for everything but the campaign.
    pub fn for_campaign(campaign_id: impl Into<String>) -> Self {
        Self {
            campaign_id: campaign_id.into(),
            limit: DEFAULT_LIMIT,
            sort: SortOrder::default(),
            theme: ThemeName::default(),
            title: DEFAULT_TITLE.to_string(),
            show_rating: true,
            animation: true,
            allow_iframe_fallback: true,
        }
    }

    pub fn query(&self) -> TestimonialQuery {
        TestimonialQuery::new(self.campaign_id.clone(), self.limit, self.sort)
    }
}

/// Reads widget attributes.
///
/// Only the campaign id is strict; every other attribute falls back to its
/// default when absent or unparseable.
pub struct ConfigParser;

impl ConfigParser {
    pub fn parse<S: AttributeSource + ?Sized>(source: &S) -> Result<WidgetConfig, ConfigError> {
        let campaign_id = source
            .attribute(CAMPAIGN_ATTRIBUTE)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingCampaign {
                attribute: CAMPAIGN_ATTRIBUTE,
            })?;

        let mut config = WidgetConfig::for_campaign(campaign_id);

        if let Some(limit) = source
            .attribute(LIMIT_ATTRIBUTE)
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|n| *n > 0)
        {
            config.limit = limit.min(MAX_LIMIT);
        }
        if let Some(sort) = source
            .attribute(SORT_ATTRIBUTE)
            .and_then(|v| SortOrder::parse(&v))
        {
            config.sort = sort;
        }
        if let Some(theme) = source.attribute(THEME_ATTRIBUTE) {
            config.theme = ThemeName::parse_or_default(&theme);
        }
        if let Some(title) = source
            .attribute(TITLE_ATTRIBUTE)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
        {
            config.title = title;
        }
        config.show_rating = parse_flag(source, SHOW_RATING_ATTRIBUTE, config.show_rating);
        config.animation = parse_flag(source, ANIMATION_ATTRIBUTE, config.animation);
        config.allow_iframe_fallback =
            parse_flag(source, ALLOW_FALLBACK_ATTRIBUTE, config.allow_iframe_fallback);

        Ok(config)
    }
}

fn parse_flag<S: AttributeSource + ?Sized>(source: &S, name: &str, default: bool) -> bool {
    match source.attribute(name) {
        Some(v) => match v.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" => false,
            _ => default,
        },
        None => default,
    }
}
