use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Largest number of testimonials a single widget may request.
pub const MAX_LIMIT: u32 = 50;

/// Number of testimonials requested when the host does not say otherwise.
pub const DEFAULT_LIMIT: u32 = 10;

/// Ordering requested from the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Most recent first.
    #[default]
    Newest,
    /// Oldest first.
    Oldest,
    /// Highest rating first.
    Rating,
}

impl SortOrder {
    /// Wire value used in query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Rating => "rating",
        }
    }

    /// Parse a wire value, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "newest" => Some(Self::Newest),
            "oldest" => Some(Self::Oldest),
            "rating" => Some(Self::Rating),
            _ => None,
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single testimonial as served by the endpoint.
///
/// Every string field is untrusted user input and must be escaped before it is
/// placed into markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    /// Display name of the author.
    #[serde(alias = "author", alias = "customerName")]
    pub name: String,
    /// Testimonial text.
    #[serde(alias = "content", alias = "text")]
    pub body: String,
    /// Optional 1-5 rating. Out-of-range values are clamped at render time.
    #[serde(default, deserialize_with = "lenient_rating")]
    pub rating: Option<i32>,
    /// Creation timestamp.
    #[serde(
        default,
        alias = "created_at",
        with = "crate::utils::datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

/// Integer rating from a number or numeric string; fractions are truncated and
/// anything else reads as no rating.
fn lenient_rating<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(rating_from_value))
}

fn rating_from_value(value: &serde_json::Value) -> Option<i32> {
    let number = match value {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !number.is_finite() {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    Some(number.trunc().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32)
}

/// Parameters of one testimonials request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TestimonialQuery {
    /// Campaign identifier. Never empty.
    pub campaign: String,
    /// Maximum number of results, within `1..=MAX_LIMIT`.
    pub limit: u32,
    /// Requested ordering.
    pub sort: SortOrder,
}

impl TestimonialQuery {
    /// Build a query, clamping `limit` into `1..=MAX_LIMIT`.
    pub fn new(campaign: impl Into<String>, limit: u32, sort: SortOrder) -> Self {
        Self {
            campaign: campaign.into(),
            limit: limit.clamp(1, MAX_LIMIT),
            sort,
        }
    }

    /// Query-string pairs in the order the endpoint documents them.
    pub fn query_pairs(&self) -> [(&'static str, String); 3] {
        [
            ("campaign", self.campaign.clone()),
            ("limit", self.limit.to_string()),
            ("sort", self.sort.as_str().to_string()),
        ]
    }
}

/// Response envelope: `{ "testimonials": [...] }`.
///
/// Items stay raw so one bad record can be dropped without losing the rest.
#[derive(Debug, Deserialize)]
pub(crate) struct TestimonialsEnvelope {
    pub testimonials: Option<Vec<serde_json::Value>>,
}
