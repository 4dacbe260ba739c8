use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Testimonial, TestimonialQuery};

/// 推荐数据源 Trait
///
/// One call is one attempt against the backing endpoint. Timeouts, retries and
/// the fallback decision live in [`DataLoader`](crate::DataLoader), so
/// implementations only map transport and status failures onto
/// [`FeedError`](crate::FeedError).
#[async_trait]
pub trait TestimonialSource: Send + Sync {
    /// Source identifier, used as a log tag.
    fn id(&self) -> &'static str;

    /// Fetch testimonials for `query`.
    async fn fetch(&self, query: &TestimonialQuery) -> Result<Vec<Testimonial>>;
}
