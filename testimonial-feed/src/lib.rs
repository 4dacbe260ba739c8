//! # testimonial-feed
//!
//! Data side of the embeddable testimonial widget: the [`Testimonial`] entity,
//! the request shape, and a [`DataLoader`] that fetches with a timeout,
//! cancellation and a bounded retry budget.
//!
//! ## Endpoint contract
//!
//! ```text
//! GET <endpoint>?campaign=<id>&limit=<n>&sort=<newest|oldest|rating>
//! 200 { "testimonials": [ { "name", "body", "rating"?, "createdAt"? }, ... ] }
//! 404 / 5xx when the campaign is unknown or unavailable
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use testimonial_feed::{
//!     CancelSignal, DataLoader, HttpTestimonialSource, SortOrder, TestimonialQuery,
//! };
//!
//! # async fn example() -> testimonial_feed::Result<()> {
//! let source = HttpTestimonialSource::new("https://app.example.com/api/widget/testimonials")?;
//! let loader = DataLoader::new(Arc::new(source));
//! let query = TestimonialQuery::new("demo", 10, SortOrder::Newest);
//! let items = loader.load(&query, &CancelSignal::new()).await?;
//! for t in &items {
//!     println!("{}: {}", t.name, t.body);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every failure is a [`FeedError`]. [`FeedError::disposition`] says whether a
//! failure is worth another attempt ([`Disposition::Retry`]) or means the
//! campaign cannot be served inline ([`Disposition::Fallback`]). The loader
//! only ever returns errors of the second kind.

mod cancel;
mod error;
mod http_client;
mod loader;
mod source;
mod traits;
mod types;
mod utils;

pub use cancel::CancelSignal;
pub use error::{Disposition, FeedError, Result};
pub use http_client::HttpUtils;
pub use loader::{DEFAULT_TIMEOUT, DataLoader, RetryPolicy};
pub use source::HttpTestimonialSource;
pub use traits::TestimonialSource;
pub use types::{DEFAULT_LIMIT, MAX_LIMIT, SortOrder, Testimonial, TestimonialQuery};

pub use utils::{datetime, log_sanitizer};
