//! Testimonial Widget Runtime
//!
//! Turns a host element carrying `data-campaign` into a themed, horizontally
//! scrolling strip of testimonial cards:
//! - Configuration parsing from host element attributes
//! - TTL cache in front of the testimonials endpoint
//! - Style-isolated rendering with a one-way iframe fallback
//! - A page-wide, origin-checked resize bridge for fallback frames
//!
//! The DOM is reached only through the [`traits`] module, so the runtime can
//! be driven by a browser adapter or by in-memory implementations.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use testimonial_widget::{HostElement, HostPage, PageContext, RuntimeOptions};
//! use testimonial_widget::traits::InMemoryStorage;
//!
//! # async fn example(page: Arc<dyn HostPage>, element: Arc<dyn HostElement>) -> testimonial_widget::WidgetResult<()> {
//! let ctx = Arc::new(PageContext::with_http(
//!     RuntimeOptions::default(),
//!     page,
//!     Arc::new(InMemoryStorage::new()),
//! )?);
//! let widget = ctx.mount(element).await;
//! println!("{:?} / {:?}", widget.mode(), widget.state());
//! # Ok(())
//! # }
//! ```

pub mod bridge;
pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
pub mod options;
pub mod page;
pub mod render;
pub mod state;
pub mod theme;
pub mod traits;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use bridge::{BridgeOutcome, IncomingMessage, MAX_FRAME_HEIGHT, RejectReason, ResizeBridge};
pub use cache::{CacheStore, Clock, SystemClock};
pub use config::{ConfigParser, WidgetConfig};
pub use controller::{FallbackReason, IsolationController, IsolationMode};
pub use error::{ConfigError, FeedError, WidgetError, WidgetResult};
pub use options::{RuntimeOptions, WIDGET_VERSION};
pub use page::PageContext;
pub use render::{ErrorView, Markup, RenderEngine, View, render_frame_document};
pub use state::RenderState;
pub use theme::{Theme, ThemeName};
pub use traits::{HostElement, HostPage, IsolatedRoot, IsolationSupport, KeyValueStorage};

pub use testimonial_feed;
