//! Markup generation
//!
//! Rendering is a pure function of a [`View`], the widget config and the theme.
//! Applying the result to a live page is the job of
//! [`IsolatedRoot`](crate::traits::IsolatedRoot) or the frame document.

mod escape;
mod frame;
mod styles;

pub use escape::escape_html;
pub use frame::{BRIDGE_PROTOCOL_VERSION, render_frame_document};
pub use styles::{CARD_WIDTH_PX, stylesheet};

use testimonial_feed::Testimonial;

use crate::config::WidgetConfig;
use crate::theme::Theme;

/// Action name carried by the manual fallback control.
pub const FALLBACK_ACTION: &str = "fallback";

const MAX_STARS: usize = 5;
const CARD_STAGGER_MS: usize = 60;

/// Generated HTML. Untrusted text inside has already been escaped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Markup(String);

impl Markup {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Markup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inline error block content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorView<'a> {
    pub message: &'a str,
    pub hint: Option<&'a str>,
    /// Show the manual "switch to fallback" control.
    pub offer_fallback: bool,
}

/// What to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View<'a> {
    Loading,
    /// Loaded list; an empty slice renders the empty-result message.
    Testimonials(&'a [Testimonial]),
    Error(ErrorView<'a>),
}

/// Where the markup is going to live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Isolated,
    Document,
}

/// Theme-driven template compiler.
#[derive(Debug, Clone)]
pub struct RenderEngine {
    version: String,
}

impl RenderEngine {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Markup for an isolated subtree.
    ///
    /// `config` is `None` only when configuration itself failed; the output
    /// then uses default presentation.
    pub fn render(&self, view: &View<'_>, config: Option<&WidgetConfig>, theme: &Theme) -> Markup {
        self.render_for(Target::Isolated, view, config, theme)
    }

    /// Markup for the body of a standalone frame document.
    pub(crate) fn render_document_body(
        &self,
        view: &View<'_>,
        config: &WidgetConfig,
        theme: &Theme,
    ) -> Markup {
        self.render_for(Target::Document, view, Some(config), theme)
    }

    fn render_for(
        &self,
        target: Target,
        view: &View<'_>,
        config: Option<&WidgetConfig>,
        theme: &Theme,
    ) -> Markup {
        let animation = config.is_some_and(|c| c.animation);
        let mut html = String::new();

        html.push_str("<style>");
        html.push_str(&stylesheet(theme, animation, target == Target::Isolated));
        html.push_str("</style>");

        html.push_str(&format!(
            r#"<div class="tw-widget tw-theme-{}" data-widget-version="{}""#,
            theme.name.as_str(),
            escape_html(&self.version)
        ));
        if let Some(config) = config {
            html.push_str(&format!(
                r#" data-campaign="{}""#,
                escape_html(&config.campaign_id)
            ));
        }
        html.push('>');

        if let Some(config) = config {
            html.push_str(&format!(
                r#"<h3 class="tw-title">{}</h3>"#,
                escape_html(&config.title)
            ));
        }

        match view {
            View::Loading => html.push_str(
                r#"<p class="tw-status" role="status" aria-live="polite">Loading testimonials…</p>"#,
            ),
            View::Testimonials([]) => {
                html.push_str(r#"<p class="tw-empty">No testimonials yet.</p>"#);
            }
            View::Testimonials(items) => {
                let show_rating = config.is_none_or(|c| c.show_rating);
                html.push_str(r#"<div class="tw-track" role="list">"#);
                for (index, item) in items.iter().enumerate() {
                    render_card(&mut html, item, index, show_rating, animation);
                }
                html.push_str("</div>");
            }
            View::Error(error) => render_error(&mut html, error),
        }

        html.push_str("</div>");
        Markup(html)
    }
}

fn render_card(html: &mut String, item: &Testimonial, index: usize, rating: bool, animation: bool) {
    if animation {
        html.push_str(&format!(
            r#"<article class="tw-card" role="listitem" style="animation-delay:{}ms">"#,
            index * CARD_STAGGER_MS
        ));
    } else {
        html.push_str(r#"<article class="tw-card" role="listitem">"#);
    }

    if rating && let Some(value) = item.rating {
        html.push_str(&stars(value));
    }

    html.push_str(&format!(
        r#"<p class="tw-body">{}</p><footer class="tw-meta"><span class="tw-name">{}</span>"#,
        escape_html(&item.body),
        escape_html(&item.name)
    ));
    if let Some(created_at) = item.created_at {
        html.push_str(&format!(
            r#"<time datetime="{}">{}</time>"#,
            created_at.format("%Y-%m-%d"),
            created_at.format("%b %-d, %Y")
        ));
    }
    html.push_str("</footer></article>");
}

/// Number of filled stars for a rating.
pub fn filled_stars(rating: i32) -> usize {
    usize::try_from(rating.clamp(0, 5)).unwrap_or(0)
}

fn stars(rating: i32) -> String {
    let filled = filled_stars(rating);
    format!(
        r#"<div class="tw-stars" role="img" aria-label="{filled} out of {MAX_STARS} stars">{}<span class="tw-star-empty">{}</span></div>"#,
        "★".repeat(filled),
        "☆".repeat(MAX_STARS - filled)
    )
}

fn render_error(html: &mut String, error: &ErrorView<'_>) {
    html.push_str(&format!(
        r#"<div class="tw-error" role="alert"><p class="tw-error-message">{}</p>"#,
        escape_html(error.message)
    ));
    if let Some(hint) = error.hint {
        html.push_str(&format!(
            r#"<p class="tw-error-hint">{}</p>"#,
            escape_html(hint)
        ));
    }
    if error.offer_fallback {
        html.push_str(&format!(
            r#"<button type="button" class="tw-fallback-button" data-widget-action="{FALLBACK_ACTION}">Show testimonials in compatibility mode</button>"#
        ));
    }
    html.push_str("</div>");
}
