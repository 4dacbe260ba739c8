//! Isolation controller - picks between isolated rendering and the iframe
//! fallback for one host element
//!
//! Isolation is attempted once, at construction. Any disqualifying signal
//! afterwards (missing primitive, failed load, failed render) goes through
//! [`IsolationController::fallback`], which swaps the isolated tree for an
//! iframe. The switch is one-way.

use std::sync::Arc;

use serde::Serialize;
use testimonial_feed::{CancelSignal, FeedError};
use url::Url;

use crate::config::{ConfigParser, WidgetConfig};
use crate::error::{ConfigError, WidgetError};
use crate::page::PageContext;
use crate::render::{ErrorView, FALLBACK_ACTION, View};
use crate::state::RenderState;
use crate::theme::Theme;
use crate::traits::{FrameSpec, HostElement, IsolatedRoot, IsolationSupport};

/// Initial iframe height before the first resize message.
pub const INITIAL_FRAME_HEIGHT: u32 = 400;

const UNAVAILABLE_MESSAGE: &str = "Testimonials are unavailable right now.";
const UNAVAILABLE_HINT: &str = "Please check back in a little while.";
const UNREACHABLE_HINT: &str = "Check your connection and reload the page.";
const NOTHING_RENDERED_NOTICE: &str = "Testimonials could not be displayed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IsolationMode {
    AttemptingIsolation,
    Isolated,
    Iframe,
}

/// Why a widget left isolated mode.
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    PlatformUnsupported(String),
    LoadFailed(FeedError),
    RenderFailed(String),
    Manual,
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PlatformUnsupported(reason) => write!(f, "isolation unsupported: {reason}"),
            Self::LoadFailed(e) => write!(f, "load failed: {e}"),
            Self::RenderFailed(detail) => write!(f, "render failed: {detail}"),
            Self::Manual => f.write_str("requested by visitor"),
        }
    }
}

pub struct IsolationController {
    ctx: Arc<PageContext>,
    element: Arc<dyn HostElement>,
    instance_id: u64,
    config: Result<WidgetConfig, ConfigError>,
    theme: Theme,
    mode: IsolationMode,
    state: RenderState,
    root: Option<Arc<dyn IsolatedRoot>>,
    frame: Option<FrameSpec>,
    cancel: CancelSignal,
    last_error: Option<WidgetError>,
}

impl IsolationController {
    /// Parse the element's configuration and try to acquire an isolated root.
    ///
    /// Falls back to the iframe immediately, without any network traffic,
    /// when isolation is unavailable.
    pub fn new(ctx: Arc<PageContext>, element: Arc<dyn HostElement>) -> Self {
        let instance_id = ctx.next_instance_id();
        let config = ConfigParser::parse(element.as_ref());
        let theme = config
            .as_ref()
            .map_or_else(|_| Theme::default(), |c| Theme::resolve(c.theme));

        let mut controller = Self {
            ctx,
            element,
            instance_id,
            config,
            theme,
            mode: IsolationMode::AttemptingIsolation,
            state: RenderState::Idle,
            root: None,
            frame: None,
            cancel: CancelSignal::new(),
            last_error: None,
        };

        match controller.element.attach_isolated_root() {
            IsolationSupport::Supported(root) => {
                controller.root = Some(root);
                controller.mode = IsolationMode::Isolated;
                controller.note("isolated root acquired");
            }
            IsolationSupport::Unsupported(reason) => {
                controller.note(&format!("isolation unavailable: {reason}"));
                controller.last_error = Some(WidgetError::PlatformUnsupported(reason.clone()));
                if controller.config.is_ok() {
                    controller.set_state(RenderState::Error);
                    controller.fallback(FallbackReason::PlatformUnsupported(reason));
                }
            }
        }

        if let Err(e) = controller.config.clone() {
            controller.show_config_error(&e);
        }

        controller
    }

    /// Load and render. Returns the settled state.
    ///
    /// Does nothing unless the widget is isolated and idle.
    pub async fn start(&mut self) -> RenderState {
        if self.mode != IsolationMode::Isolated || self.state != RenderState::Idle {
            return self.state;
        }
        let Ok(config) = self.config.clone() else {
            return self.state;
        };

        self.set_state(RenderState::Loading);
        if let Err(e) = self.apply(&View::Loading) {
            self.on_render_failure(e);
            return self.state;
        }

        let query = config.query();
        let data = if let Some(cached) = self.ctx.cache().read(&query) {
            self.note(&format!("serving {} cached testimonials", cached.len()));
            cached
        } else {
            match self.ctx.loader().load(&query, &self.cancel).await {
                Ok(items) => {
                    self.ctx.cache().write(&query, &items);
                    items
                }
                Err(e) => {
                    self.on_load_failure(e);
                    return self.state;
                }
            }
        };

        match self.apply(&View::Testimonials(&data)) {
            Ok(()) => {
                self.set_state(RenderState::Rendered);
                self.note(&format!("rendered {} testimonials", data.len()));
            }
            Err(e) => self.on_render_failure(e),
        }
        self.state
    }

    /// Replace the isolated render with an iframe. Idempotent; a second call
    /// once in [`IsolationMode::Iframe`] changes nothing.
    pub fn fallback(&mut self, reason: FallbackReason) {
        if self.mode == IsolationMode::Iframe || self.state.is_terminal() {
            self.note(&format!("already in iframe mode, ignoring fallback ({reason})"));
            return;
        }
        let Ok(config) = self.config.as_ref() else {
            log::warn!("{} Cannot fall back without a campaign id ({reason})", self.tag());
            return;
        };
        let frame = match self.frame_spec(config) {
            Ok(frame) => frame,
            Err(e) => {
                log::error!("{} Cannot build frame URL: {e}", self.tag());
                return;
            }
        };

        log::warn!("{} Switching to iframe: {reason}", self.tag());

        self.cancel.cancel();
        if let Some(root) = self.root.take() {
            root.teardown();
        }
        if !matches!(self.state, RenderState::Error | RenderState::Rendered) {
            self.set_state(RenderState::Error);
        }

        match self.element.mount_frame(&frame) {
            Ok(()) => {
                self.ctx
                    .resize_bridge()
                    .register(frame.id.clone(), Arc::clone(&self.element));
            }
            Err(e) => {
                log::error!("{} Mounting iframe failed: {e}", self.tag());
                self.element.show_notice(NOTHING_RENDERED_NOTICE);
            }
        }

        self.mode = IsolationMode::Iframe;
        self.frame = Some(frame);
        self.set_state(RenderState::FallenBack);
    }

    /// Handle a `data-widget-action` from the rendered markup. Returns whether
    /// the action was acted upon.
    pub fn handle_action(&mut self, action: &str) -> bool {
        if action == FALLBACK_ACTION
            && self.allows_fallback()
            && self.mode == IsolationMode::Isolated
            && self.state == RenderState::Error
        {
            self.fallback(FallbackReason::Manual);
            return true;
        }
        false
    }

    pub fn mode(&self) -> IsolationMode {
        self.mode
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn config(&self) -> Result<&WidgetConfig, &ConfigError> {
        self.config.as_ref()
    }

    pub fn frame(&self) -> Option<&FrameSpec> {
        self.frame.as_ref()
    }

    pub fn last_error(&self) -> Option<&WidgetError> {
        self.last_error.as_ref()
    }

    pub fn instance_id(&self) -> u64 {
        self.instance_id
    }

    /// Signal that aborts this widget's in-flight load.
    pub fn cancel_signal(&self) -> CancelSignal {
        self.cancel.clone()
    }

    fn on_load_failure(&mut self, error: FeedError) {
        if error.is_expected() {
            log::warn!("{} Loading failed: {error}", self.tag());
        } else {
            log::error!("{} Loading failed: {error}", self.tag());
        }
        self.set_state(RenderState::Error);
        self.last_error = Some(WidgetError::Feed(error.clone()));

        let allow = self.allows_fallback();
        if allow && self.ctx.options().auto_fallback {
            self.fallback(FallbackReason::LoadFailed(error));
        } else {
            let hint = if error.is_transport() {
                UNREACHABLE_HINT
            } else {
                UNAVAILABLE_HINT
            };
            self.show_inline_error(ErrorView {
                message: UNAVAILABLE_MESSAGE,
                hint: Some(hint),
                offer_fallback: allow,
            });
        }
    }

    fn on_render_failure(&mut self, error: WidgetError) {
        log::error!("{} {error}", self.tag());
        let detail = error.to_string();
        if self.state == RenderState::Loading {
            self.set_state(RenderState::Error);
        }
        self.last_error = Some(error);

        let allow = self.allows_fallback();
        if allow && self.ctx.options().auto_fallback {
            self.fallback(FallbackReason::RenderFailed(detail));
        } else {
            self.show_inline_error(ErrorView {
                message: UNAVAILABLE_MESSAGE,
                hint: None,
                offer_fallback: allow,
            });
        }
    }

    fn show_config_error(&mut self, error: &ConfigError) {
        log::warn!("{} {error}", self.tag());
        if self.state == RenderState::Idle {
            self.set_state(RenderState::Error);
        }
        let message = error.to_string();
        let hint = error.remediation();
        self.show_inline_error(ErrorView {
            message: message.as_str(),
            hint: Some(hint.as_str()),
            offer_fallback: false,
        });
        self.last_error = Some(WidgetError::Config(error.clone()));
    }

    /// Render an error block, or a plain notice when no isolated root exists.
    fn show_inline_error(&self, view: ErrorView<'_>) {
        if self.root.is_none() {
            let text = match view.hint {
                Some(hint) => format!("{} {hint}", view.message),
                None => view.message.to_string(),
            };
            self.element.show_notice(&text);
            return;
        }
        if let Err(e) = self.apply(&View::Error(view)) {
            log::error!("{} Could not show inline error: {e}", self.tag());
            self.element.show_notice(NOTHING_RENDERED_NOTICE);
        }
    }

    fn apply(&self, view: &View<'_>) -> Result<(), WidgetError> {
        let Some(root) = self.root.as_ref() else {
            return Err(WidgetError::Render("isolated root is gone".to_string()));
        };
        let markup = self
            .ctx
            .engine()
            .render(view, self.config.as_ref().ok(), &self.theme);
        root.replace_content(&markup).map_err(WidgetError::Render)
    }

    fn frame_spec(&self, config: &WidgetConfig) -> Result<FrameSpec, url::ParseError> {
        let mut src = Url::parse(&self.ctx.options().frame_url)?;
        src.query_pairs_mut()
            .append_pair("campaign", &config.campaign_id)
            .append_pair("limit", &config.limit.to_string())
            .append_pair("sort", config.sort.as_str())
            .append_pair("theme", config.theme.as_str())
            .append_pair("origin", &self.ctx.page_origin());

        Ok(FrameSpec {
            id: format!("tw-frame-{}-{}", id_fragment(&config.campaign_id), self.instance_id),
            src: src.into(),
            title: config.title.clone(),
            initial_height: INITIAL_FRAME_HEIGHT,
        })
    }

    fn allows_fallback(&self) -> bool {
        self.config
            .as_ref()
            .is_ok_and(|c| c.allow_iframe_fallback)
    }

    fn set_state(&mut self, to: RenderState) {
        match self.state.transition(to) {
            Ok(next) => self.state = next,
            Err(e) => log::warn!("{} {e}", self.tag()),
        }
    }

    fn tag(&self) -> String {
        match &self.config {
            Ok(c) => format!("[widget:{}#{}]", c.campaign_id, self.instance_id),
            Err(_) => format!("[widget:?#{}]", self.instance_id),
        }
    }

    fn note(&self, message: &str) {
        if self.ctx.options().debug {
            log::info!("{} {message}", self.tag());
        } else {
            log::debug!("{} {message}", self.tag());
        }
    }
}

impl Drop for IsolationController {
    /// Stop any in-flight load and release the frame's bridge registration.
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(frame) = &self.frame {
            self.ctx.release_frame(&frame.id);
        }
    }
}

/// Campaign id reduced to characters safe in an element id.
fn id_fragment(campaign_id: &str) -> String {
    campaign_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::RuntimeOptions;
    use crate::test_utils::{Harness, IsolationBehavior, MockHostElement, sample_testimonials};
    use std::time::Duration;

    fn demo_element() -> Arc<MockHostElement> {
        Arc::new(MockHostElement::new(&[
            ("data-campaign", "demo"),
            ("data-sort", "rating"),
            ("data-theme", "dark"),
        ]))
    }

    #[tokio::test(start_paused = true)]
    async fn renders_cards_from_endpoint() {
        let harness = Harness::new(vec![Ok(sample_testimonials())]);
        let element = demo_element();

        let controller = harness.ctx.mount(element.clone()).await;

        assert_eq!(controller.mode(), IsolationMode::Isolated);
        assert_eq!(controller.state(), RenderState::Rendered);
        assert_eq!(harness.source.calls(), 1);

        let html = element.isolated_html().unwrap_or_default();
        assert_eq!(html.matches(r#"class="tw-card""#).count(), 2);
        assert!(html.contains(r#"aria-label="5 out of 5 stars""#));
        assert!(html.contains(r#"aria-label="3 out of 5 stars""#));
        assert!(element.frames().is_empty());
        assert!(!harness.ctx.bridge_installed());
    }

    #[tokio::test(start_paused = true)]
    async fn successful_load_is_cached() {
        let harness = Harness::new(vec![Ok(sample_testimonials())]);
        harness.ctx.mount(demo_element()).await;
        let second = harness.ctx.mount(demo_element()).await;

        assert_eq!(second.state(), RenderState::Rendered);
        assert_eq!(harness.source.calls(), 1);
        assert!(harness.storage.contains_key("testimonials_cache_demo"));
    }

    #[tokio::test(start_paused = true)]
    async fn expired_cache_refetches() {
        let harness = Harness::new(vec![Ok(sample_testimonials())]);
        harness.ctx.mount(demo_element()).await;
        harness.clock.advance(Duration::from_secs(301));
        harness.ctx.mount(demo_element()).await;

        assert_eq!(harness.source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_result_shows_message() {
        let harness = Harness::new(vec![Ok(Vec::new())]);
        let element = demo_element();
        let controller = harness.ctx.mount(element.clone()).await;

        assert_eq!(controller.state(), RenderState::Rendered);
        assert!(
            element
                .isolated_html()
                .is_some_and(|h| h.contains("No testimonials yet."))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn not_found_falls_back_to_iframe() {
        let harness = Harness::new(vec![Err(FeedError::NotFound {
            campaign: "demo".into(),
        })]);
        let element = demo_element();

        let controller = harness.ctx.mount(element.clone()).await;

        assert_eq!(controller.mode(), IsolationMode::Iframe);
        assert_eq!(controller.state(), RenderState::FallenBack);
        assert_eq!(harness.source.calls(), 1);
        assert!(element.root_torn_down());

        let frames = element.frames();
        assert_eq!(frames.len(), 1);
        let src = &frames[0].0.src;
        assert!(src.starts_with("https://app.testimonials.example/embed/frame?"));
        assert!(src.contains("campaign=demo"));
        assert!(src.contains("sort=rating"));
        assert!(src.contains("theme=dark"));
        assert!(src.contains("origin=https%3A%2F%2Fshop.example"));
        assert_eq!(harness.ctx.resize_bridge().registered_frames(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unsupported_isolation_skips_network() {
        let harness = Harness::new(vec![Ok(sample_testimonials())]);
        let element = Arc::new(
            MockHostElement::new(&[("data-campaign", "demo")])
                .with_isolation(IsolationBehavior::Unsupported),
        );

        let controller = IsolationController::new(harness.ctx.clone(), element.clone());
        assert_eq!(controller.mode(), IsolationMode::Iframe);
        assert_eq!(harness.source.calls(), 0);

        let mut controller = controller;
        assert_eq!(controller.start().await, RenderState::FallenBack);
        assert_eq!(harness.source.calls(), 0);
        assert_eq!(element.frames().len(), 1);
        assert!(matches!(
            controller.last_error(),
            Some(WidgetError::PlatformUnsupported(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn transient_errors_retry_then_fall_back() {
        let harness = Harness::new(vec![Err(FeedError::HttpStatus {
            status: 429,
            detail: String::new(),
        })]);
        let element = demo_element();

        let controller = harness.ctx.mount(element.clone()).await;

        assert_eq!(harness.source.calls(), 3);
        assert_eq!(controller.mode(), IsolationMode::Iframe);
        assert!(matches!(
            controller.last_error(),
            Some(WidgetError::Feed(FeedError::RetriesExhausted { attempts: 3, .. }))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn fallback_twice_equals_fallback_once() {
        let harness = Harness::new(vec![Err(FeedError::ServerError {
            status: 503,
            detail: String::new(),
        })]);
        let element = demo_element();
        let mut controller = harness.ctx.mount(element.clone()).await;
        let once = element.snapshot();

        controller.fallback(FallbackReason::Manual);

        assert_eq!(element.snapshot(), once);
        assert_eq!(element.mount_calls(), 1);
        assert_eq!(controller.state(), RenderState::FallenBack);
        assert_eq!(harness.page.listener_installs(), 1);
        assert_eq!(harness.ctx.resize_bridge().registered_frames(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_campaign_shows_config_error_without_network() {
        let harness = Harness::new(vec![Ok(sample_testimonials())]);
        let element = Arc::new(MockHostElement::new(&[("data-theme", "dark")]));

        let mut controller = harness.ctx.mount(element.clone()).await;

        assert_eq!(harness.source.calls(), 0);
        assert_eq!(controller.state(), RenderState::Error);
        assert!(controller.config().is_err());
        let html = element.isolated_html().unwrap_or_default();
        assert!(html.contains("Missing campaign id"));
        assert!(html.contains("Add data-campaign="));
        assert!(!html.contains("data-widget-action"));

        controller.fallback(FallbackReason::Manual);
        assert!(element.frames().is_empty());
        assert_eq!(controller.mode(), IsolationMode::Isolated);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_campaign_without_isolation_writes_notice() {
        let harness = Harness::new(vec![Ok(sample_testimonials())]);
        let element = Arc::new(
            MockHostElement::new(&[]).with_isolation(IsolationBehavior::Unsupported),
        );

        let controller = harness.ctx.mount(element.clone()).await;

        assert_eq!(harness.source.calls(), 0);
        assert_eq!(controller.state(), RenderState::Error);
        assert!(element.frames().is_empty());
        assert!(
            element
                .notices()
                .iter()
                .any(|n| n.contains("Missing campaign id"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn manual_fallback_when_auto_fallback_is_off() {
        let options = RuntimeOptions {
            auto_fallback: false,
            ..RuntimeOptions::default()
        };
        let harness = Harness::with_options(
            options,
            vec![Err(FeedError::NetworkError {
                detail: "blocked by CSP".into(),
            })],
        );
        let element = demo_element();
        let mut controller = harness.ctx.mount(element.clone()).await;

        assert_eq!(controller.state(), RenderState::Error);
        assert_eq!(controller.mode(), IsolationMode::Isolated);
        let html = element.isolated_html().unwrap_or_default();
        assert!(html.contains(r#"data-widget-action="fallback""#));
        assert!(html.contains(UNREACHABLE_HINT));

        assert!(!controller.handle_action("reload"));
        assert!(controller.handle_action("fallback"));
        assert_eq!(controller.mode(), IsolationMode::Iframe);
        assert_eq!(controller.state(), RenderState::FallenBack);
        assert!(!controller.handle_action("fallback"));
    }

    #[tokio::test(start_paused = true)]
    async fn disallowed_fallback_keeps_inline_error() {
        let harness = Harness::new(vec![Err(FeedError::NotFound {
            campaign: "demo".into(),
        })]);
        let element = Arc::new(MockHostElement::new(&[
            ("data-campaign", "demo"),
            ("data-allow-fallback", "false"),
        ]));
        let mut controller = harness.ctx.mount(element.clone()).await;

        assert_eq!(controller.state(), RenderState::Error);
        assert_eq!(controller.mode(), IsolationMode::Isolated);
        let html = element.isolated_html().unwrap_or_default();
        assert!(html.contains("Testimonials are unavailable right now."));
        assert!(html.contains(UNAVAILABLE_HINT));
        assert!(!html.contains("data-widget-action"));
        assert!(!controller.handle_action("fallback"));
        assert!(element.frames().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn render_failure_falls_back_before_fetching() {
        let harness = Harness::new(vec![Ok(sample_testimonials())]);
        let element = Arc::new(
            MockHostElement::new(&[("data-campaign", "demo")])
                .with_isolation(IsolationBehavior::FailingWrites),
        );

        let controller = harness.ctx.mount(element.clone()).await;

        assert_eq!(controller.mode(), IsolationMode::Iframe);
        assert_eq!(controller.state(), RenderState::FallenBack);
        assert_eq!(harness.source.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rendered_widget_can_still_fall_back() {
        let harness = Harness::new(vec![Ok(sample_testimonials())]);
        let element = demo_element();
        let mut controller = harness.ctx.mount(element.clone()).await;

        controller.fallback(FallbackReason::Manual);

        assert_eq!(controller.state(), RenderState::FallenBack);
        assert!(element.isolated_html().is_none());
        assert_eq!(element.frames().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_load_falls_back() {
        let harness = Harness::new(vec![Ok(sample_testimonials())]);
        let mut controller = IsolationController::new(harness.ctx.clone(), demo_element());
        controller.cancel_signal().cancel();

        controller.start().await;

        assert_eq!(harness.source.calls(), 0);
        assert_eq!(controller.mode(), IsolationMode::Iframe);
    }

    #[tokio::test(start_paused = true)]
    async fn widgets_share_one_listener_and_get_distinct_frames() {
        let harness = Harness::new(vec![Err(FeedError::NotFound {
            campaign: "x".into(),
        })]);
        let first = harness.ctx.mount(demo_element()).await;
        let second = harness
            .ctx
            .mount(Arc::new(MockHostElement::new(&[("data-campaign", "spring sale")])))
            .await;

        assert_eq!(harness.page.listener_installs(), 1);
        assert_eq!(harness.ctx.resize_bridge().registered_frames(), 2);
        let ids: Vec<_> = [&first, &second]
            .iter()
            .filter_map(|c| c.frame().map(|f| f.id.clone()))
            .collect();
        assert_eq!(ids, vec!["tw-frame-demo-1".to_string(), "tw-frame-spring-sale-2".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn frame_resize_flows_through_page_listener() {
        let harness = Harness::new(vec![Err(FeedError::NotFound {
            campaign: "demo".into(),
        })]);
        let element = demo_element();
        let controller = harness.ctx.mount(element.clone()).await;
        let frame_id = controller.frame().map(|f| f.id.clone()).unwrap_or_default();

        let outcome = harness.page.post(
            "https://app.testimonials.example",
            Some(&frame_id),
            serde_json::json!({"type": "resize", "height": 720}),
        );

        assert!(matches!(
            outcome,
            Some(crate::bridge::BridgeOutcome::Applied { height: 720, .. })
        ));
        assert_eq!(element.frame_height(&frame_id), Some(720));
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_widget_releases_its_frame() {
        let harness = Harness::new(vec![Err(FeedError::NotFound {
            campaign: "demo".into(),
        })]);
        let element = demo_element();
        let controller = harness.ctx.mount(element.clone()).await;
        let frame_id = controller.frame().map(|f| f.id.clone()).unwrap_or_default();
        assert_eq!(harness.ctx.resize_bridge().registered_frames(), 1);

        drop(controller);

        assert_eq!(harness.ctx.resize_bridge().registered_frames(), 0);
        let outcome = harness.page.post(
            "https://app.testimonials.example",
            Some(&frame_id),
            serde_json::json!({"type": "resize", "height": 720}),
        );
        assert!(matches!(
            outcome,
            Some(crate::bridge::BridgeOutcome::Rejected(
                crate::bridge::RejectReason::UnknownFrame(_)
            ))
        ));
        assert_eq!(element.frame_height(&frame_id), Some(INITIAL_FRAME_HEIGHT));
    }

    #[test]
    fn id_fragment_replaces_unsafe_characters() {
        assert_eq!(id_fragment("spring sale/2026"), "spring-sale-2026");
        assert_eq!(id_fragment("demo_1"), "demo_1");
    }
}
