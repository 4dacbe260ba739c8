//! Page context - holds everything shared by the widgets of one host page
//!
//! The embedding code creates this once, at script start, and mounts each
//! host element through it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use testimonial_feed::{DataLoader, HttpTestimonialSource, TestimonialSource};

use crate::bridge::ResizeBridge;
use crate::cache::{CacheStore, Clock, SystemClock};
use crate::controller::IsolationController;
use crate::error::{WidgetError, WidgetResult};
use crate::options::RuntimeOptions;
use crate::render::RenderEngine;
use crate::traits::{HostElement, HostPage, KeyValueStorage};

pub struct PageContext {
    options: RuntimeOptions,
    page: Arc<dyn HostPage>,
    cache: CacheStore,
    loader: DataLoader,
    engine: RenderEngine,
    bridge: OnceLock<Arc<ResizeBridge>>,
    next_instance: AtomicU64,
}

impl PageContext {
    /// 创建页面上下文
    pub fn new(
        options: RuntimeOptions,
        page: Arc<dyn HostPage>,
        storage: Arc<dyn KeyValueStorage>,
        clock: Arc<dyn Clock>,
        source: Arc<dyn TestimonialSource>,
    ) -> WidgetResult<Self> {
        options.validate()?;

        let cache = CacheStore::new(
            storage,
            clock,
            options.cache_ttl(),
            options.cache_key_prefix.clone(),
        );
        let loader = DataLoader::new(source)
            .with_retry_policy(options.retry_policy())
            .with_timeout(options.request_timeout());
        let engine = RenderEngine::new(options.version.clone());

        Ok(Self {
            options,
            page,
            cache,
            loader,
            engine,
            bridge: OnceLock::new(),
            next_instance: AtomicU64::new(1),
        })
    }

    /// Context that fetches from `options.api_endpoint` over HTTP.
    pub fn with_http(
        options: RuntimeOptions,
        page: Arc<dyn HostPage>,
        storage: Arc<dyn KeyValueStorage>,
    ) -> WidgetResult<Self> {
        let source = HttpTestimonialSource::with_timeout(&options.api_endpoint, options.request_timeout())
            .map_err(WidgetError::Feed)?;
        Self::new(options, page, storage, Arc::new(SystemClock), Arc::new(source))
    }

    pub fn options(&self) -> &RuntimeOptions {
        &self.options
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn loader(&self) -> &DataLoader {
        &self.loader
    }

    pub fn engine(&self) -> &RenderEngine {
        &self.engine
    }

    pub fn page_origin(&self) -> String {
        self.page.origin()
    }

    /// The page-wide resize bridge, installing its listener on first use.
    pub fn resize_bridge(&self) -> Arc<ResizeBridge> {
        Arc::clone(self.bridge.get_or_init(|| {
            let bridge = Arc::new(ResizeBridge::new(&self.options.trusted_origins));
            self.page.install_message_listener(Arc::clone(&bridge));
            log::debug!("[page] Resize listener installed");
            bridge
        }))
    }

    /// Whether any widget on this page has needed the bridge yet.
    pub fn bridge_installed(&self) -> bool {
        self.bridge.get().is_some()
    }

    /// Stop routing resize messages to `frame_id`.
    pub(crate) fn release_frame(&self, frame_id: &str) {
        if let Some(bridge) = self.bridge.get() {
            bridge.unregister(frame_id);
        }
    }

    pub(crate) fn next_instance_id(&self) -> u64 {
        self.next_instance.fetch_add(1, Ordering::Relaxed)
    }

    /// Mount a widget on `element` and run it until it settles.
    pub async fn mount(self: &Arc<Self>, element: Arc<dyn HostElement>) -> IsolationController {
        let mut controller = IsolationController::new(Arc::clone(self), element);
        controller.start().await;
        controller
    }
}
