//! 测试辅助模块
//!
//! In-memory host page, host element, clock and testimonial source.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use testimonial_feed::{FeedError, Testimonial, TestimonialQuery, TestimonialSource};

use crate::bridge::{BridgeOutcome, IncomingMessage, ResizeBridge};
use crate::cache::Clock;
use crate::options::RuntimeOptions;
use crate::page::PageContext;
use crate::render::Markup;
use crate::traits::{
    AttributeSource, FrameSpec, HostElement, HostPage, InMemoryStorage, IsolatedRoot,
    IsolationSupport,
};

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ===== Fixtures =====

pub fn sample_testimonials() -> Vec<Testimonial> {
    vec![
        Testimonial {
            name: "Ada".to_string(),
            body: "Set up in five minutes and our conversion went up.".to_string(),
            rating: Some(5),
            created_at: Utc.with_ymd_and_hms(2026, 3, 3, 9, 30, 0).single(),
        },
        Testimonial {
            name: "Bo".to_string(),
            body: "Solid, though the dark theme could use more contrast.".to_string(),
            rating: Some(3),
            created_at: None,
        },
    ]
}

// ===== ManualClock =====

pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(
                Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0)
                    .single()
                    .unwrap_or_default(),
            ),
        }
    }

    pub fn advance(&self, by: Duration) {
        let by = chrono::Duration::from_std(by).expect("duration fits chrono");
        *lock(&self.now) += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *lock(&self.now)
    }
}

// ===== ScriptedSource =====

/// Replays scripted results in order; the last one repeats forever.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<Vec<Testimonial>, FeedError>>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<Vec<Testimonial>, FeedError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TestimonialSource for ScriptedSource {
    fn id(&self) -> &'static str {
        "scripted"
    }

    async fn fetch(&self, _query: &TestimonialQuery) -> testimonial_feed::Result<Vec<Testimonial>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut script = lock(&self.script);
        if script.len() > 1 {
            script.pop_front().expect("non-empty script")
        } else {
            script.front().cloned().expect("script must not be empty")
        }
    }
}

// ===== MockIsolatedRoot =====

#[derive(Default)]
pub struct MockIsolatedRoot {
    content: Mutex<Option<String>>,
    torn_down: AtomicBool,
    fail_writes: bool,
}

impl IsolatedRoot for MockIsolatedRoot {
    fn replace_content(&self, markup: &Markup) -> Result<(), String> {
        if self.fail_writes {
            return Err("root detached from document".to_string());
        }
        *lock(&self.content) = Some(markup.as_str().to_string());
        Ok(())
    }

    fn teardown(&self) {
        *lock(&self.content) = None;
        self.torn_down.store(true, Ordering::SeqCst);
    }
}

// ===== MockHostElement =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsolationBehavior {
    Supported,
    Unsupported,
    /// Acquisition succeeds but every write fails.
    FailingWrites,
}

/// Observable state of a mock element, comparable across calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomSnapshot {
    pub isolated_html: Option<String>,
    pub root_torn_down: bool,
    pub frames: Vec<(FrameSpec, u32)>,
    pub notices: Vec<String>,
}

pub struct MockHostElement {
    attributes: HashMap<String, String>,
    behavior: IsolationBehavior,
    root: Mutex<Option<Arc<MockIsolatedRoot>>>,
    frames: Mutex<Vec<(FrameSpec, u32)>>,
    notices: Mutex<Vec<String>>,
    mount_calls: AtomicUsize,
}

impl MockHostElement {
    pub fn new(attributes: &[(&str, &str)]) -> Self {
        Self {
            attributes: attributes
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            behavior: IsolationBehavior::Supported,
            root: Mutex::new(None),
            frames: Mutex::new(Vec::new()),
            notices: Mutex::new(Vec::new()),
            mount_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_isolation(mut self, behavior: IsolationBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn isolated_html(&self) -> Option<String> {
        lock(&self.root)
            .as_ref()
            .and_then(|root| lock(&root.content).clone())
    }

    pub fn root_torn_down(&self) -> bool {
        lock(&self.root)
            .as_ref()
            .is_some_and(|root| root.torn_down.load(Ordering::SeqCst))
    }

    pub fn frames(&self) -> Vec<(FrameSpec, u32)> {
        lock(&self.frames).clone()
    }

    pub fn frame_height(&self, frame_id: &str) -> Option<u32> {
        lock(&self.frames)
            .iter()
            .find(|(spec, _)| spec.id == frame_id)
            .map(|(_, height)| *height)
    }

    pub fn notices(&self) -> Vec<String> {
        lock(&self.notices).clone()
    }

    pub fn mount_calls(&self) -> usize {
        self.mount_calls.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> DomSnapshot {
        DomSnapshot {
            isolated_html: self.isolated_html(),
            root_torn_down: self.root_torn_down(),
            frames: self.frames(),
            notices: self.notices(),
        }
    }
}

impl AttributeSource for MockHostElement {
    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }
}

impl HostElement for MockHostElement {
    fn attach_isolated_root(&self) -> IsolationSupport {
        if self.behavior == IsolationBehavior::Unsupported {
            return IsolationSupport::Unsupported("attachShadow is not available".to_string());
        }
        let root = Arc::new(MockIsolatedRoot {
            fail_writes: self.behavior == IsolationBehavior::FailingWrites,
            ..MockIsolatedRoot::default()
        });
        *lock(&self.root) = Some(Arc::clone(&root));
        IsolationSupport::Supported(root)
    }

    fn mount_frame(&self, frame: &FrameSpec) -> Result<(), String> {
        self.mount_calls.fetch_add(1, Ordering::SeqCst);
        *lock(&self.frames) = vec![(frame.clone(), frame.initial_height)];
        Ok(())
    }

    fn set_frame_height(&self, frame_id: &str, height: u32) -> bool {
        let mut frames = lock(&self.frames);
        match frames.iter_mut().find(|(spec, _)| spec.id == frame_id) {
            Some((_, current)) => {
                *current = height;
                true
            }
            None => false,
        }
    }

    fn show_notice(&self, text: &str) {
        lock(&self.notices).push(text.to_string());
    }
}

// ===== MockPage =====

pub struct MockPage {
    origin: String,
    listener: Mutex<Option<Arc<ResizeBridge>>>,
    installs: AtomicUsize,
}

impl MockPage {
    pub fn new(origin: &str) -> Self {
        Self {
            origin: origin.to_string(),
            listener: Mutex::new(None),
            installs: AtomicUsize::new(0),
        }
    }

    pub fn listener_installs(&self) -> usize {
        self.installs.load(Ordering::SeqCst)
    }

    /// Deliver a `message` event to the installed listener, if any.
    pub fn post(
        &self,
        origin: &str,
        frame_id: Option<&str>,
        data: serde_json::Value,
    ) -> Option<BridgeOutcome> {
        let bridge = lock(&self.listener).clone()?;
        Some(bridge.handle(&IncomingMessage {
            origin: origin.to_string(),
            frame_id: frame_id.map(str::to_string),
            data,
        }))
    }
}

impl HostPage for MockPage {
    fn origin(&self) -> String {
        self.origin.clone()
    }

    fn install_message_listener(&self, bridge: Arc<ResizeBridge>) {
        self.installs.fetch_add(1, Ordering::SeqCst);
        *lock(&self.listener) = Some(bridge);
    }
}

// ===== Harness =====

/// A page context wired to in-memory collaborators.
pub struct Harness {
    pub ctx: Arc<PageContext>,
    pub page: Arc<MockPage>,
    pub storage: Arc<InMemoryStorage>,
    pub clock: Arc<ManualClock>,
    pub source: Arc<ScriptedSource>,
}

impl Harness {
    pub fn new(script: Vec<Result<Vec<Testimonial>, FeedError>>) -> Self {
        Self::with_options(RuntimeOptions::default(), script)
    }

    pub fn with_options(
        options: RuntimeOptions,
        script: Vec<Result<Vec<Testimonial>, FeedError>>,
    ) -> Self {
        let page = Arc::new(MockPage::new("https://shop.example"));
        let storage = Arc::new(InMemoryStorage::new());
        let clock = Arc::new(ManualClock::new());
        let source = Arc::new(ScriptedSource::new(script));
        let ctx = PageContext::new(
            options,
            page.clone(),
            storage.clone(),
            clock.clone(),
            source.clone(),
        )
        .expect("valid options");

        Self {
            ctx: Arc::new(ctx),
            page,
            storage,
            clock,
            source,
        }
    }
}
