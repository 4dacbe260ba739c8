//! 宿主页面抽象 Trait

use std::collections::HashMap;
use std::sync::Arc;

use crate::bridge::ResizeBridge;
use crate::render::Markup;

/// Anything that can answer attribute lookups.
pub trait AttributeSource {
    fn attribute(&self, name: &str) -> Option<String>;
}

impl AttributeSource for HashMap<String, String> {
    fn attribute(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Result of probing for an isolated rendering context.
pub enum IsolationSupport {
    /// The host element now owns an isolated subtree.
    Supported(Arc<dyn IsolatedRoot>),
    /// The primitive is missing or refused; carries a short reason for logs.
    Unsupported(String),
}

/// A style-isolated subtree attached to a host element (a shadow root in browsers).
pub trait IsolatedRoot: Send + Sync {
    /// Replace the subtree's content with `markup`.
    fn replace_content(&self, markup: &Markup) -> Result<(), String>;

    /// Remove all content rendered into the subtree.
    fn teardown(&self);
}

/// Iframe to mount in place of the isolated render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSpec {
    /// Page-unique, campaign-tagged element id.
    pub id: String,
    /// Fully built frame URL.
    pub src: String,
    /// Accessible title.
    pub title: String,
    /// Height before the first resize message arrives, in pixels.
    pub initial_height: u32,
}

/// The element a merchant placed on their page.
pub trait HostElement: AttributeSource + Send + Sync {
    /// Capability-checked acquisition of an isolated subtree.
    ///
    /// Implementations must not panic; a throwing platform call maps to
    /// [`IsolationSupport::Unsupported`].
    fn attach_isolated_root(&self) -> IsolationSupport;

    /// Replace the element's children with an iframe built from `frame`.
    fn mount_frame(&self, frame: &FrameSpec) -> Result<(), String>;

    /// Set the height of a previously mounted frame. Returns `false` if the
    /// element holds no frame with that id.
    fn set_frame_height(&self, frame_id: &str, height: u32) -> bool;

    /// Plain-text message written without isolation, used only when nothing
    /// else can be rendered.
    fn show_notice(&self, text: &str);
}

/// The page hosting one or more widgets.
pub trait HostPage: Send + Sync {
    /// Origin of the host page, e.g. `https://shop.example`.
    fn origin(&self) -> String;

    /// Register the page-wide message listener. Called at most once per page.
    fn install_message_listener(&self, bridge: Arc<ResizeBridge>);
}
