//! Cross-document resize channel
//!
//! One bridge exists per host page. Frames register under their
//! campaign-tagged id; every incoming message is checked against the origin
//! allowlist and the payload schema before any height is applied.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde::Deserialize;

use crate::render::BRIDGE_PROTOCOL_VERSION;
use crate::traits::HostElement;

/// Upper bound for a reported frame height, in pixels.
pub const MAX_FRAME_HEIGHT: u32 = 10_000;

/// A `message` event as seen by the host page.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// `event.origin`.
    pub origin: String,
    /// Id of the registered frame whose window sent the event, if the adapter
    /// could match `event.source` to one.
    pub frame_id: Option<String>,
    /// `event.data`.
    pub data: serde_json::Value,
}

/// The only payload the bridge acts on.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BridgeMessage {
    Resize {
        height: f64,
        #[serde(default)]
        version: Option<u32>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    UntrustedOrigin(String),
    MalformedPayload(String),
    UnsupportedVersion(u32),
    InvalidHeight,
    UnknownFrame(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeOutcome {
    Applied { frame_id: String, height: u32 },
    Rejected(RejectReason),
}

/// Page-wide resize dispatcher.
pub struct ResizeBridge {
    trusted_origins: Vec<String>,
    frames: RwLock<HashMap<String, Arc<dyn HostElement>>>,
}

impl ResizeBridge {
    pub fn new(trusted_origins: &[String]) -> Self {
        Self {
            trusted_origins: trusted_origins
                .iter()
                .map(|o| o.trim_end_matches('/').to_string())
                .collect(),
            frames: RwLock::default(),
        }
    }

    /// Route resize messages for `frame_id` to `element`. Re-registering an id
    /// replaces the previous element.
    pub fn register(&self, frame_id: impl Into<String>, element: Arc<dyn HostElement>) {
        self.frames
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(frame_id.into(), element);
    }

    pub fn unregister(&self, frame_id: &str) {
        self.frames
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(frame_id);
    }

    pub fn registered_frames(&self) -> usize {
        self.frames
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_trusted(&self, origin: &str) -> bool {
        self.trusted_origins.iter().any(|o| o == origin)
    }

    /// Validate `message` and, if it passes, resize the matching frame.
    pub fn handle(&self, message: &IncomingMessage) -> BridgeOutcome {
        let outcome = self.dispatch(message);
        if let BridgeOutcome::Rejected(reason) = &outcome {
            log::debug!("[bridge] Rejected message from '{}': {reason:?}", message.origin);
        }
        outcome
    }

    fn dispatch(&self, message: &IncomingMessage) -> BridgeOutcome {
        if !self.is_trusted(&message.origin) {
            return BridgeOutcome::Rejected(RejectReason::UntrustedOrigin(message.origin.clone()));
        }

        let parsed = match BridgeMessage::deserialize(&message.data) {
            Ok(parsed) => parsed,
            Err(e) => {
                return BridgeOutcome::Rejected(RejectReason::MalformedPayload(e.to_string()));
            }
        };

        let BridgeMessage::Resize { height, version } = parsed;
        if let Some(v) = version
            && v != BRIDGE_PROTOCOL_VERSION
        {
            return BridgeOutcome::Rejected(RejectReason::UnsupportedVersion(v));
        }
        let Some(height) = sanitize_height(height) else {
            return BridgeOutcome::Rejected(RejectReason::InvalidHeight);
        };

        let Some(frame_id) = message.frame_id.as_deref() else {
            return BridgeOutcome::Rejected(RejectReason::UnknownFrame(None));
        };
        let element = self
            .frames
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(frame_id)
            .cloned();
        let Some(element) = element else {
            return BridgeOutcome::Rejected(RejectReason::UnknownFrame(Some(frame_id.to_string())));
        };

        if !element.set_frame_height(frame_id, height) {
            return BridgeOutcome::Rejected(RejectReason::UnknownFrame(Some(frame_id.to_string())));
        }
        BridgeOutcome::Applied {
            frame_id: frame_id.to_string(),
            height,
        }
    }
}

fn sanitize_height(height: f64) -> Option<u32> {
    if !height.is_finite() || height < 0.0 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let px = height.ceil().min(f64::from(MAX_FRAME_HEIGHT)) as u32;
    Some(px)
}
