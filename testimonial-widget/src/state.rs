//! Per-element render lifecycle

use serde::Serialize;

/// Lifecycle of one widget instance.
///
/// ```text
/// Idle ──► Loading ──► Rendered ──┐
///   │         │                   ├──► FallenBack (terminal)
///   └─────────┴──────► Error ─────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RenderState {
    #[default]
    Idle,
    Loading,
    Rendered,
    Error,
    FallenBack,
}

/// Attempted a transition the lifecycle does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid render state transition {from:?} -> {to:?}")]
pub struct InvalidTransition {
    pub from: RenderState,
    pub to: RenderState,
}

impl RenderState {
    pub fn can_transition_to(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Idle, Self::Loading | Self::Error)
                | (Self::Loading, Self::Rendered | Self::Error)
                | (Self::Error | Self::Rendered, Self::FallenBack)
        )
    }

    pub fn transition(self, to: Self) -> Result<Self, InvalidTransition> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(InvalidTransition { from: self, to })
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Self::FallenBack
    }
}
