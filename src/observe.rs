//! Read-only view of engine state for a UI shell.
//!
//! The engine is the single source of truth; the shell reads a
//! [`ShellState`] snapshot and drains [`EngineEvent`]s to learn about
//! changes it should react to.

use crate::hover::{HoverProgress, HoverTarget};
use crate::types::{AnnotateTool, Color, Mode, Point, Rect, ShapeKind, ZoomMode};
use serde::Serialize;

/// Tracker readiness.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub enum Readiness {
    #[default]
    Pending,
    Ready,
    /// Tracker failed to start; the engine will not draw
    Failed(String),
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready)
    }
}

/// Snapshot of everything a shell needs to render its chrome.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShellState {
    pub mode: Mode,
    pub zoom_mode: ZoomMode,
    pub annotate_tool: AnnotateTool,
    pub brush_color: Color,
    pub brush_size: f32,
    pub hand_visible: bool,
    pub hover: Vec<HoverProgress>,
    pub save_in_progress: bool,
    pub readiness: Readiness,
}

/// Outcome of an export request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SaveOutcome {
    pub ticket: String,
    pub name: String,
    pub result: Result<(), String>,
}

/// Change notifications, in the order they happened.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum EngineEvent {
    ModeChanged(Mode),
    ZoomModeChanged(ZoomMode),
    AnnotateToolChanged(AnnotateTool),
    BrushColorChanged(Color),
    HandVisibilityChanged(bool),
    HoverFired(HoverTarget),
    /// Draft stamped onto the drawing layer; `bounds` in world space
    ShapeCommitted { kind: ShapeKind, bounds: Rect },
    SelectionLifted { bounds: Rect },
    /// Floating pixels written back with their top-left at `origin`
    SelectionCommitted { origin: Point },
    TrackerReady,
    /// Reported once; the engine stays unable to draw
    TrackerFailed(String),
    BackgroundLoaded,
    BackgroundFallback(String),
    SaveStarted { ticket: String },
    SaveFinished(SaveOutcome),
    SettingsReloaded,
}
