//! Engine state - the Engine struct definition and sub-structs.

use crate::background::BackgroundExecutor;
use crate::gesture::{GestureClassifier, GestureState};
use crate::hover::{HoverGroup, HoverProgress, HoverTarget};
use crate::input::coords::point_in_rect;
use crate::input::state::{CameraDrag, DraftState, PanState, SelectionState, StrokeState};
use crate::input::transform::Viewport;
use crate::layers::LayerStore;
use crate::layout::Layout;
use crate::mode::ToolState;
use crate::observe::{EngineEvent, Readiness, SaveOutcome};
use crate::perf::PerfMonitor;
use crate::settings::{EngineSettings, SettingsWatcher};
use crate::types::{Mode, Point, Rect, ShapeKind, ZoomMode};
use image::RgbaImage;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// The gesture interaction engine.
///
/// One instance per canvas. Every mutation happens inside
/// [`process_frame`](Engine::process_frame) or an explicit setter, on the
/// caller's thread.
pub struct Engine {
    pub(crate) canvas: CanvasState,
    pub(crate) interaction: InteractionState,
    pub tools: ToolState,
    pub overlay: CameraOverlay,
    pub hover: HoverState,
    pub system: SystemState,
}

// =============================================================================
// Sub-structs
// =============================================================================

/// Raster layers and the transform they are viewed through. Never handed
/// out; only the composite and flattened exports leave the engine.
pub(crate) struct CanvasState {
    pub viewport: Viewport,
    pub layers: LayerStore,
    /// Hit regions of the UI affordances
    pub layout: Layout,
    pub width: u32,
    pub height: u32,
}

/// Continuous-gesture state machines
#[derive(Debug, Default)]
pub struct InteractionState {
    pub stroke: StrokeState,
    pub draft: DraftState,
    pub selection: SelectionState,
    pub pan: PanState,
    pub camera_drag: CameraDrag,
}

/// Picture-in-picture camera preview, in screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraOverlay {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CameraOverlay {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn contains(&self, p: Point) -> bool {
        point_in_rect(p, &self.rect())
    }

    /// Move to `(x, y)`, kept fully inside a `canvas_w` x `canvas_h` canvas.
    pub fn move_to(&mut self, x: f32, y: f32, canvas_w: f32, canvas_h: f32) {
        let max_x = (canvas_w - self.width).max(0.0);
        let max_y = (canvas_h - self.height).max(0.0);
        self.x = x.min(max_x).max(0.0);
        self.y = y.min(max_y).max(0.0);
    }
}

/// Dwell timers, one group per set of mutually exclusive buttons
#[derive(Debug, Clone)]
pub struct HoverState {
    pub toolbar: HoverGroup<Mode>,
    pub zoom: HoverGroup<ZoomMode>,
    pub shapes: HoverGroup<ShapeKind>,
    pub erase: HoverGroup<()>,
    pub selection: HoverGroup<()>,
    pub palette: HoverGroup<usize>,
}

impl HoverState {
    pub fn new(dwell: Duration) -> Self {
        Self {
            toolbar: HoverGroup::new(dwell),
            zoom: HoverGroup::new(dwell),
            shapes: HoverGroup::new(dwell),
            erase: HoverGroup::new(dwell),
            selection: HoverGroup::new(dwell),
            palette: HoverGroup::new(dwell),
        }
    }

    pub fn set_dwell(&mut self, dwell: Duration) {
        self.toolbar.set_dwell(dwell);
        self.zoom.set_dwell(dwell);
        self.shapes.set_dwell(dwell);
        self.erase.set_dwell(dwell);
        self.selection.set_dwell(dwell);
        self.palette.set_dwell(dwell);
    }

    pub fn pause(&mut self, now: Instant) {
        self.toolbar.pause(now);
        self.zoom.pause(now);
        self.shapes.pause(now);
        self.erase.pause(now);
        self.selection.pause(now);
        self.palette.pause(now);
    }

    pub fn resume(&mut self, now: Instant) {
        self.toolbar.resume(now);
        self.zoom.resume(now);
        self.shapes.resume(now);
        self.erase.resume(now);
        self.selection.resume(now);
        self.palette.resume(now);
    }

    pub fn clear(&mut self) {
        self.toolbar.clear();
        self.zoom.clear();
        self.shapes.clear();
        self.erase.clear();
        self.selection.clear();
        self.palette.clear();
    }

    /// Progress of every running timer, in layout order.
    pub fn progress(&self, now: Instant) -> Vec<HoverProgress> {
        let mut out = Vec::new();
        let mut push = |target: HoverTarget, fraction: Option<f32>| {
            if let Some(fraction) = fraction {
                out.push(HoverProgress { target, fraction });
            }
        };
        for mode in Mode::ALL {
            push(HoverTarget::Toolbar(mode), self.toolbar.progress(mode, now));
        }
        for zoom in ZoomMode::ALL {
            push(HoverTarget::Zoom(zoom), self.zoom.progress(zoom, now));
        }
        for kind in ShapeKind::ALL {
            push(HoverTarget::Shape(kind), self.shapes.progress(kind, now));
        }
        push(HoverTarget::Erase, self.erase.progress((), now));
        push(HoverTarget::Selection, self.selection.progress((), now));

        let mut swatches = self.palette.running(now);
        swatches.sort_by_key(|(i, _)| *i);
        for (i, fraction) in swatches {
            push(HoverTarget::Swatch(i), Some(fraction));
        }
        out
    }
}

/// Engine-wide services and bookkeeping
pub struct SystemState {
    pub settings: EngineSettings,
    pub classifier: GestureClassifier,
    /// Performance monitor
    pub perf: PerfMonitor,
    /// Runs export encoding and the storage call off the frame loop
    pub background: BackgroundExecutor,
    pub readiness: Readiness,
    /// Pending change notifications for the shell
    pub events: Vec<EngineEvent>,
    /// Ticket of the save currently in flight
    pub save_ticket: Option<String>,
    /// Filled by the background save task, drained on the next frame
    pub save_slot: Arc<Mutex<Option<SaveOutcome>>>,
    /// Settings file watcher for hot-reload
    pub settings_watcher: Option<SettingsWatcher>,
    pub hand_visible: bool,
    /// Gesture from the latest frame with a hand
    pub last_gesture: Option<GestureState>,
    /// Latest camera image, shown in the overlay
    pub video_frame: Option<RgbaImage>,
    /// Clock sample of the latest processed frame
    pub last_frame_at: Option<Instant>,
}
