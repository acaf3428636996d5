//! Mode and tool state machine.
//!
//! ```text
//! Idle | Brush | Zoom | ColorSelect | Annotate     (toolbar dwell)
//! ColorSelect -> Brush                            (swatch dwell, sets color)
//! Annotate:  None | Shape(kind) | Selection | Eraser
//! Zoom:      ZoomIn | ZoomOut | Move
//! ```
//!
//! Leaving Annotate drops the eraser. Re-selecting the current mode is a
//! no-op. There is no "back" transition.

use crate::constants::{MAX_BRUSH_SIZE, MIN_BRUSH_SIZE};
use crate::types::{AnnotateTool, Color, Mode, ShapeKind, ZoomMode};
use tracing::info;

#[derive(Clone, Debug, PartialEq)]
pub struct ToolState {
    mode: Mode,
    zoom_mode: ZoomMode,
    annotate: AnnotateTool,
    brush_color: Color,
    brush_size: f32,
}

impl ToolState {
    pub fn new(brush_color: Color, brush_size: f32) -> Self {
        Self {
            mode: Mode::default(),
            zoom_mode: ZoomMode::default(),
            annotate: AnnotateTool::default(),
            brush_color,
            brush_size: brush_size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn zoom_mode(&self) -> ZoomMode {
        self.zoom_mode
    }

    pub fn annotate_tool(&self) -> AnnotateTool {
        self.annotate
    }

    pub fn brush_color(&self) -> Color {
        self.brush_color
    }

    pub fn brush_size(&self) -> f32 {
        self.brush_size
    }

    /// Switch top-level mode. Returns false when already in `mode`.
    pub fn set_mode(&mut self, mode: Mode) -> bool {
        if self.mode == mode {
            return false;
        }
        if mode != Mode::Annotate && self.annotate.eraser_active() {
            self.annotate = AnnotateTool::None;
        }
        info!(from = self.mode.label(), to = mode.label(), "Mode changed");
        self.mode = mode;
        true
    }

    pub fn set_zoom_mode(&mut self, zoom: ZoomMode) -> bool {
        if self.zoom_mode == zoom {
            return false;
        }
        info!(zoom_mode = ?zoom, "Zoom sub-mode changed");
        self.zoom_mode = zoom;
        true
    }

    /// Make `tool` the single active Annotate tool, replacing any other.
    pub fn set_annotate_tool(&mut self, tool: AnnotateTool) -> bool {
        if self.annotate == tool {
            return false;
        }
        info!(tool = ?tool, "Annotate tool changed");
        self.annotate = tool;
        true
    }

    pub fn activate_shape(&mut self, kind: ShapeKind) -> bool {
        self.set_annotate_tool(AnnotateTool::Shape(kind))
    }

    pub fn activate_selection(&mut self) -> bool {
        self.set_annotate_tool(AnnotateTool::Selection)
    }

    pub fn activate_eraser(&mut self) -> bool {
        self.set_annotate_tool(AnnotateTool::Eraser)
    }

    pub fn set_brush_color(&mut self, color: Color) {
        self.brush_color = color;
    }

    /// Clamped to the supported diameter range.
    pub fn set_brush_size(&mut self, size: f32) -> f32 {
        self.brush_size = if size.is_finite() {
            size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE)
        } else {
            self.brush_size
        };
        self.brush_size
    }
}
