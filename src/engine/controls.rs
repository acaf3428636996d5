//! Mode and tool changes, from hover firings or explicit shell setters.
//!
//! Both paths go through the same helpers so the shell sees identical
//! events either way, and so leaving a tool always cleans up after it.

use super::state::Engine;
use crate::observe::EngineEvent;
use crate::types::{AnnotateTool, Color, Mode, ZoomMode};
use tracing::debug;

impl Engine {
    pub fn mode(&self) -> Mode {
        self.tools.mode()
    }

    pub fn zoom_mode(&self) -> ZoomMode {
        self.tools.zoom_mode()
    }

    pub fn annotate_tool(&self) -> AnnotateTool {
        self.tools.annotate_tool()
    }

    pub fn brush_color(&self) -> Color {
        self.tools.brush_color()
    }

    pub fn brush_size(&self) -> f32 {
        self.tools.brush_size()
    }

    /// Switch mode without a gesture. Re-selecting the current mode does nothing.
    pub fn override_mode(&mut self, mode: Mode) -> bool {
        self.switch_mode(mode)
    }

    pub fn set_zoom_mode(&mut self, zoom: ZoomMode) -> bool {
        self.switch_zoom_mode(zoom)
    }

    pub fn set_annotate_tool(&mut self, tool: AnnotateTool) -> bool {
        self.switch_annotate_tool(tool)
    }

    pub fn set_brush_color(&mut self, color: Color) {
        if self.tools.brush_color() != color {
            self.tools.set_brush_color(color);
            self.system.events.push(EngineEvent::BrushColorChanged(color));
        }
    }

    /// Clamped to 1..=50. Returns the size actually applied.
    pub fn set_brush_size(&mut self, size: f32) -> f32 {
        self.tools.set_brush_size(size)
    }

    pub(crate) fn switch_mode(&mut self, mode: Mode) -> bool {
        let tool_before = self.tools.annotate_tool();
        if !self.tools.set_mode(mode) {
            return false;
        }
        self.system.events.push(EngineEvent::ModeChanged(mode));
        let tool_after = self.tools.annotate_tool();
        if tool_after != tool_before {
            self.system.events.push(EngineEvent::AnnotateToolChanged(tool_after));
        }
        self.settle_interactions();
        true
    }

    pub(crate) fn switch_zoom_mode(&mut self, zoom: ZoomMode) -> bool {
        if !self.tools.set_zoom_mode(zoom) {
            return false;
        }
        self.interaction.pan.reset();
        self.system.events.push(EngineEvent::ZoomModeChanged(zoom));
        true
    }

    pub(crate) fn switch_annotate_tool(&mut self, tool: AnnotateTool) -> bool {
        if !self.tools.set_annotate_tool(tool) {
            return false;
        }
        self.system.events.push(EngineEvent::AnnotateToolChanged(tool));
        self.settle_interactions();
        true
    }

    /// Swatch pick: install the color and return to Brush.
    pub(crate) fn pick_palette_color(&mut self, color: Color) {
        self.set_brush_color(color);
        self.switch_mode(Mode::Brush);
    }

    /// End interactions whose tool is no longer active.
    fn settle_interactions(&mut self) {
        let mode = self.tools.mode();
        let tool = self.tools.annotate_tool();

        if mode != Mode::Brush {
            self.interaction.stroke.reset();
        }
        if mode != Mode::Zoom {
            self.interaction.pan.reset();
        }
        let drafting_allowed = mode == Mode::Annotate && tool.shape_mode().is_some();
        if !drafting_allowed && self.interaction.draft.take().is_some() {
            debug!("Discarding shape draft after tool change");
            self.canvas.layers.clear_preview();
        }
        let selecting_allowed = mode == Mode::Annotate && tool.selection_active();
        if !selecting_allowed {
            self.commit_floating_selection();
            self.interaction.selection.reset();
        }
    }
}
