//! Zoom mode: sub-mode buttons, continuous zoom and pan.
//!
//! While the pinch grip is held outside the camera overlay, ZoomIn and
//! ZoomOut scale the view by a fixed factor every frame; Move pans by the
//! frame-to-frame motion of the pinch midpoint.

use crate::engine::Engine;
use crate::engine::FrameContext;
use crate::gesture::GestureState;
use crate::hover::HoverTarget;
use crate::input::coords::point_in_rect;
use crate::input::state::PanState;
use crate::types::ZoomMode;
use tracing::trace;

impl Engine {
    pub(crate) fn update_zoom(&mut self, g: &GestureState, ctx: &mut FrameContext) {
        let tip = g.index_tip;
        let buttons = self.canvas.layout.zoom.clone();
        for (zoom, rect) in buttons {
            let inside = point_in_rect(tip, &rect) && !ctx.in_camera;
            if self.hover.zoom.evaluate(zoom, inside, g.fingers.index, ctx.now) {
                ctx.fired(self, HoverTarget::Zoom(zoom));
                self.switch_zoom_mode(zoom);
            }
        }

        let grip = g.pinch_grip() && !ctx.in_camera;
        let step = self.system.settings.zoom_step;
        match self.tools.zoom_mode() {
            ZoomMode::ZoomIn if grip => {
                self.canvas.viewport.zoom_in(step);
                self.interaction.pan.reset();
                trace!(scale = self.canvas.viewport.scale(), "Zoom in");
            }
            ZoomMode::ZoomOut if grip => {
                self.canvas.viewport.zoom_out(step);
                self.interaction.pan.reset();
                trace!(scale = self.canvas.viewport.scale(), "Zoom out");
            }
            ZoomMode::Move if grip => {
                let at = g.pinch_point();
                if let PanState::Panning { last } = self.interaction.pan {
                    self.canvas.viewport.pan(at.x - last.x, at.y - last.y);
                }
                self.interaction.pan = PanState::Panning { last: at };
            }
            _ => self.interaction.pan.reset(),
        }
    }
}
