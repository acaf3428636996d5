//! Palm eraser.
//!
//! An open palm clears a disc of the drawing layer around the palm center.
//! The radius is fixed on screen, so it shrinks in world space as the view
//! zooms in. The cursor ring is drawn on the composite only.

use crate::engine::Engine;
use crate::engine::FrameContext;
use crate::gesture::GestureState;
use crate::input::coords::CoordinateConverter;
use crate::raster;
use crate::types::Mode;
use tracing::trace;

impl Engine {
    /// Annotate-mode eraser tool.
    pub(crate) fn update_annotate_eraser(&mut self, g: &GestureState, ctx: &mut FrameContext) {
        let active = self.tools.mode() == Mode::Annotate && self.tools.annotate_tool().eraser_active();
        if active && g.fingers.all_up() && !ctx.in_camera {
            self.palm_erase(g, ctx);
        }
    }

    pub(crate) fn palm_erase(&mut self, g: &GestureState, ctx: &mut FrameContext) {
        let viewport = self.canvas.viewport;
        let center = viewport.screen_to_world(g.palm_center);
        let radius =
            CoordinateConverter::length_screen_to_world(self.system.settings.eraser_radius, &viewport);
        trace!(x = center.x, y = center.y, radius, "Palm erase");

        raster::erase_circle(self.canvas.layers.drawing_mut(), center, radius);
        ctx.eraser_cursor = Some(g.palm_center);
        ctx.report.drawing_changed = true;
    }
}
