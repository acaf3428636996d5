//! Brush strokes.
//!
//! A pinch with only index and thumb extended paints at the pinch midpoint.
//! Consecutive stamps in one stroke are joined by a round-capped segment so
//! fast hand movement at video frame rate leaves no gaps.

use crate::engine::Engine;
use crate::engine::FrameContext;
use crate::gesture::GestureState;
use crate::input::state::StrokeState;
use crate::raster;
use crate::types::{Mode, Point};
use tracing::{debug, trace};

impl Engine {
    pub(crate) fn update_brush(&mut self, g: &GestureState, ctx: &mut FrameContext) {
        if self.tools.mode() != Mode::Brush || ctx.in_camera {
            self.interaction.stroke.reset();
            return;
        }

        if g.pinch && g.fingers.only_index_thumb() {
            let world = self.canvas.viewport.screen_to_world(g.pinch_point());
            self.stamp_brush(world);
            ctx.report.drawing_changed = true;
        } else if self.interaction.stroke.is_drawing() {
            debug!("Stroke ended");
            self.interaction.stroke.reset();
        }

        if g.fingers.all_up() {
            self.palm_erase(g, ctx);
        }
    }

    /// Stamp one brush dab at `world`, joined to the previous dab.
    fn stamp_brush(&mut self, world: Point) {
        let color = self.tools.brush_color();
        let size = self.tools.brush_size();
        let drawing = self.canvas.layers.drawing_mut();

        raster::fill_circle(drawing, world, size / 2.0, color);
        if let Some(last) = self.interaction.stroke.last_point() {
            raster::stroke_segment(drawing, last, world, size, color);
        } else {
            trace!(x = world.x, y = world.y, "Stroke started");
        }
        self.interaction.stroke = StrokeState::Drawing { last: world };
    }
}
