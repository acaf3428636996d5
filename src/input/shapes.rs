//! Shape drafting.
//!
//! ```text
//! pinch (index+thumb only)          -> open draft at pinch midpoint
//! pinch held                        -> move draft end, redraw preview
//! pinch + middle/ring/pinky up      -> stamp
//! open palm                         -> stamp
//! pinch released, nothing confirmed -> discard
//! ```
//!
//! Drafts live in world coordinates; the preview layer is composited
//! through the viewport like the drawing layer.

use crate::constants::SHAPE_FILL_ALPHA;
use crate::engine::Engine;
use crate::engine::FrameContext;
use crate::gesture::GestureState;
use crate::input::state::{DraftState, ShapeDraft};
use crate::observe::EngineEvent;
use crate::raster;
use crate::types::{Color, Mode, Point, ShapeKind};
use image::RgbaImage;
use tracing::{debug, info};

/// Render `draft` onto `img`: outline in `color` at `line_width`, then a
/// translucent fill. Lines have no fill.
///
/// - Rectangle: the draft's bounding box
/// - Triangle: apex at top-center, base along the bottom edge
/// - Circle: centered in the box, radius half its larger side
/// - Line: start to end
pub fn draw_shape(img: &mut RgbaImage, draft: &ShapeDraft, color: Color, line_width: f32) {
    let bounds = draft.bounds();
    let fill = color.with_alpha(SHAPE_FILL_ALPHA);
    match draft.kind {
        ShapeKind::Rectangle => {
            raster::stroke_rect(img, bounds, line_width, color);
            raster::fill_rect(img, bounds, fill);
        }
        ShapeKind::Triangle => {
            let verts = [
                Point::new(bounds.center().x, bounds.y),
                Point::new(bounds.x, bounds.bottom()),
                Point::new(bounds.right(), bounds.bottom()),
            ];
            raster::stroke_polygon(img, &verts, line_width, color);
            raster::fill_polygon(img, &verts, fill);
        }
        ShapeKind::Circle => {
            let radius = bounds.w.max(bounds.h) / 2.0;
            raster::stroke_circle(img, bounds.center(), radius, line_width, color);
            raster::fill_circle(img, bounds.center(), radius, fill);
        }
        ShapeKind::Line => {
            raster::stroke_segment(img, draft.start, draft.end, line_width, color);
        }
    }
}

impl Engine {
    pub(crate) fn update_shape_draft(&mut self, g: &GestureState, ctx: &mut FrameContext) {
        if self.tools.mode() != Mode::Annotate {
            return;
        }
        let Some(kind) = self.tools.annotate_tool().shape_mode() else {
            return;
        };
        let fingers = g.fingers;
        let world = self.canvas.viewport.screen_to_world(g.pinch_point());

        if g.pinch && fingers.only_index_thumb() && !self.interaction.draft.is_drafting() {
            debug!(kind = ?kind, x = world.x, y = world.y, "Shape draft opened");
            self.interaction.draft = DraftState::Drafting(ShapeDraft::new(kind, world));
        }

        if self.interaction.draft.is_drafting() && g.pinch_grip() {
            self.interaction.draft.set_end(world);
            self.redraw_preview();
        }

        let confirmed =
            (g.pinch_grip() && fingers.any_confirm_finger()) || fingers.all_up();
        if self.interaction.draft.is_drafting() && confirmed {
            if let Some(draft) = self.interaction.draft.take() {
                self.stamp_shape(&draft);
                ctx.report.drawing_changed = true;
            }
        }

        if self.interaction.draft.is_drafting() && !g.pinch {
            debug!("Shape draft discarded");
            self.interaction.draft.take();
            self.canvas.layers.clear_preview();
        }
    }

    fn redraw_preview(&mut self) {
        let Some(draft) = self.interaction.draft.draft().copied() else {
            return;
        };
        let color = self.tools.brush_color();
        let width = self.tools.brush_size();
        self.canvas.layers.clear_preview();
        draw_shape(self.canvas.layers.preview_mut(), &draft, color, width);
    }

    fn stamp_shape(&mut self, draft: &ShapeDraft) {
        let color = self.tools.brush_color();
        let width = self.tools.brush_size();
        draw_shape(self.canvas.layers.drawing_mut(), draft, color, width);
        self.canvas.layers.clear_preview();

        let bounds = draft.bounds();
        info!(kind = ?draft.kind, x = bounds.x, y = bounds.y, w = bounds.w, h = bounds.h, "Shape stamped");
        self.system.events.push(EngineEvent::ShapeCommitted {
            kind: draft.kind,
            bounds,
        });
    }
}
