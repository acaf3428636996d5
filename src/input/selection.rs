//! Marquee selection, lift, drag and commit.
//!
//! ```text
//! pinky alone            -> drag marquee (not while a block floats)
//! pinky no longer alone  -> close marquee; lift pixels if large enough
//! pinky + index          -> re-center floating block under index tip
//! anything else          -> write floating block back, end float
//! ```

use crate::engine::Engine;
use crate::engine::FrameContext;
use crate::gesture::GestureState;
use crate::input::state::SelectionState;
use crate::observe::EngineEvent;
use crate::raster;
use crate::types::{Mode, Point, Rect};
use tracing::{debug, info};

impl Engine {
    pub(crate) fn update_selection(&mut self, g: &GestureState, ctx: &mut FrameContext) {
        if self.tools.mode() != Mode::Annotate || !self.tools.annotate_tool().selection_active() {
            return;
        }
        let fingers = g.fingers;
        let viewport = self.canvas.viewport;

        if fingers.pinky_alone() && !self.interaction.selection.is_floating() {
            let pinky = viewport.screen_to_world(g.pinky_tip);
            if self.interaction.selection.is_marquee() {
                self.interaction.selection.set_marquee_end(pinky);
            } else {
                debug!(x = pinky.x, y = pinky.y, "Marquee started");
                self.interaction.selection.start_marquee(pinky);
            }
        }

        if self.interaction.selection.is_marquee() && !fingers.pinky_alone() {
            if let Some(bounds) = self.interaction.selection.bounds() {
                self.close_marquee(bounds, ctx);
            }
        }

        let dragging = fingers.pinky_and_index();
        if dragging {
            let index = viewport.screen_to_world(g.index_tip);
            if let SelectionState::Floating { pixels, origin } = &mut self.interaction.selection {
                *origin = Point::new(
                    index.x - pixels.width() as f32 / 2.0,
                    index.y - pixels.height() as f32 / 2.0,
                );
            }
        } else if self.interaction.selection.is_floating() {
            self.commit_floating_selection();
            ctx.report.drawing_changed = true;
        }
    }

    /// Lift the marquee contents into a floating block, or drop a marquee
    /// that is too small.
    fn close_marquee(&mut self, bounds: Rect, ctx: &mut FrameContext) {
        let min = self.system.settings.min_selection_size;
        if bounds.w <= min || bounds.h <= min {
            debug!(w = bounds.w, h = bounds.h, "Marquee too small, dropped");
            self.interaction.selection.reset();
            return;
        }

        let drawing = self.canvas.layers.drawing_mut();
        let pixels = raster::copy_region(drawing, bounds);
        raster::clear_region(drawing, bounds);
        let (x, y, _, _) = raster::pixel_rect(bounds);
        self.interaction.selection = SelectionState::Floating {
            pixels,
            origin: Point::new(x as f32, y as f32),
        };
        ctx.report.drawing_changed = true;

        info!(x = bounds.x, y = bounds.y, w = bounds.w, h = bounds.h, "Selection lifted");
        self.system.events.push(EngineEvent::SelectionLifted { bounds });
    }

    /// Write a floating block back into the drawing layer. No-op when
    /// nothing floats.
    pub(crate) fn commit_floating_selection(&mut self) {
        let selection = std::mem::take(&mut self.interaction.selection);
        match selection {
            SelectionState::Floating { pixels, origin } => {
                raster::put_region(self.canvas.layers.drawing_mut(), &pixels, origin);
                info!(x = origin.x, y = origin.y, "Selection committed");
                self.system.events.push(EngineEvent::SelectionCommitted { origin });
            }
            other => self.interaction.selection = other,
        }
    }
}
