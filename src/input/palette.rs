//! Palette swatch picking (ColorSelect mode).

use crate::engine::Engine;
use crate::engine::FrameContext;
use crate::gesture::GestureState;
use crate::hover::HoverTarget;
use crate::input::coords::point_in_circle;

impl Engine {
    pub(crate) fn update_palette(&mut self, g: &GestureState, ctx: &mut FrameContext) {
        let tip = g.index_tip;
        let swatches = self.canvas.layout.swatches.clone();
        for (i, swatch) in swatches.iter().enumerate() {
            let inside = point_in_circle(tip, swatch);
            if self.hover.palette.evaluate(i, inside, g.fingers.index, ctx.now) {
                ctx.fired(self, HoverTarget::Swatch(i));
                if let Some(color) = self.system.settings.palette.get(i).copied() {
                    self.pick_palette_color(color);
                }
            }
        }
    }
}
