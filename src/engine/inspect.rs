//! Hooks for the integration tests. Hidden from the docs and not part of
//! the shell-facing surface: shells only ever see the composite and
//! flattened exports.

use super::state::{Engine, InteractionState};
use crate::input::transform::Viewport;
use image::{Rgba, RgbaImage};

impl Engine {
    #[doc(hidden)]
    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// The persistent drawing layer, world space
    #[doc(hidden)]
    pub fn drawing_pixels(&self) -> &RgbaImage {
        self.canvas.layers.drawing()
    }

    /// Overwrite one drawing-layer pixel. Out-of-bounds writes are ignored.
    #[doc(hidden)]
    pub fn paint_drawing_pixel(&mut self, x: u32, y: u32, px: Rgba<u8>) {
        let drawing = self.canvas.layers.drawing_mut();
        if x < drawing.width() && y < drawing.height() {
            drawing.put_pixel(x, y, px);
        }
    }

    /// The viewport, bypassing the zoom gestures. Scale stays clamped.
    #[doc(hidden)]
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.canvas.viewport
    }
}
