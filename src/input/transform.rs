//! Viewport transform - pan offset and clamped zoom scale.

use crate::constants::{DEFAULT_SCALE, MAX_SCALE, MIN_SCALE};
use crate::engine::Engine;
use crate::input::coords::CoordinateConverter;
use crate::types::Point;
use tracing::debug;

/// Pan/zoom state mapping world space onto the screen.
///
/// `screen = world * scale + offset`. The scale never leaves
/// `[min_scale, max_scale]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    scale: f32,
    offset: Point,
    min_scale: f32,
    max_scale: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::with_range(MIN_SCALE, MAX_SCALE)
    }
}

impl Viewport {
    pub fn with_range(min_scale: f32, max_scale: f32) -> Self {
        Self {
            scale: DEFAULT_SCALE.clamp(min_scale, max_scale),
            offset: Point::default(),
            min_scale,
            max_scale,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn scale_range(&self) -> (f32, f32) {
        (self.min_scale, self.max_scale)
    }

    /// Change the allowed range, re-clamping the current scale.
    pub fn set_scale_range(&mut self, min_scale: f32, max_scale: f32) {
        self.min_scale = min_scale;
        self.max_scale = max_scale;
        self.scale = self.scale.clamp(min_scale, max_scale);
    }

    /// Multiply the scale by `step`, clamped to the max.
    pub fn zoom_in(&mut self, step: f32) {
        self.scale = (self.scale * step).min(self.max_scale);
    }

    /// Divide the scale by `step`, clamped to the min.
    pub fn zoom_out(&mut self, step: f32) {
        self.scale = (self.scale / step).max(self.min_scale);
    }

    /// Translate by a screen-space delta
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.offset = self.offset.offset(dx, dy);
    }

    pub fn reset(&mut self) {
        self.scale = DEFAULT_SCALE.clamp(self.min_scale, self.max_scale);
        self.offset = Point::default();
    }

    #[inline]
    pub fn screen_to_world(&self, p: Point) -> Point {
        CoordinateConverter::screen_to_world(p, self)
    }

    #[inline]
    pub fn world_to_screen(&self, p: Point) -> Point {
        CoordinateConverter::world_to_screen(p, self)
    }
}

impl Engine {
    /// Current viewport transform
    pub fn viewport(&self) -> &Viewport {
        &self.canvas.viewport
    }

    /// Convert a screen position to world (canvas content) coordinates.
    pub fn screen_to_world(&self, p: Point) -> Point {
        self.canvas.viewport.screen_to_world(p)
    }

    /// Return to identity scale and zero offset.
    pub fn reset_viewport(&mut self) {
        self.canvas.viewport.reset();
        self.interaction.pan.reset();
        debug!("Viewport reset");
    }
}
