//! Geometry and hit-testing helpers shared by the gesture interpreters.
//!
//! Everything here is a pure function of its arguments. Screen space is the
//! canvas pixel grid (origin top-left, y down); world space is canvas content
//! as seen through the pan/zoom [`Viewport`](super::transform::Viewport).

use crate::gesture::Landmark;
use crate::input::transform::Viewport;
use crate::types::{Circle, Point, Rect};

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Point, b: Point) -> f32 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// A finger is extended when its tip sits above its proximal joint.
///
/// Only the two landmarks' y-coordinates are consulted.
#[inline]
pub fn finger_up(tip: &Landmark, pip: &Landmark) -> bool {
    tip.y < pip.y
}

/// Inclusive rectangle hit test
#[inline]
pub fn point_in_rect(p: Point, rect: &Rect) -> bool {
    p.x >= rect.x && p.x <= rect.right() && p.y >= rect.y && p.y <= rect.bottom()
}

/// Inclusive circle hit test
#[inline]
pub fn point_in_circle(p: Point, circle: &Circle) -> bool {
    distance(p, circle.center) <= circle.radius
}

/// Map a normalized landmark into screen pixels, optionally mirrored
/// horizontally for a selfie view.
#[inline]
pub fn landmark_to_screen(lm: &Landmark, width: f32, height: f32, mirror: bool) -> Point {
    let x = lm.x * width;
    Point::new(if mirror { width - x } else { x }, lm.y * height)
}

pub struct CoordinateConverter;

impl CoordinateConverter {
    /// Convert screen position to world position
    #[inline]
    pub fn screen_to_world(screen: Point, viewport: &Viewport) -> Point {
        Point::new(
            (screen.x - viewport.offset().x) / viewport.scale(),
            (screen.y - viewport.offset().y) / viewport.scale(),
        )
    }

    /// Convert world position to screen position
    #[inline]
    pub fn world_to_screen(world: Point, viewport: &Viewport) -> Point {
        Point::new(
            world.x * viewport.scale() + viewport.offset().x,
            world.y * viewport.scale() + viewport.offset().y,
        )
    }

    /// Convert a screen-space length to world space
    #[inline]
    pub fn length_screen_to_world(length: f32, viewport: &Viewport) -> f32 {
        length / viewport.scale()
    }
}
