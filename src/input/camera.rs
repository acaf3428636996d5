//! Camera overlay drag.
//!
//! The overlay follows either a pinch grip that starts inside it or a
//! pointer drag that starts inside it. A pointer drag owns the overlay
//! until release; the gesture path is skipped meanwhile.

use crate::engine::Engine;
use crate::gesture::GestureState;
use crate::input::state::CameraDrag;
use crate::types::Point;
use tracing::debug;

/// Cursor hint for a pointer over the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerCursor {
    Default,
    /// Over the overlay, not dragging
    Grab,
    Grabbing,
}

impl Engine {
    pub(crate) fn update_camera_gesture(&mut self, g: &GestureState) {
        if self.interaction.camera_drag.is_pointer() {
            return;
        }
        let tip = g.index_tip;
        if self.overlay.contains(tip) && g.pinch_grip() {
            match self.interaction.camera_drag {
                CameraDrag::Gesture { offset } => self.drag_overlay_to(tip, offset),
                _ => {
                    let origin = self.overlay.origin();
                    debug!("Camera overlay gesture drag started");
                    self.interaction.camera_drag = CameraDrag::Gesture {
                        offset: Point::new(tip.x - origin.x, tip.y - origin.y),
                    };
                }
            }
        } else if self.interaction.camera_drag.is_gesture() {
            debug!(x = self.overlay.x, y = self.overlay.y, "Camera overlay gesture drag ended");
            self.interaction.camera_drag.reset();
        }
    }

    /// Start a pointer drag if `at` is on the overlay. Returns true when
    /// the overlay took the pointer.
    pub fn pointer_down(&mut self, at: Point) -> bool {
        if !self.overlay.contains(at) {
            return false;
        }
        let origin = self.overlay.origin();
        self.interaction.camera_drag = CameraDrag::Pointer {
            offset: Point::new(at.x - origin.x, at.y - origin.y),
        };
        debug!("Camera overlay pointer drag started");
        true
    }

    pub fn pointer_move(&mut self, at: Point) {
        if let CameraDrag::Pointer { offset } = self.interaction.camera_drag {
            self.drag_overlay_to(at, offset);
        }
    }

    pub fn pointer_up(&mut self, _at: Point) {
        if self.interaction.camera_drag.is_pointer() {
            debug!(x = self.overlay.x, y = self.overlay.y, "Camera overlay pointer drag ended");
            self.interaction.camera_drag.reset();
        }
    }

    pub fn pointer_cursor(&self, at: Point) -> PointerCursor {
        if self.interaction.camera_drag.is_pointer() {
            PointerCursor::Grabbing
        } else if self.overlay.contains(at) {
            PointerCursor::Grab
        } else {
            PointerCursor::Default
        }
    }

    fn drag_overlay_to(&mut self, at: Point, offset: Point) {
        let (w, h) = (self.canvas.width as f32, self.canvas.height as f32);
        self.overlay.move_to(at.x - offset.x, at.y - offset.y, w, h);
    }
}
