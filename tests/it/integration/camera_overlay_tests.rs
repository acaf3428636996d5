//! Camera preview dragging by pinch and by pointer.

use crate::helpers::{CANVAS_H, CANVAS_W, OVERLAY_ORIGIN, PoseBuilder, ready_engine};
use gesture_canvas::Point;
use gesture_canvas::input::PointerCursor;

fn assert_inside_canvas(x: f32, y: f32, w: f32, h: f32) {
    assert!(x >= 0.0 && y >= 0.0, "overlay at ({}, {})", x, y);
    assert!(x + w <= CANVAS_W as f32 && y + h <= CANVAS_H as f32);
}

#[test]
fn test_pinch_drags_overlay_and_clamps() {
    let mut t = ready_engine();
    t.frame(&PoseBuilder::pinching(1100.0, 600.0));
    assert!(t.interaction().camera_drag.is_gesture());
    assert_eq!((t.overlay.x, t.overlay.y), OVERLAY_ORIGIN);

    t.step(&PoseBuilder::pinching(1150.0, 620.0));
    t.step(&PoseBuilder::pinching(1270.0, 710.0));
    assert!((t.overlay.x - 1040.0).abs() < 0.01);
    assert!((t.overlay.y - 585.0).abs() < 0.01);
    assert_inside_canvas(t.overlay.x, t.overlay.y, t.overlay.width, t.overlay.height);

    t.step(&PoseBuilder::pointing(1100.0, 650.0));
    assert!(!t.interaction().camera_drag.is_dragging());
}

#[test]
fn test_pinch_drag_to_top_left_corner() {
    let mut t = ready_engine();
    let (from, to) = (Point::new(1100.0, 600.0), Point::new(60.0, 30.0));
    for i in 0..=20 {
        let f = i as f32 / 20.0;
        let x = from.x + (to.x - from.x) * f;
        let y = from.y + (to.y - from.y) * f;
        t.step(&PoseBuilder::pinching(x, y));
    }
    assert!(t.overlay.x.abs() < 0.01 && t.overlay.y.abs() < 0.01);
}

#[test]
fn test_pinch_outside_overlay_does_not_drag() {
    let mut t = ready_engine();
    t.frame(&PoseBuilder::pinching(900.0, 600.0));
    t.step(&PoseBuilder::pinching(1100.0, 600.0));
    t.step(&PoseBuilder::pinching(800.0, 500.0));
    assert!(!t.interaction().camera_drag.is_dragging());
    assert_eq!((t.overlay.x, t.overlay.y), OVERLAY_ORIGIN);
}

#[test]
fn test_pointer_drag_clamps_and_releases() {
    let mut t = ready_engine();
    assert_eq!(t.pointer_cursor(Point::new(1100.0, 600.0)), PointerCursor::Grab);
    assert!(t.pointer_down(Point::new(1100.0, 600.0)));
    assert_eq!(t.pointer_cursor(Point::new(5.0, 5.0)), PointerCursor::Grabbing);

    t.pointer_move(Point::new(-500.0, -500.0));
    assert_eq!((t.overlay.x, t.overlay.y), (0.0, 0.0));

    t.pointer_up(Point::new(-500.0, -500.0));
    assert!(!t.interaction().camera_drag.is_dragging());
    assert_eq!(t.pointer_cursor(Point::new(5.0, 5.0)), PointerCursor::Grab);
    assert_eq!(t.pointer_cursor(Point::new(600.0, 600.0)), PointerCursor::Default);
}

#[test]
fn test_pointer_down_outside_is_ignored() {
    let mut t = ready_engine();
    assert!(!t.pointer_down(Point::new(100.0, 100.0)));
    t.pointer_move(Point::new(300.0, 300.0));
    assert_eq!((t.overlay.x, t.overlay.y), OVERLAY_ORIGIN);
}

#[test]
fn test_pointer_drag_owns_overlay() {
    let mut t = ready_engine();
    assert!(t.pointer_down(Point::new(1100.0, 600.0)));
    t.frame(&PoseBuilder::pinching(1100.0, 600.0));
    t.step(&PoseBuilder::pinching(1050.0, 600.0));
    assert!(t.interaction().camera_drag.is_pointer());
    assert_eq!((t.overlay.x, t.overlay.y), OVERLAY_ORIGIN);
}
