//! Mode and tool switching through dwell buttons.

use crate::helpers::{PoseBuilder, TestEngineBuilder, ready_engine, toolbar_center};
use gesture_canvas::hover::{HoverProgress, HoverTarget};
use gesture_canvas::{AnnotateTool, Color, EngineEvent, Mode, Point, ShapeKind, ZoomMode};

fn center_of(rect: gesture_canvas::Rect) -> Point {
    rect.center()
}

#[test]
fn test_toolbar_fires_at_dwell_not_before() {
    let mut t = ready_engine();
    let c = toolbar_center(&t, Mode::Brush);
    let pose = PoseBuilder::pointing(c.x, c.y);

    assert!(t.frame(&pose).fired.is_empty());
    assert!(t.at(999).frame(&pose).fired.is_empty());
    assert_eq!(t.mode(), Mode::Idle);

    let report = t.at(1000).frame(&pose);
    assert_eq!(report.fired, vec![HoverTarget::Toolbar(Mode::Brush)]);
    assert_eq!(t.mode(), Mode::Brush);
}

#[test]
fn test_dwell_needs_extended_index() {
    let mut t = ready_engine();
    let c = toolbar_center(&t, Mode::Zoom);
    let fist = PoseBuilder::pointing(c.x, c.y).index(false);

    t.frame(&fist);
    t.at(2000).frame(&fist);
    assert_eq!(t.mode(), Mode::Idle);
}

#[test]
fn test_leaving_button_restarts_timer() {
    let mut t = ready_engine();
    let c = toolbar_center(&t, Mode::Annotate);
    let on = PoseBuilder::pointing(c.x, c.y);
    let off = PoseBuilder::pointing(c.x, 400.0);

    t.frame(&on);
    t.at(500).frame(&off);
    t.at(600).frame(&on);
    t.at(1599).frame(&on);
    assert_eq!(t.mode(), Mode::Idle);
    t.at(1600).frame(&on);
    assert_eq!(t.mode(), Mode::Annotate);
}

#[test]
fn test_reselecting_mode_is_noop() {
    let mut t = TestEngineBuilder::new().with_mode(Mode::Brush).build();
    assert!(!t.override_mode(Mode::Brush));

    let c = toolbar_center(&t, Mode::Brush);
    let report = t.dwell(&PoseBuilder::pointing(c.x, c.y));
    assert_eq!(report.fired, vec![HoverTarget::Toolbar(Mode::Brush)]);
    assert!(
        !t.events().iter().any(|e| matches!(e, EngineEvent::ModeChanged(_))),
        "re-selecting Brush must not emit a mode change"
    );
    assert_eq!(t.mode(), Mode::Brush);
}

#[test]
fn test_toolbar_covered_by_camera_overlay() {
    let mut t = ready_engine();
    // Drag the preview over the toolbar
    assert!(t.pointer_down(Point::new(1100.0, 600.0)));
    t.pointer_move(Point::new(550.0, 40.0));
    t.pointer_up(Point::new(550.0, 40.0));
    let c = toolbar_center(&t, Mode::Brush);
    assert!(t.overlay.contains(c));

    let report = t.dwell(&PoseBuilder::pointing(c.x, c.y));
    assert!(report.fired.is_empty());
    assert_eq!(t.mode(), Mode::Idle);
}

#[test]
fn test_absent_hand_pauses_dwell() {
    let mut t = ready_engine();
    let c = toolbar_center(&t, Mode::Brush);
    let pose = PoseBuilder::pointing(c.x, c.y);

    t.frame(&pose);
    t.at(400).no_hand();
    t.at(5000).no_hand();
    assert_eq!(t.mode(), Mode::Idle);

    // 400ms already banked; 600ms more are needed after the hand returns
    t.at(5000).frame(&pose);
    t.at(5599).frame(&pose);
    assert_eq!(t.mode(), Mode::Idle);
    t.at(5600).frame(&pose);
    assert_eq!(t.mode(), Mode::Brush);

    let visibility: Vec<bool> = t
        .events()
        .into_iter()
        .filter_map(|e| match e {
            EngineEvent::HandVisibilityChanged(v) => Some(v),
            _ => None,
        })
        .collect();
    assert_eq!(visibility, vec![true, false, true]);
}

#[test]
fn test_shell_state_reports_progress() {
    let mut t = ready_engine();
    let c = toolbar_center(&t, Mode::Zoom);
    let pose = PoseBuilder::pointing(c.x, c.y);
    t.frame(&pose);
    t.at(250).frame(&pose);

    let state = t.shell_state();
    assert!(state.hand_visible);
    assert_eq!(state.hover.len(), 1);
    let HoverProgress { target, fraction } = state.hover[0];
    assert_eq!(target, HoverTarget::Toolbar(Mode::Zoom));
    assert!((fraction - 0.25).abs() < 1e-3);
}

#[test]
fn test_palette_pick_sets_color_and_returns_to_brush() {
    let mut t = TestEngineBuilder::new().with_mode(Mode::ColorSelect).build();
    let swatch = t.layout().swatches[2].center;
    let expected = t.settings().palette[2];

    let report = t.dwell(&PoseBuilder::pointing(swatch.x, swatch.y));
    assert_eq!(report.fired, vec![HoverTarget::Swatch(2)]);
    assert_eq!(t.brush_color(), expected);
    assert_eq!(t.brush_color(), Color::from_hex("#06d6a0").unwrap());
    assert_eq!(t.mode(), Mode::Brush);

    let events = t.events();
    assert_eq!(
        &events[events.len() - 2..],
        &[
            EngineEvent::BrushColorChanged(expected),
            EngineEvent::ModeChanged(Mode::Brush)
        ]
    );
}

#[test]
fn test_annotate_tools_replace_each_other() {
    let mut t = TestEngineBuilder::new().with_mode(Mode::Annotate).build();
    let layout = t.layout().clone();

    let rect_button = center_of(layout.shape_button(ShapeKind::Rectangle).unwrap());
    t.dwell(&PoseBuilder::pointing(rect_button.x, rect_button.y));
    assert_eq!(t.annotate_tool(), AnnotateTool::Shape(ShapeKind::Rectangle));

    let selection = center_of(layout.selection);
    t.dwell(&PoseBuilder::pointing(selection.x, selection.y));
    assert_eq!(t.annotate_tool(), AnnotateTool::Selection);
    assert_eq!(t.annotate_tool().shape_mode(), None);

    let erase = center_of(layout.erase);
    t.dwell(&PoseBuilder::pointing(erase.x, erase.y));
    assert_eq!(t.annotate_tool(), AnnotateTool::Eraser);

    let changes: Vec<AnnotateTool> = t
        .events()
        .into_iter()
        .filter_map(|e| match e {
            EngineEvent::AnnotateToolChanged(tool) => Some(tool),
            _ => None,
        })
        .collect();
    assert_eq!(
        changes,
        vec![
            AnnotateTool::Shape(ShapeKind::Rectangle),
            AnnotateTool::Selection,
            AnnotateTool::Eraser
        ]
    );
}

#[test]
fn test_leaving_annotate_drops_eraser() {
    let mut t = TestEngineBuilder::new()
        .with_mode(Mode::Annotate)
        .with_tool(AnnotateTool::Eraser)
        .build();
    assert!(t.override_mode(Mode::Brush));
    assert_eq!(t.annotate_tool(), AnnotateTool::None);
    assert_eq!(
        t.events(),
        vec![
            EngineEvent::ModeChanged(Mode::Brush),
            EngineEvent::AnnotateToolChanged(AnnotateTool::None)
        ]
    );
}

#[test]
fn test_annotate_buttons_inactive_in_other_modes() {
    let mut t = TestEngineBuilder::new().with_mode(Mode::Brush).build();
    let rect_button = center_of(t.layout().shape_button(ShapeKind::Rectangle).unwrap());
    let report = t.dwell(&PoseBuilder::pointing(rect_button.x, rect_button.y));
    assert!(report.fired.is_empty());
    assert_eq!(t.annotate_tool(), AnnotateTool::None);
}

#[test]
fn test_zoom_sub_mode_buttons() {
    let mut t = TestEngineBuilder::new().with_mode(Mode::Zoom).build();
    let out = center_of(t.layout().zoom_button(ZoomMode::ZoomOut).unwrap());

    let report = t.dwell(&PoseBuilder::pointing(out.x, out.y));
    assert_eq!(report.fired, vec![HoverTarget::Zoom(ZoomMode::ZoomOut)]);
    assert_eq!(t.zoom_mode(), ZoomMode::ZoomOut);
    assert!(t.events().contains(&EngineEvent::ZoomModeChanged(ZoomMode::ZoomOut)));
}
