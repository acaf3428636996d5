//! Snapshot tests using the insta crate.
//!
//! The engine's observable surface (shell state, event stream, export
//! settings) is serialized and compared against inline snapshots.
//!
//! To update snapshots after intentional changes:
//! ```sh
//! cargo insta test --accept
//! ```

use crate::helpers::{PoseBuilder, ready_engine, toolbar_center};
use gesture_canvas::Mode;
use gesture_canvas::settings::ExportFormat;

#[test]
fn snapshot_initial_shell_state() {
    let t = ready_engine();
    insta::assert_json_snapshot!(t.shell_state(), { ".brush_size" => "[size]" }, @r##"
    {
      "mode": "Idle",
      "zoom_mode": "ZoomIn",
      "annotate_tool": "None",
      "brush_color": "#ff4d4d",
      "brush_size": "[size]",
      "hand_visible": false,
      "hover": [],
      "save_in_progress": false,
      "readiness": "Ready"
    }
    "##);
}

#[test]
fn snapshot_toolbar_dwell_events() {
    let mut t = ready_engine();
    let brush = toolbar_center(&t, Mode::Brush);
    t.dwell(&PoseBuilder::pointing(brush.x, brush.y));

    insta::assert_json_snapshot!(t.events(), @r#"
    [
      {
        "HandVisibilityChanged": true
      },
      {
        "HoverFired": {
          "Toolbar": "Brush"
        }
      },
      {
        "ModeChanged": "Brush"
      }
    ]
    "#);
}

#[test]
fn snapshot_export_formats() {
    insta::assert_json_snapshot!(ExportFormat::default(), @r#"
    {
      "kind": "jpeg",
      "quality": 90
    }
    "#);
    insta::assert_json_snapshot!(ExportFormat::Png, @r#"
    {
      "kind": "png"
    }
    "#);
}
