//! Export requests: snapshot isolation, serialization and naming.

use crate::helpers::{MockStorage, PoseBuilder, TestEngine, TestEngineBuilder, rgba, toolbar_center};
use gesture_canvas::settings::ExportFormat;
use gesture_canvas::{AnnotateTool, DirectoryStorage, EngineError, EngineEvent, Mode, SaveOutcome, ShapeKind};
use image::Rgba;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

const WHITE: [u8; 4] = [255, 255, 255, 255];
const INK: [u8; 4] = [200, 0, 0, 255];

fn png_engine() -> TestEngine {
    TestEngineBuilder::new()
        .with_settings(|s| s.export_format = ExportFormat::Png)
        .build()
}

fn finished(events: Vec<EngineEvent>) -> Vec<SaveOutcome> {
    events
        .into_iter()
        .filter_map(|e| match e {
            EngineEvent::SaveFinished(outcome) => Some(outcome),
            _ => None,
        })
        .collect()
}

#[test]
fn test_save_exports_flattened_canvas() {
    let mut t = png_engine();
    t.paint_drawing_pixel(100, 100, Rgba(INK));
    t.no_hand();

    let storage = Arc::new(MockStorage::default());
    let ticket = t.request_save(storage.clone(), "sketch").unwrap();
    assert!(t.save_in_progress());
    assert!(t.shell_state().save_in_progress);

    // Edits after the request are not part of the export
    t.paint_drawing_pixel(200, 200, Rgba(INK));

    assert!(t.wait_for_save(Duration::from_secs(5)));
    assert!(!t.save_in_progress());

    let events = t.events();
    assert_eq!(events[0], EngineEvent::SaveStarted { ticket: ticket.clone() });
    let outcomes = finished(events);
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].ticket, ticket);
    assert_eq!(outcomes[0].name, "sketch.png");
    assert_eq!(outcomes[0].result, Ok(()));

    let (name, image) = storage.last_export().expect("decodable export");
    assert_eq!(name, "sketch.png");
    assert_eq!(image.dimensions(), (1280, 720));
    assert_eq!(rgba(&image, 100, 100), INK);
    assert_eq!(rgba(&image, 200, 200), WHITE);

    // No chrome in the export
    let toolbar = toolbar_center(&t, Mode::Brush);
    assert_eq!(rgba(&image, toolbar.x as u32, toolbar.y as u32), WHITE);
    assert_eq!(rgba(&image, 1100, 600), WHITE, "camera overlay is not exported");
}

#[test]
fn test_one_save_at_a_time() {
    let mut t = png_engine();
    let storage = Arc::new(MockStorage::default());
    t.request_save(storage.clone(), "first").unwrap();
    assert!(matches!(
        t.request_save(storage.clone(), "second"),
        Err(EngineError::SaveInProgress)
    ));

    assert!(t.wait_for_save(Duration::from_secs(5)));
    t.request_save(storage.clone(), "third").unwrap();
    assert!(t.wait_for_save(Duration::from_secs(5)));

    let names: Vec<String> = storage.exports.lock().iter().map(|(n, _)| n.clone()).collect();
    assert_eq!(names, vec!["first.png".to_string(), "third.png".to_string()]);
}

#[test]
fn test_failed_export_is_reported() {
    let mut t = png_engine();
    let storage = Arc::new(MockStorage {
        fail_export: true,
        ..MockStorage::default()
    });
    t.request_save(storage.clone(), "doomed").unwrap();
    assert!(t.wait_for_save(Duration::from_secs(5)));

    let outcomes = finished(t.events());
    assert_eq!(outcomes.len(), 1);
    let err = outcomes[0].result.clone().unwrap_err();
    assert!(err.contains("disk full"), "got {}", err);
    assert_eq!(storage.export_count(), 0);

    // The failure does not block later saves
    assert!(!t.save_in_progress());
    assert!(t.request_save(Arc::new(MockStorage::default()), "retry").is_ok());
}

#[test]
fn test_outcome_delivered_on_next_frame() {
    let mut t = png_engine();
    let storage = Arc::new(MockStorage::default());
    t.request_save(storage.clone(), "frame").unwrap();

    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while storage.export_count() == 0 && std::time::Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    assert!(t.save_in_progress(), "outcome waits for the frame thread");

    while t.save_in_progress() && std::time::Instant::now() < deadline {
        t.no_hand();
        std::thread::sleep(Duration::from_millis(5));
    }
    assert!(!t.save_in_progress());
    assert_eq!(finished(t.events()).len(), 1);
}

#[test]
fn test_jpeg_default_and_explicit_names() {
    let mut t = TestEngineBuilder::new().build();
    let storage = Arc::new(MockStorage::default());

    t.request_save(storage.clone(), "photo").unwrap();
    assert!(t.wait_for_save(Duration::from_secs(5)));
    let (name, image) = storage.last_export().expect("jpeg decodes");
    assert_eq!(name, "photo.jpg");
    assert_eq!(image.dimensions(), (1280, 720));

    t.request_save(storage.clone(), "keep.jpeg").unwrap();
    assert!(t.wait_for_save(Duration::from_secs(5)));
    assert_eq!(storage.last_export().unwrap().0, "keep.jpeg");
}

#[test]
fn test_export_excludes_shape_preview() {
    let mut t = TestEngineBuilder::new()
        .with_mode(Mode::Annotate)
        .with_tool(AnnotateTool::Shape(ShapeKind::Rectangle))
        .build();
    t.frame(&PoseBuilder::pinching(100.0, 300.0));
    t.step(&PoseBuilder::pinching(200.0, 380.0));
    assert!(t.interaction().draft.is_drafting());

    let snapshot = t.export_snapshot();
    assert_eq!(rgba(&snapshot, 150, 340), WHITE);
}

#[test]
fn test_directory_storage_export() {
    let dir = tempdir().unwrap();
    let mut t = png_engine();
    let storage = Arc::new(DirectoryStorage::new(dir.path()));

    t.request_save(storage.clone(), "board").unwrap();
    assert!(t.wait_for_save(Duration::from_secs(5)));

    let written = storage.exports_dir().join("board.png");
    let image = image::open(&written).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (1280, 720));
}

#[test]
fn test_dotted_names_still_get_extension() {
    let mut t = TestEngineBuilder::new().build();
    let storage = Arc::new(MockStorage::default());

    t.request_save(storage.clone(), "v1.2").unwrap();
    assert!(t.wait_for_save(Duration::from_secs(5)));
    assert_eq!(storage.last_export().expect("jpeg decodes").0, "v1.2.jpg");

    t.request_save(storage.clone(), "Shot.PNG").unwrap();
    assert!(t.wait_for_save(Duration::from_secs(5)));
    assert_eq!(storage.exports.lock().last().unwrap().0, "Shot.PNG");
}
