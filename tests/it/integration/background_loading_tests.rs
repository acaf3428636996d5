//! Background image loading and export of restricted backgrounds.

use crate::helpers::{MockStorage, TestEngineBuilder, ready_engine, rgba, solid_png};
use gesture_canvas::storage::encode_data_url;
use gesture_canvas::{BackgroundPayload, Color, EngineEvent};
use serde_json::json;

const WHITE: [u8; 4] = [255, 255, 255, 255];

fn red_data_url() -> String {
    encode_data_url("image/png", &solid_png(2, 2, [255, 0, 0, 255]))
}

fn assert_red(px: [u8; 4]) {
    assert!(px[0] > 250 && px[1] < 5 && px[2] < 5 && px[3] == 255, "got {:?}", px);
}

#[test]
fn test_data_url_background_letterboxed() {
    let mut t = ready_engine();
    let storage = MockStorage::with_reference(json!({"backgroundImage": red_data_url()}).to_string());
    t.load_background(&storage, "board");
    assert_eq!(t.events(), vec![EngineEvent::BackgroundLoaded]);

    // 2x2 fits as a centered 720x720 square
    let snapshot = t.export_snapshot();
    assert_red(rgba(&snapshot, 640, 360));
    assert_eq!(rgba(&snapshot, 10, 360), WHITE);
    assert_eq!(rgba(&snapshot, 1270, 360), WHITE);

    t.no_hand();
    assert_red(rgba(t.composite(), 640, 360));
}

#[test]
fn test_malformed_reference_uses_solid_color() {
    let mut t = TestEngineBuilder::new()
        .with_settings(|s| s.background_color = Color::from_hex("#202020").unwrap())
        .build();
    let storage = MockStorage::with_reference("{oops");
    t.load_background(&storage, "board");

    assert!(t.events().is_empty());
    assert_eq!(rgba(&t.export_snapshot(), 640, 360), [32, 32, 32, 255]);
}

#[test]
fn test_unreachable_background_falls_back() {
    let mut t = ready_engine();
    let storage = MockStorage {
        fail_fetch: true,
        ..MockStorage::with_reference(json!({"image": "https://host/bg.png"}).to_string())
    };
    t.load_background(&storage, "board");

    match t.events().as_slice() {
        [EngineEvent::BackgroundFallback(reason)] => assert!(reason.contains("unreachable")),
        other => panic!("expected one fallback event, got {:?}", other),
    }
    assert_eq!(rgba(&t.export_snapshot(), 640, 360), WHITE);
}

#[test]
fn test_undecodable_bytes_fall_back() {
    let mut t = ready_engine();
    let storage = MockStorage {
        remote: Some(BackgroundPayload {
            bytes: b"not an image".to_vec(),
            source_url: Some("https://host/bg.png".to_string()),
            restricted: false,
        }),
        ..MockStorage::with_reference(json!({"imagePath": "https://host/bg.png"}).to_string())
    };
    t.load_background(&storage, "board");
    assert!(matches!(t.events().as_slice(), [EngineEvent::BackgroundFallback(_)]));
}

#[test]
fn test_restricted_background_not_exported() {
    let mut t = ready_engine();
    let storage = MockStorage {
        remote: Some(BackgroundPayload {
            bytes: solid_png(2, 2, [255, 0, 0, 255]),
            source_url: Some("https://elsewhere/bg.png".to_string()),
            restricted: true,
        }),
        ..MockStorage::with_reference(json!({"image": "https://elsewhere/bg.png"}).to_string())
    };
    t.load_background(&storage, "board");
    assert_eq!(t.events(), vec![EngineEvent::BackgroundLoaded]);

    // Displayed, but the export falls back to the solid color
    t.no_hand();
    assert_red(rgba(t.composite(), 640, 360));
    assert_eq!(rgba(&t.export_snapshot(), 640, 360), WHITE);
}

#[test]
fn test_restricted_data_url_is_rederived() {
    let mut t = ready_engine();
    let url = red_data_url();
    let storage = MockStorage {
        remote: Some(BackgroundPayload {
            bytes: solid_png(2, 2, [255, 0, 0, 255]),
            source_url: Some(url.clone()),
            restricted: true,
        }),
        ..MockStorage::with_reference(json!({"image": "https://elsewhere/bg.png"}).to_string())
    };
    t.load_background(&storage, "board");

    let snapshot = t.export_snapshot();
    assert_red(rgba(&snapshot, 640, 360));
    assert_eq!(rgba(&snapshot, 10, 360), WHITE);
}
