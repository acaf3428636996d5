//! Test helpers and builders for reducing boilerplate in tests.
//!
//! This module provides:
//! - `PoseBuilder` - synthetic 21-landmark hands with chosen fingers and pinch
//! - `TestEngineBuilder` / `TestEngine` - a started engine plus a frame clock
//! - `MockStorage`, `FailingTracker` - in-memory collaborators
//! - Pixel and image helpers

#![allow(dead_code)]

use gesture_canvas::constants::LANDMARK_COUNT;
use gesture_canvas::gesture::landmarks::*;
use gesture_canvas::settings::CameraOverlaySettings;
use gesture_canvas::{
    AnnotateTool, BackgroundPayload, CanvasStorage, Engine, EngineError, EngineEvent,
    EngineResult, EngineSettings, FrameReport, HandSample, HandTracker, Landmark, Mode, Point,
    ReplayTracker, TrackerFrame, ZoomMode,
};
use image::{ImageFormat, RgbaImage};
use parking_lot::Mutex;
use std::io::Cursor;
use std::ops::{Deref, DerefMut};
use std::time::{Duration, Instant};

pub const CANVAS_W: u32 = 1280;
pub const CANVAS_H: u32 = 720;

/// Camera overlay position used by the harness, parked in the bottom-right
/// corner so it does not cover the toolbar or side panels.
pub const OVERLAY_ORIGIN: (f32, f32) = (1000.0, 560.0);

/// Offset from the index fingertip to the palm center of a built pose.
pub const PALM_OFFSET: (f32, f32) = (33.5, 145.0);

// ============================================================================
// PoseBuilder - synthetic hands
// ============================================================================

/// Builds a [`HandSample`] in screen coordinates for the mirrored 1280x720
/// test canvas.
///
/// The index fingertip sits at the anchor point. Knuckles sit 90px below it
/// and span 80px, so the hand scale is 80 and a pinch needs index and thumb
/// tips within 20px.
///
/// # Example
/// ```ignore
/// let hand = PoseBuilder::pinching(300.0, 300.0).middle(true).build();
/// ```
#[derive(Clone, Debug)]
pub struct PoseBuilder {
    tip: Point,
    thumb: bool,
    index: bool,
    middle: bool,
    ring: bool,
    pinky: bool,
    pinch: bool,
    pinky_tip: Option<Point>,
}

impl PoseBuilder {
    /// Index finger extended, everything else curled.
    pub fn pointing(x: f32, y: f32) -> Self {
        Self {
            tip: Point::new(x, y),
            thumb: false,
            index: true,
            middle: false,
            ring: false,
            pinky: false,
            pinch: false,
            pinky_tip: None,
        }
    }

    /// Index and thumb extended, tips touching at `(x, y)`.
    pub fn pinching(x: f32, y: f32) -> Self {
        Self {
            thumb: true,
            pinch: true,
            ..Self::pointing(x, y)
        }
    }

    /// All five fingers extended, no pinch. Index tip at `(x, y)`.
    pub fn open_palm(x: f32, y: f32) -> Self {
        Self {
            thumb: true,
            middle: true,
            ring: true,
            pinky: true,
            ..Self::pointing(x, y)
        }
    }

    /// Open palm positioned so its palm center lands on `(x, y)`.
    pub fn palm_centered(x: f32, y: f32) -> Self {
        Self::open_palm(x - PALM_OFFSET.0, y - PALM_OFFSET.1)
    }

    /// Only the pinky extended, its tip at `(x, y)`. The index fingertip
    /// is parked well away from every button.
    pub fn pinky_only(x: f32, y: f32) -> Self {
        Self::pointing(600.0, 400.0).index(false).pinky_at(x, y)
    }

    pub fn thumb(mut self, up: bool) -> Self {
        self.thumb = up;
        self
    }

    pub fn index(mut self, up: bool) -> Self {
        self.index = up;
        self
    }

    pub fn middle(mut self, up: bool) -> Self {
        self.middle = up;
        self
    }

    pub fn ring(mut self, up: bool) -> Self {
        self.ring = up;
        self
    }

    pub fn pinky(mut self, up: bool) -> Self {
        self.pinky = up;
        self
    }

    /// Extend the pinky with its tip at `(x, y)`.
    pub fn pinky_at(mut self, x: f32, y: f32) -> Self {
        self.pinky = true;
        self.pinky_tip = Some(Point::new(x, y));
        self
    }

    pub fn screen_points(&self) -> [Point; LANDMARK_COUNT] {
        let t = self.tip;
        let at = |dx: f32, dy: f32| t.offset(dx, dy);
        let mut pts = [Point::default(); LANDMARK_COUNT];

        pts[WRIST] = at(40.0, 200.0);
        pts[INDEX_FINGER_MCP] = at(0.0, 90.0);
        pts[MIDDLE_FINGER_MCP] = at(27.0, 90.0);
        pts[RING_FINGER_MCP] = at(54.0, 90.0);
        pts[PINKY_MCP] = at(80.0, 90.0);

        pts[INDEX_FINGER_TIP] = t;
        pts[INDEX_FINGER_PIP] = if self.index { at(0.0, 30.0) } else { at(0.0, -30.0) };

        let thumb_tip = if self.pinch { t } else { at(-70.0, 20.0) };
        pts[THUMB_TIP] = thumb_tip;
        pts[THUMB_MCP] = thumb_tip.offset(0.0, if self.thumb { 30.0 } else { -30.0 });

        for (pip, tip, dx, up) in [
            (MIDDLE_FINGER_PIP, MIDDLE_FINGER_TIP, 27.0, self.middle),
            (RING_FINGER_PIP, RING_FINGER_TIP, 54.0, self.ring),
            (PINKY_PIP, PINKY_TIP, 80.0, self.pinky),
        ] {
            let joint = at(dx, 50.0);
            pts[pip] = joint;
            pts[tip] = joint.offset(0.0, if up { -30.0 } else { 30.0 });
        }
        if let Some(p) = self.pinky_tip {
            pts[PINKY_TIP] = p;
            pts[PINKY_PIP] = p.offset(0.0, 30.0);
        }

        pts[THUMB_CMC] = pts[THUMB_MCP];
        pts[THUMB_IP] = pts[THUMB_MCP];
        pts[INDEX_FINGER_DIP] = pts[INDEX_FINGER_PIP];
        pts[MIDDLE_FINGER_DIP] = pts[MIDDLE_FINGER_PIP];
        pts[RING_FINGER_DIP] = pts[RING_FINGER_PIP];
        pts[PINKY_DIP] = pts[PINKY_PIP];
        pts
    }

    /// Normalized landmarks as a mirrored tracker would report them.
    pub fn build(&self) -> HandSample {
        let (w, h) = (CANVAS_W as f32, CANVAS_H as f32);
        let pts = self.screen_points();
        HandSample::new(std::array::from_fn(|i| Landmark {
            x: 1.0 - pts[i].x / w,
            y: pts[i].y / h,
            z: 0.0,
        }))
    }
}

// ============================================================================
// TestEngine - engine plus a frame clock
// ============================================================================

/// Engine wrapper that supplies a deterministic clock.
///
/// Time starts at zero and only moves when the test says so.
pub struct TestEngine {
    pub engine: Engine,
    t0: Instant,
    elapsed: Duration,
}

impl Deref for TestEngine {
    type Target = Engine;

    fn deref(&self) -> &Engine {
        &self.engine
    }
}

impl DerefMut for TestEngine {
    fn deref_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }
}

impl TestEngine {
    pub fn now(&self) -> Instant {
        self.t0 + self.elapsed
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }

    /// Move the clock to `ms` after the start.
    pub fn at(&mut self, ms: u64) -> &mut Self {
        self.elapsed = Duration::from_millis(ms);
        self
    }

    pub fn advance(&mut self, ms: u64) -> &mut Self {
        self.elapsed += Duration::from_millis(ms);
        self
    }

    /// Process one frame with `pose` at the current time.
    pub fn frame(&mut self, pose: &PoseBuilder) -> FrameReport {
        let sample = pose.build();
        let now = self.now();
        self.engine.process_frame(Some(&sample), None, now)
    }

    /// Process one frame without a hand at the current time.
    pub fn no_hand(&mut self) -> FrameReport {
        let now = self.now();
        self.engine.process_frame(None, None, now)
    }

    /// Advance one video frame (33ms), then process `pose`.
    pub fn step(&mut self, pose: &PoseBuilder) -> FrameReport {
        self.advance(33);
        self.frame(pose)
    }

    /// Hold `pose` over a button for a full dwell. Returns the report of
    /// the frame on which the dwell completes.
    pub fn dwell(&mut self, pose: &PoseBuilder) -> FrameReport {
        let dwell = self.engine.settings().hover_dwell_ms;
        self.frame(pose);
        self.advance(dwell);
        self.frame(pose)
    }

    pub fn events(&mut self) -> Vec<EngineEvent> {
        self.engine.drain_events()
    }
}

// ============================================================================
// TestEngineBuilder
// ============================================================================

/// Builder for a ready engine on the 1280x720 test canvas.
///
/// # Example
/// ```ignore
/// let mut t = TestEngineBuilder::new()
///     .with_mode(Mode::Annotate)
///     .with_tool(AnnotateTool::Selection)
///     .build();
/// ```
pub struct TestEngineBuilder {
    settings: EngineSettings,
    size: (u32, u32),
    start: bool,
    mode: Option<Mode>,
    tool: Option<AnnotateTool>,
    zoom: Option<ZoomMode>,
}

impl Default for TestEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEngineBuilder {
    pub fn new() -> Self {
        Self {
            settings: test_settings(),
            size: (CANVAS_W, CANVAS_H),
            start: true,
            mode: None,
            tool: None,
            zoom: None,
        }
    }

    pub fn with_settings(mut self, f: impl FnOnce(&mut EngineSettings)) -> Self {
        f(&mut self.settings);
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_tool(mut self, tool: AnnotateTool) -> Self {
        self.tool = Some(tool);
        self
    }

    pub fn with_zoom_mode(mut self, zoom: ZoomMode) -> Self {
        self.zoom = Some(zoom);
        self
    }

    /// Leave the tracker unstarted.
    pub fn not_started(mut self) -> Self {
        self.start = false;
        self
    }

    /// Build the engine. Setup events are drained so tests see only their own.
    pub fn build(self) -> TestEngine {
        let mut engine = Engine::new(self.settings, self.size.0, self.size.1);
        if self.start {
            engine
                .start(&mut ReplayTracker::from_frames(Vec::new()))
                .expect("replay tracker starts");
        }
        if let Some(mode) = self.mode {
            engine.override_mode(mode);
        }
        if let Some(tool) = self.tool {
            engine.set_annotate_tool(tool);
        }
        if let Some(zoom) = self.zoom {
            engine.set_zoom_mode(zoom);
        }
        engine.drain_events();
        TestEngine {
            engine,
            t0: Instant::now(),
            elapsed: Duration::ZERO,
        }
    }
}

/// Default settings with the camera overlay out of the way.
pub fn test_settings() -> EngineSettings {
    EngineSettings {
        camera_overlay: CameraOverlaySettings {
            x: OVERLAY_ORIGIN.0,
            y: OVERLAY_ORIGIN.1,
            ..CameraOverlaySettings::default()
        },
        ..EngineSettings::default()
    }
}

/// Ready engine in its initial state.
pub fn ready_engine() -> TestEngine {
    TestEngineBuilder::new().build()
}

/// Center of the toolbar button for `mode`.
pub fn toolbar_center(t: &TestEngine, mode: Mode) -> Point {
    t.layout()
        .toolbar_button(mode)
        .map(|r| r.center())
        .expect("toolbar has a button for every mode")
}

// ============================================================================
// Mock collaborators
// ============================================================================

/// In-memory storage with switchable failures.
#[derive(Default)]
pub struct MockStorage {
    pub reference: Option<String>,
    pub remote: Option<BackgroundPayload>,
    pub fail_fetch: bool,
    pub fail_export: bool,
    pub exports: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MockStorage {
    pub fn with_reference(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            ..Self::default()
        }
    }

    pub fn export_count(&self) -> usize {
        self.exports.lock().len()
    }

    /// Decode the most recent export.
    pub fn last_export(&self) -> Option<(String, RgbaImage)> {
        let exports = self.exports.lock();
        let (name, bytes) = exports.last()?;
        let image = image::load_from_memory(bytes).ok()?.to_rgba8();
        Some((name.clone(), image))
    }
}

impl CanvasStorage for MockStorage {
    fn cached_background_reference(&self, _canvas_id: &str) -> EngineResult<Option<String>> {
        Ok(self.reference.clone())
    }

    fn fetch_url(&self, url: &str) -> EngineResult<Option<BackgroundPayload>> {
        if self.fail_fetch {
            return Err(EngineError::Storage(format!("unreachable: {}", url)));
        }
        Ok(self.remote.clone())
    }

    fn export_composite(&self, bytes: &[u8], name: &str) -> EngineResult<()> {
        if self.fail_export {
            return Err(EngineError::Storage("disk full".to_string()));
        }
        self.exports.lock().push((name.to_string(), bytes.to_vec()));
        Ok(())
    }
}

/// Tracker whose start always fails.
pub struct FailingTracker;

impl HandTracker for FailingTracker {
    fn start(&mut self) -> EngineResult<()> {
        Err(EngineError::TrackerInit("camera permission denied".to_string()))
    }

    fn stop(&mut self) {}

    fn is_ready(&self) -> bool {
        false
    }

    fn next_frame(&mut self) -> Option<TrackerFrame> {
        None
    }
}

// ============================================================================
// Pixels
// ============================================================================

pub fn rgba(img: &RgbaImage, x: u32, y: u32) -> [u8; 4] {
    img.get_pixel(x, y).0
}

pub fn alpha(img: &RgbaImage, x: u32, y: u32) -> u8 {
    img.get_pixel(x, y).0[3]
}

/// Encode a solid `w` x `h` image as PNG.
pub fn solid_png(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("png encodes");
    bytes
}

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 0.01
}

pub fn assert_point_near(p: Point, x: f32, y: f32) {
    assert!(approx(p.x, x) && approx(p.y, y), "expected ({}, {}), got {:?}", x, y, p);
}
