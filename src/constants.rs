//! Engine-wide constants.
//!
//! Centralizes magic numbers and layout values so the interpreters and the
//! layout code agree on the same geometry. Values that users may tune live
//! in [`crate::settings::EngineSettings`] and take their defaults from here.

// ============================================================================
// Gesture Classification
// ============================================================================

/// Number of landmarks in one hand sample
pub const LANDMARK_COUNT: usize = 21;

/// Pinch fires when index-thumb distance is below this fraction of hand scale
pub const PINCH_RATIO_THRESHOLD: f32 = 0.25;

/// Maximum index-thumb depth difference for a pinch (normalized z units)
pub const PINCH_DEPTH_THRESHOLD: f32 = 0.08;

// ============================================================================
// Timing
// ============================================================================

/// Dwell time before a hovered button activates
pub const HOVER_DWELL_MS: u64 = 1000;

/// Target frame time for a 30 FPS camera feed
pub const TARGET_FRAME_MS: f64 = 33.3;

// ============================================================================
// Zoom & Pan
// ============================================================================

/// Minimum viewport scale
pub const MIN_SCALE: f32 = 0.2;

/// Maximum viewport scale
pub const MAX_SCALE: f32 = 5.0;

/// Default viewport scale
pub const DEFAULT_SCALE: f32 = 1.0;

/// Per-frame multiplicative zoom step while a zoom gesture is held
pub const ZOOM_STEP: f32 = 1.05;

// ============================================================================
// Brush & Eraser
// ============================================================================

/// Default brush diameter in pixels
pub const DEFAULT_BRUSH_SIZE: f32 = 6.0;

/// Smallest brush diameter accepted by the setter
pub const MIN_BRUSH_SIZE: f32 = 1.0;

/// Largest brush diameter accepted by the setter
pub const MAX_BRUSH_SIZE: f32 = 50.0;

/// Palm eraser radius in screen pixels
pub const ERASER_RADIUS: f32 = 60.0;

/// Default brush color
pub const DEFAULT_BRUSH_COLOR: &str = "#ff4d4d";

/// Default background color
pub const DEFAULT_BACKGROUND_COLOR: &str = "#ffffff";

/// Alpha applied to shape fills (preview and stamped)
pub const SHAPE_FILL_ALPHA: u8 = 0x40;

/// Palette swatches, top to bottom
pub const PALETTE_COLORS: [&str; 8] = [
    "#ff4d4d", "#ffd166", "#06d6a0", "#118ab2", "#a78bfa", "#ff7ab6", "#ffffff", "#000000",
];

// ============================================================================
// Selection
// ============================================================================

/// A marquee must exceed this size on both axes to lift pixels
pub const MIN_SELECTION_SIZE: f32 = 10.0;

// ============================================================================
// Camera Overlay
// ============================================================================

/// Camera preview width
pub const CAMERA_OVERLAY_WIDTH: f32 = 240.0;

/// Camera preview height
pub const CAMERA_OVERLAY_HEIGHT: f32 = 135.0;

/// Initial camera preview position
pub const CAMERA_OVERLAY_ORIGIN: (f32, f32) = (20.0, 20.0);

/// Height of the camera preview title strip
pub const CAMERA_TITLE_HEIGHT: f32 = 20.0;

// ============================================================================
// Toolbar Layout
// ============================================================================

/// Toolbar button width
pub const TOOLBAR_BUTTON_WIDTH: f32 = 110.0;

/// Toolbar button height
pub const TOOLBAR_BUTTON_HEIGHT: f32 = 44.0;

/// Gap between toolbar buttons
pub const TOOLBAR_BUTTON_GAP: f32 = 12.0;

/// Distance from the top edge to the toolbar
pub const TOOLBAR_TOP_MARGIN: f32 = 12.0;

/// Minimum left margin when the toolbar does not fit centered
pub const TOOLBAR_MIN_LEFT: f32 = 12.0;

// ============================================================================
// Side Panels (zoom, shape, selection, palette)
// ============================================================================

/// Left edge of every side panel
pub const SIDE_PANEL_X: f32 = 40.0;

/// Top edge of the zoom/shape/palette column
pub const SIDE_PANEL_Y: f32 = 120.0;

/// Zoom sub-mode button size
pub const ZOOM_BUTTON_SIZE: (f32, f32) = (60.0, 44.0);

/// Gap between zoom sub-mode buttons
pub const ZOOM_BUTTON_GAP: f32 = 12.0;

/// Shape button size
pub const SHAPE_BUTTON_SIZE: (f32, f32) = (60.0, 44.0);

/// Gap between shape buttons
pub const SHAPE_BUTTON_GAP: f32 = 8.0;

/// Selection tool button origin
pub const SELECTION_BUTTON_ORIGIN: (f32, f32) = (40.0, 320.0);

/// Selection tool button size
pub const SELECTION_BUTTON_SIZE: (f32, f32) = (60.0, 44.0);

/// Erase button size; anchored to the right edge
pub const ERASE_BUTTON_SIZE: (f32, f32) = (80.0, 44.0);

/// Distance between the erase button and the right edge
pub const ERASE_BUTTON_RIGHT_MARGIN: f32 = 40.0;

/// Palette swatch radius
pub const SWATCH_RADIUS: f32 = 20.0;

/// Vertical gap between palette swatches
pub const SWATCH_GAP: f32 = 14.0;

// ============================================================================
// Export
// ============================================================================

/// Default JPEG quality for exported canvases
pub const EXPORT_JPEG_QUALITY: u8 = 90;
