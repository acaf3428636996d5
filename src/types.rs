//! Core types for the gesture canvas.
//!
//! Plain geometry values, colors, and the closed enums that name modes and
//! tools. Everything here is `Copy` and cheap to pass by value.

use image::Rgba;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Geometry
// ============================================================================

/// A 2D point. Used for both screen space and world (canvas) space; the
/// surrounding API always says which one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Midpoint between two points
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn offset(self, dx: f32, dy: f32) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Axis-aligned rectangle with its origin at the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Bounding box of two corner points, in any order
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            w: (b.x - a.x).abs(),
            h: (b.y - a.y).abs(),
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Circle hit region (palette swatches).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point,
    pub radius: f32,
}

// ============================================================================
// Color
// ============================================================================

/// An sRGB color with straight alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const WHITE: Color = Color([255, 255, 255, 255]);
    pub const BLACK: Color = Color([0, 0, 0, 255]);
    pub const TRANSPARENT: Color = Color([0, 0, 0, 0]);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    /// Parse `#rrggbb` or `#rrggbbaa`. Returns `None` for anything else.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        match digits.len() {
            6 => Some(Self([channel(0)?, channel(2)?, channel(4)?, 255])),
            8 => Some(Self([channel(0)?, channel(2)?, channel(4)?, channel(6)?])),
            _ => None,
        }
    }

    /// Lowercase `#rrggbb` (alpha omitted when opaque)
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.0;
        if a == 255 {
            format!("#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
        }
    }

    /// Same color with a different alpha
    pub fn with_alpha(self, alpha: u8) -> Self {
        let [r, g, b, _] = self.0;
        Self([r, g, b, alpha])
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba(self.0)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color: {}", s)))
    }
}

// ============================================================================
// Modes & Tools
// ============================================================================

/// Top-level interaction mode. Exactly one is active at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Idle,
    Brush,
    Zoom,
    ColorSelect,
    Annotate,
}

impl Mode {
    /// Toolbar order, left to right
    pub const ALL: [Mode; 5] = [
        Mode::Idle,
        Mode::Brush,
        Mode::Zoom,
        Mode::ColorSelect,
        Mode::Annotate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Idle => "Idle",
            Mode::Brush => "Brush",
            Mode::Zoom => "Zoom",
            Mode::ColorSelect => "ColorSelect",
            Mode::Annotate => "Annotate",
        }
    }
}

/// Zoom-mode sub-state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoomMode {
    #[default]
    ZoomIn,
    ZoomOut,
    Move,
}

impl ZoomMode {
    pub const ALL: [ZoomMode; 3] = [ZoomMode::ZoomIn, ZoomMode::ZoomOut, ZoomMode::Move];
}

/// Shapes that can be drafted in Annotate mode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Rectangle,
    Triangle,
    Circle,
    Line,
}

impl ShapeKind {
    /// Shape button order, top to bottom
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Rectangle,
        ShapeKind::Triangle,
        ShapeKind::Circle,
        ShapeKind::Line,
    ];
}

/// The single active tool inside Annotate mode.
///
/// Shape drafting, marquee selection and the palm eraser are mutually
/// exclusive; a closed enum makes a second active tool unrepresentable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotateTool {
    #[default]
    None,
    Shape(ShapeKind),
    Selection,
    Eraser,
}

impl AnnotateTool {
    /// Active shape, if a shape tool is selected
    pub fn shape_mode(&self) -> Option<ShapeKind> {
        match self {
            AnnotateTool::Shape(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn selection_active(&self) -> bool {
        matches!(self, AnnotateTool::Selection)
    }

    pub fn eraser_active(&self) -> bool {
        matches!(self, AnnotateTool::Eraser)
    }
}
