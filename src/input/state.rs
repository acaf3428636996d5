//! Interaction state machines - one explicit enum per continuous gesture.
//!
//! Each continuous interaction (brush stroke, shape draft, marquee/float,
//! pan drag, camera drag) owns its own state enum instead of loose
//! `Option`s and flags, so that half-initialized combinations cannot exist.
//!
//! ## State Transitions
//!
//! ```text
//! Stroke:    Idle -> Drawing          (pinch with index+thumb only)
//!            Drawing -> Idle          (configuration breaks)
//! Draft:     Idle -> Drafting         (pinch start, shape tool active)
//!            Drafting -> Idle         (finalize or discard)
//! Selection: Idle -> Marquee          (pinky alone, nothing floating)
//!            Marquee -> Floating      (pinky released, box large enough)
//!            Marquee -> Idle          (pinky released, box too small)
//!            Floating -> Idle         (drag gesture ends, pixels committed)
//! Pan:       Idle -> Panning          (pinch in Move sub-mode)
//! Camera:    Idle -> Gesture|Pointer  (pinch or pointer-down inside overlay)
//! ```

use crate::types::{Point, Rect, ShapeKind};
use image::RgbaImage;

/// Brush stroke continuity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum StrokeState {
    #[default]
    Idle,
    /// Last stamped world point of the current stroke
    Drawing { last: Point },
}

impl StrokeState {
    pub fn last_point(&self) -> Option<Point> {
        match self {
            Self::Drawing { last } => Some(*last),
            Self::Idle => None,
        }
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::Drawing { .. })
    }

    pub fn reset(&mut self) {
        *self = Self::Idle;
    }
}

/// An in-progress shape sized by a pinch drag, in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeDraft {
    pub kind: ShapeKind,
    pub start: Point,
    pub end: Point,
}

impl ShapeDraft {
    pub fn new(kind: ShapeKind, at: Point) -> Self {
        Self {
            kind,
            start: at,
            end: at,
        }
    }

    /// Axis-aligned bounds of the draft
    pub fn bounds(&self) -> Rect {
        Rect::from_corners(self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DraftState {
    #[default]
    Idle,
    Drafting(ShapeDraft),
}

impl DraftState {
    pub fn draft(&self) -> Option<&ShapeDraft> {
        match self {
            Self::Drafting(draft) => Some(draft),
            Self::Idle => None,
        }
    }

    pub fn is_drafting(&self) -> bool {
        matches!(self, Self::Drafting(_))
    }

    /// Move the draft's end point. No-op without a draft.
    pub fn set_end(&mut self, end: Point) {
        if let Self::Drafting(draft) = self {
            draft.end = end;
        }
    }

    /// Take the draft out, leaving `Idle`
    pub fn take(&mut self) -> Option<ShapeDraft> {
        match std::mem::take(self) {
            Self::Drafting(draft) => Some(draft),
            Self::Idle => None,
        }
    }
}

/// Marquee selection and floating pixel block.
///
/// Exactly one of marquee or float may exist at a time.
#[derive(Debug, Clone, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    /// Marquee being dragged with the pinky, world coordinates
    Marquee { start: Point, end: Point },
    /// Lifted pixels held at `origin` (world top-left)
    Floating { pixels: RgbaImage, origin: Point },
}

impl SelectionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_marquee(&self) -> bool {
        matches!(self, Self::Marquee { .. })
    }

    pub fn is_floating(&self) -> bool {
        matches!(self, Self::Floating { .. })
    }

    pub fn start_marquee(&mut self, at: Point) {
        *self = Self::Marquee { start: at, end: at };
    }

    pub fn set_marquee_end(&mut self, at: Point) {
        if let Self::Marquee { end, .. } = self {
            *end = at;
        }
    }

    /// Bounds of the marquee or of the floating block, in world space
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Self::Idle => None,
            Self::Marquee { start, end } => Some(Rect::from_corners(*start, *end)),
            Self::Floating { pixels, origin } => Some(Rect::new(
                origin.x,
                origin.y,
                pixels.width() as f32,
                pixels.height() as f32,
            )),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::Idle;
    }
}

/// Zoom-mode pan drag anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum PanState {
    #[default]
    Idle,
    /// Pinch midpoint (screen) seen on the previous frame
    Panning { last: Point },
}

impl PanState {
    pub fn is_panning(&self) -> bool {
        matches!(self, Self::Panning { .. })
    }

    pub fn reset(&mut self) {
        *self = Self::Idle;
    }
}

/// Camera overlay drag, from either input path.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum CameraDrag {
    #[default]
    Idle,
    /// Pinch-drag; offset from overlay origin to fingertip
    Gesture { offset: Point },
    /// Pointer-drag; offset from overlay origin to pointer
    Pointer { offset: Point },
}

impl CameraDrag {
    pub fn is_dragging(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Self::Pointer { .. })
    }

    pub fn is_gesture(&self) -> bool {
        matches!(self, Self::Gesture { .. })
    }

    pub fn offset(&self) -> Option<Point> {
        match self {
            Self::Gesture { offset } | Self::Pointer { offset } => Some(*offset),
            Self::Idle => None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::Idle;
    }
}
