//! Hand sample classification.
//!
//! A [`HandSample`] is 21 normalized landmarks as delivered by the tracker.
//! [`GestureClassifier::classify`] maps it to screen space and derives the
//! predicates the interpreters work from: finger extension, pinch, palm
//! center and fingertip positions.

use crate::constants::LANDMARK_COUNT;
use crate::input::coords::{distance, finger_up, landmark_to_screen};
use crate::settings::EngineSettings;
use crate::types::Point;
use serde::{Deserialize, Serialize};

/// Hand landmark indices (MediaPipe hand landmark model convention)
pub mod landmarks {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_MCP: usize = 5;
    pub const INDEX_FINGER_PIP: usize = 6;
    pub const INDEX_FINGER_DIP: usize = 7;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_MCP: usize = 9;
    pub const MIDDLE_FINGER_PIP: usize = 10;
    pub const MIDDLE_FINGER_DIP: usize = 11;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_MCP: usize = 13;
    pub const RING_FINGER_PIP: usize = 14;
    pub const RING_FINGER_DIP: usize = 15;
    pub const RING_FINGER_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

/// Bones of the hand skeleton, as landmark index pairs
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 4),
    (0, 5),
    (5, 6),
    (6, 7),
    (7, 8),
    (5, 9),
    (9, 10),
    (10, 11),
    (11, 12),
    (9, 13),
    (13, 14),
    (14, 15),
    (15, 16),
    (13, 17),
    (0, 17),
    (17, 18),
    (18, 19),
    (19, 20),
];

/// A single hand landmark in normalized image space
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// X coordinate (0.0 to 1.0, normalized to image width)
    pub x: f32,
    /// Y coordinate (0.0 to 1.0, normalized to image height)
    pub y: f32,
    /// Depth relative to the wrist
    #[serde(default)]
    pub z: f32,
}

/// One tracked hand for one video frame.
#[derive(Clone, Debug, PartialEq)]
pub struct HandSample {
    pub landmarks: [Landmark; LANDMARK_COUNT],
}

impl HandSample {
    pub fn new(landmarks: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { landmarks }
    }

    /// Build from a slice; `None` unless it holds exactly 21 landmarks.
    pub fn from_slice(landmarks: &[Landmark]) -> Option<Self> {
        let landmarks: [Landmark; LANDMARK_COUNT] = landmarks.try_into().ok()?;
        Some(Self { landmarks })
    }

    #[inline]
    pub fn get(&self, idx: usize) -> &Landmark {
        &self.landmarks[idx]
    }
}

/// Which fingers are extended this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Fingers {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl Fingers {
    /// Index and thumb up, the other three down
    pub fn only_index_thumb(&self) -> bool {
        self.index && self.thumb && !self.middle && !self.ring && !self.pinky
    }

    /// At least one of middle, ring or pinky is up
    pub fn any_confirm_finger(&self) -> bool {
        self.middle || self.ring || self.pinky
    }

    /// Open palm
    pub fn all_up(&self) -> bool {
        self.thumb && self.index && self.middle && self.ring && self.pinky
    }

    /// Pinky up with index, middle and ring down (thumb ignored)
    pub fn pinky_alone(&self) -> bool {
        self.pinky && !self.index && !self.middle && !self.ring
    }

    /// Pinky and index up with middle and ring down (thumb ignored)
    pub fn pinky_and_index(&self) -> bool {
        self.pinky && self.index && !self.middle && !self.ring
    }
}

/// Per-frame gesture predicates, in screen space.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureState {
    pub fingers: Fingers,
    pub index_tip: Point,
    pub thumb_tip: Point,
    pub pinky_tip: Point,
    pub palm_center: Point,
    pub hand_scale: f32,
    pub pinch: bool,
    /// All landmarks mapped to screen space, for the skeleton overlay
    pub points: [Point; LANDMARK_COUNT],
}

impl GestureState {
    /// Midpoint between index and thumb tips
    pub fn pinch_point(&self) -> Point {
        self.index_tip.midpoint(self.thumb_tip)
    }

    /// Pinch held with index and thumb both extended
    pub fn pinch_grip(&self) -> bool {
        self.pinch && self.fingers.index && self.fingers.thumb
    }
}

/// Converts hand samples into [`GestureState`]s.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureClassifier {
    pub pinch_ratio: f32,
    /// Max |z(index tip) - z(thumb tip)| for a pinch; `None` disables the check
    pub depth_threshold: Option<f32>,
    pub mirror: bool,
}

impl GestureClassifier {
    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self {
            pinch_ratio: settings.pinch_ratio_threshold,
            depth_threshold: settings.pinch_depth_threshold,
            mirror: settings.mirror,
        }
    }

    pub fn classify(&self, sample: &HandSample, width: f32, height: f32) -> GestureState {
        use landmarks::*;

        let lms = &sample.landmarks;
        let points: [Point; LANDMARK_COUNT] =
            std::array::from_fn(|i| landmark_to_screen(&lms[i], width, height, self.mirror));

        let fingers = Fingers {
            thumb: finger_up(&lms[THUMB_TIP], &lms[THUMB_MCP]),
            index: finger_up(&lms[INDEX_FINGER_TIP], &lms[INDEX_FINGER_PIP]),
            middle: finger_up(&lms[MIDDLE_FINGER_TIP], &lms[MIDDLE_FINGER_PIP]),
            ring: finger_up(&lms[RING_FINGER_TIP], &lms[RING_FINGER_PIP]),
            pinky: finger_up(&lms[PINKY_TIP], &lms[PINKY_PIP]),
        };

        let index_tip = points[INDEX_FINGER_TIP];
        let thumb_tip = points[THUMB_TIP];
        let hand_scale = distance(points[INDEX_FINGER_MCP], points[PINKY_MCP]);

        let close = distance(index_tip, thumb_tip) < hand_scale * self.pinch_ratio;
        let level = self
            .depth_threshold
            .is_none_or(|max| (lms[INDEX_FINGER_TIP].z - lms[THUMB_TIP].z).abs() < max);

        GestureState {
            fingers,
            index_tip,
            thumb_tip,
            pinky_tip: points[PINKY_TIP],
            palm_center: points[WRIST].midpoint(points[MIDDLE_FINGER_MCP]),
            hand_scale,
            pinch: close && level,
            points,
        }
    }
}
