//! Hand tracker collaborator.
//!
//! The engine never talks to a camera or a landmark model directly. A
//! [`HandTracker`] hands it one [`TrackerFrame`] per video frame, after
//! signalling readiness. [`ReplayTracker`] plays back a recorded stream of
//! detection results, one JSON object per line:
//!
//! ```text
//! {"t_ms": 33, "hands": [{"landmarks": [{"x": 0.5, "y": 0.4, "z": -0.02}, ...]}]}
//! ```

use crate::error::{EngineError, EngineResult};
use crate::gesture::{HandSample, Landmark};
use image::RgbaImage;
use serde::Deserialize;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One processed video frame.
#[derive(Clone, Debug, Default)]
pub struct TrackerFrame {
    /// First detected hand, if any
    pub hand: Option<HandSample>,
    /// Camera image for the preview overlay
    pub image: Option<RgbaImage>,
    /// Capture time relative to stream start
    pub timestamp_ms: Option<u64>,
}

pub trait HandTracker {
    /// Acquire resources. The engine draws nothing until this succeeds.
    fn start(&mut self) -> EngineResult<()>;

    /// Release camera/model resources.
    fn stop(&mut self);

    fn is_ready(&self) -> bool;

    /// Next frame, or `None` when the stream has ended.
    fn next_frame(&mut self) -> Option<TrackerFrame>;
}

#[derive(Deserialize, Debug)]
struct HandJson {
    landmarks: Vec<Landmark>,
}

#[derive(Deserialize, Debug)]
struct DetectionResult {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    t_ms: Option<u64>,
}

/// Parse one recorded detection result.
///
/// A hand with the wrong number of landmarks is treated as no hand.
pub fn parse_detection_line(line: &str) -> EngineResult<TrackerFrame> {
    let result: DetectionResult = serde_json::from_str(line)?;
    let hand = result.hands.first().and_then(|h| {
        let sample = HandSample::from_slice(&h.landmarks);
        if sample.is_none() {
            warn!(count = h.landmarks.len(), "Ignoring hand with unexpected landmark count");
        }
        sample
    });
    Ok(TrackerFrame {
        hand,
        image: None,
        timestamp_ms: result.t_ms,
    })
}

/// Plays back recorded frames.
pub struct ReplayTracker {
    source: Option<PathBuf>,
    frames: VecDeque<TrackerFrame>,
    ready: bool,
}

impl ReplayTracker {
    /// Replay a JSON-lines recording. The file is read on [`start`](HandTracker::start).
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            source: Some(path.as_ref().to_path_buf()),
            frames: VecDeque::new(),
            ready: false,
        }
    }

    /// Replay in-memory frames.
    pub fn from_frames(frames: impl IntoIterator<Item = TrackerFrame>) -> Self {
        Self {
            source: None,
            frames: frames.into_iter().collect(),
            ready: false,
        }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    fn load(path: &Path) -> EngineResult<VecDeque<TrackerFrame>> {
        let reader = BufReader::new(File::open(path)?);
        let mut frames = VecDeque::new();
        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let frame = parse_detection_line(&line).map_err(|e| {
                EngineError::TrackerInit(format!("{}:{}: {}", path.display(), lineno + 1, e))
            })?;
            frames.push_back(frame);
        }
        Ok(frames)
    }
}

impl HandTracker for ReplayTracker {
    fn start(&mut self) -> EngineResult<()> {
        if let Some(path) = &self.source {
            self.frames = Self::load(path).map_err(|e| match e {
                EngineError::TrackerInit(_) => e,
                other => EngineError::TrackerInit(other.to_string()),
            })?;
            info!(path = %path.display(), frames = self.frames.len(), "Replay tracker loaded");
        }
        self.ready = true;
        Ok(())
    }

    fn stop(&mut self) {
        debug!(remaining = self.frames.len(), "Replay tracker stopped");
        self.ready = false;
        self.frames.clear();
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn next_frame(&mut self) -> Option<TrackerFrame> {
        if !self.ready {
            return None;
        }
        self.frames.pop_front()
    }
}
