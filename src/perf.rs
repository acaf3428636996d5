//! Frame pipeline timing.
//!
//! Every processed frame is timed against the camera's frame budget, with
//! a rolling window per pipeline [`Stage`]. A frame over twice the budget
//! is logged together with the stages that cost the most. Extra scoped
//! timers are compiled in only with the `profiling` feature:
//!
//! ```ignore
//! use gesture_canvas::profile_scope;
//!
//! fn composite_frame(&mut self) {
//!     profile_scope!("composite");
//!     // ...
//! }
//! ```

use crate::constants::TARGET_FRAME_MS;
use std::collections::VecDeque;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Frames kept for the rolling frame-time window (3s at 30 FPS)
const FRAME_WINDOW: usize = 90;

/// Samples kept per stage
const STAGE_WINDOW: usize = 100;

/// A frame slower than this multiple of the budget is logged
const SLOW_FACTOR: f64 = 2.0;

/// Time the enclosing scope under `$name`. Compiles to nothing unless the
/// `profiling` feature is on.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        #[cfg(feature = "profiling")]
        let _timer = $crate::perf::ScopedTimer::new($name, 1.0);
        #[cfg(not(feature = "profiling"))]
        let _ = $name;
    };
    ($name:expr, $threshold_ms:expr) => {
        #[cfg(feature = "profiling")]
        let _timer = $crate::perf::ScopedTimer::new($name, $threshold_ms);
        #[cfg(not(feature = "profiling"))]
        let _ = ($name, $threshold_ms);
    };
}

pub use profile_scope;

/// Pipeline stages timed on every frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Landmarks to gesture predicates
    Classify,
    /// Hover groups and the active interpreters
    Interpret,
    /// Layer compositing and chrome
    Composite,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Classify, Stage::Interpret, Stage::Composite];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Classify => "classify",
            Stage::Interpret => "interpret",
            Stage::Composite => "composite",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Rolling window of durations, in milliseconds.
#[derive(Debug, Clone)]
pub struct TimingWindow {
    samples: VecDeque<f64>,
    capacity: usize,
    recorded: u64,
    peak_ms: f64,
}

impl TimingWindow {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            recorded: 0,
            peak_ms: 0.0,
        }
    }

    pub fn record(&mut self, ms: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(ms);
        self.recorded += 1;
        self.peak_ms = self.peak_ms.max(ms);
    }

    /// Samples recorded since creation, including evicted ones
    pub fn count(&self) -> u64 {
        self.recorded
    }

    pub fn average(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    /// 95th percentile over the window.
    pub fn p95(&self) -> f64 {
        let mut sorted: Vec<f64> = self.samples.iter().copied().collect();
        sorted.sort_by(f64::total_cmp);
        let idx = (sorted.len() as f64 * 0.95) as usize;
        sorted.get(idx.min(sorted.len().saturating_sub(1))).copied().unwrap_or(0.0)
    }

    /// Largest sample ever recorded
    pub fn peak(&self) -> f64 {
        self.peak_ms
    }

    fn clear(&mut self) {
        self.samples.clear();
        self.recorded = 0;
        self.peak_ms = 0.0;
    }
}

/// Aggregate frame timing, as logged by [`PerfMonitor::log_summary`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSummary {
    pub frames: u64,
    pub average_ms: f64,
    pub p95_ms: f64,
    pub peak_ms: f64,
    /// Share of all frames over the slow threshold, in percent
    pub slow_percent: f64,
}

impl FrameSummary {
    pub fn fps(&self) -> f64 {
        if self.average_ms <= 0.0 { 0.0 } else { 1000.0 / self.average_ms }
    }

    pub fn within_budget(&self) -> bool {
        self.average_ms <= TARGET_FRAME_MS
    }
}

/// Per-frame timing for the engine loop.
#[derive(Debug)]
pub struct PerfMonitor {
    frames: TimingWindow,
    stages: [TimingWindow; 3],
    frame_start: Option<Instant>,
    slow_frames: u64,
}

impl Default for PerfMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl PerfMonitor {
    pub fn new() -> Self {
        Self {
            frames: TimingWindow::with_capacity(FRAME_WINDOW),
            stages: std::array::from_fn(|_| TimingWindow::with_capacity(STAGE_WINDOW)),
            frame_start: None,
            slow_frames: 0,
        }
    }

    pub fn begin_frame(&mut self) {
        self.frame_start = Some(Instant::now());
    }

    /// Close the current frame. Returns its duration in milliseconds, or
    /// `None` without a matching [`begin_frame`](Self::begin_frame).
    pub fn end_frame(&mut self) -> Option<f64> {
        let ms = self.frame_start.take()?.elapsed().as_secs_f64() * 1000.0;
        self.frames.record(ms);
        if ms > TARGET_FRAME_MS * SLOW_FACTOR {
            self.slow_frames += 1;
            warn!(frame_ms = format!("{:.2}", ms), budget_ms = TARGET_FRAME_MS, "Slow frame");
            self.log_costliest_stages();
        }
        Some(ms)
    }

    pub fn record_stage(&mut self, stage: Stage, elapsed_ms: f64) {
        self.stages[stage.index()].record(elapsed_ms);
    }

    pub fn stage(&self, stage: Stage) -> &TimingWindow {
        &self.stages[stage.index()]
    }

    pub fn total_frames(&self) -> u64 {
        self.frames.count()
    }

    pub fn summary(&self) -> FrameSummary {
        let frames = self.frames.count();
        FrameSummary {
            frames,
            average_ms: self.frames.average(),
            p95_ms: self.frames.p95(),
            peak_ms: self.frames.peak(),
            slow_percent: if frames == 0 {
                0.0
            } else {
                self.slow_frames as f64 / frames as f64 * 100.0
            },
        }
    }

    /// Log the session's frame timing; at warn level when the average
    /// misses the budget.
    pub fn log_summary(&self) {
        let s = self.summary();
        if s.frames == 0 {
            return;
        }
        let avg = format!("{:.2}", s.average_ms);
        let fps = format!("{:.1}", s.fps());
        if s.within_budget() {
            info!(frames = s.frames, avg_ms = avg, fps = fps, "Frame timing");
        } else {
            warn!(
                frames = s.frames,
                avg_ms = avg,
                p95_ms = format!("{:.2}", s.p95_ms),
                slow_percent = format!("{:.1}", s.slow_percent),
                fps = fps,
                "Frame pipeline below target"
            );
        }
    }

    fn log_costliest_stages(&self) {
        let mut stages = Stage::ALL;
        stages.sort_by(|a, b| self.stage(*b).average().total_cmp(&self.stage(*a).average()));
        for stage in stages {
            let w = self.stage(stage);
            debug!(
                stage = stage.name(),
                avg_ms = format!("{:.2}", w.average()),
                p95_ms = format!("{:.2}", w.p95()),
                "Stage timing"
            );
        }
    }

    pub fn reset(&mut self) {
        self.frames.clear();
        self.stages.iter_mut().for_each(TimingWindow::clear);
        self.frame_start = None;
        self.slow_frames = 0;
    }
}

/// Warns on drop when its scope outlived `threshold_ms`.
pub struct ScopedTimer {
    name: &'static str,
    start: Instant,
    threshold_ms: f64,
}

impl ScopedTimer {
    pub fn new(name: &'static str, threshold_ms: f64) -> Self {
        Self {
            name,
            start: Instant::now(),
            threshold_ms,
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        let ms = self.elapsed_ms();
        if ms > self.threshold_ms {
            warn!(scope = self.name, elapsed_ms = format!("{:.2}", ms), "Slow scope");
        }
    }
}

/// Run `f`, returning its result and the elapsed milliseconds.
#[inline]
pub fn measure<T, F: FnOnce() -> T>(f: F) -> (T, f64) {
    let start = Instant::now();
    let result = f();
    (result, start.elapsed().as_secs_f64() * 1000.0)
}
