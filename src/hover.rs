//! Dwell-to-confirm activation.
//!
//! A [`HoverGroup`] tracks one timer per candidate in a group of mutually
//! exclusive buttons. A candidate's timer runs only while the fingertip stays
//! inside its region with the trigger finger extended; the first frame that
//! breaks either condition drops it. Once a timer has run for the dwell
//! duration the candidate fires and every timer in the group is cleared.
//!
//! Time comes from the caller (one monotonic sample per frame), so firing
//! is frame-locked.

use crate::types::{Mode, ShapeKind, ZoomMode};
use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Any hover-activatable button, across all groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum HoverTarget {
    Toolbar(Mode),
    Zoom(ZoomMode),
    Shape(ShapeKind),
    Erase,
    Selection,
    Swatch(usize),
}

/// Dwell progress of one candidate, in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HoverProgress {
    pub target: HoverTarget,
    pub fraction: f32,
}

#[derive(Debug, Clone)]
pub struct HoverGroup<K> {
    dwell: Duration,
    timers: HashMap<K, Instant>,
    paused_at: Option<Instant>,
}

impl<K: Copy + Eq + Hash> HoverGroup<K> {
    pub fn new(dwell: Duration) -> Self {
        Self {
            dwell,
            timers: HashMap::new(),
            paused_at: None,
        }
    }

    pub fn dwell(&self) -> Duration {
        self.dwell
    }

    pub fn set_dwell(&mut self, dwell: Duration) {
        self.dwell = dwell;
    }

    /// Advance `id`'s timer for this frame. Returns true when it fires.
    pub fn evaluate(&mut self, id: K, inside: bool, trigger: bool, now: Instant) -> bool {
        if !(inside && trigger) {
            self.timers.remove(&id);
            return false;
        }
        match self.timers.get(&id) {
            None => {
                self.timers.insert(id, now);
                false
            }
            Some(start) if now.saturating_duration_since(*start) >= self.dwell => {
                self.timers.clear();
                true
            }
            Some(_) => false,
        }
    }

    /// Elapsed fraction of `id`'s dwell, if its timer is running
    pub fn progress(&self, id: K, now: Instant) -> Option<f32> {
        let start = self.timers.get(&id)?;
        let now = self.paused_at.unwrap_or(now);
        if self.dwell.is_zero() {
            return Some(1.0);
        }
        let elapsed = now.saturating_duration_since(*start);
        Some((elapsed.as_secs_f32() / self.dwell.as_secs_f32()).min(1.0))
    }

    /// Every running timer with its progress
    pub fn running(&self, now: Instant) -> Vec<(K, f32)> {
        self.timers
            .keys()
            .filter_map(|id| self.progress(*id, now).map(|p| (*id, p)))
            .collect()
    }

    pub fn is_running(&self, id: K) -> bool {
        self.timers.contains_key(&id)
    }

    /// Stop the clock while no hand is visible.
    pub fn pause(&mut self, now: Instant) {
        if self.paused_at.is_none() {
            self.paused_at = Some(now);
        }
    }

    /// Restart the clock, shifting every timer by the paused span.
    pub fn resume(&mut self, now: Instant) {
        if let Some(paused_at) = self.paused_at.take() {
            let gap = now.saturating_duration_since(paused_at);
            for start in self.timers.values_mut() {
                *start += gap;
            }
        }
    }

    pub fn clear(&mut self) {
        self.timers.clear();
        self.paused_at = None;
    }
}
