//! Per-frame pipeline.
//!
//! ```text
//! HandSample -> GestureState -> camera drag -> toolbar hover
//!            -> annotate buttons -> zoom buttons + zoom/pan
//!            -> brush + palm eraser -> annotate eraser
//!            -> shape draft -> selection -> palette
//!            -> composite -> chrome
//! ```
//!
//! A frame without a hand freezes every drag and draw state and pauses the
//! dwell timers; only the composite is rebuilt.

use super::state::Engine;
use crate::gesture::{GestureState, HandSample};
use crate::hover::HoverTarget;
use crate::input::coords::point_in_rect;
use crate::observe::EngineEvent;
use crate::perf::{Stage, measure};
use crate::tracker::HandTracker;
use crate::types::{AnnotateTool, Mode, Point};
use image::RgbaImage;
use std::time::Instant;
use tracing::{debug, trace};

/// What one frame did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub hand_visible: bool,
    /// Hover candidates that fired this frame, in pipeline order
    pub fired: Vec<HoverTarget>,
    /// The persistent drawing layer was modified
    pub drawing_changed: bool,
}

/// Per-frame scratch shared by the interpreters.
pub(crate) struct FrameContext {
    pub now: Instant,
    /// Index fingertip was inside the camera overlay when the frame began
    pub in_camera: bool,
    /// Palm eraser position this frame, screen space
    pub eraser_cursor: Option<Point>,
    pub report: FrameReport,
}

impl FrameContext {
    pub fn fired(&mut self, engine: &mut Engine, target: HoverTarget) {
        debug!(target = ?target, "Hover activation fired");
        engine.system.events.push(EngineEvent::HoverFired(target));
        self.report.fired.push(target);
    }
}

impl Engine {
    /// Advance the engine by one video frame.
    ///
    /// `now` must come from a monotonic clock sampled once per frame; all
    /// dwell timing is derived from it. Frames are ignored until the
    /// tracker is ready.
    pub fn process_frame(
        &mut self,
        hand: Option<&HandSample>,
        image: Option<RgbaImage>,
        now: Instant,
    ) -> FrameReport {
        if !self.system.readiness.is_ready() {
            trace!("Frame ignored, tracker not ready");
            return FrameReport::default();
        }
        self.system.perf.begin_frame();
        self.poll_background();

        if let Some(image) = image {
            self.system.video_frame = Some(image);
        }
        self.system.last_frame_at = Some(now);

        let mut ctx = FrameContext {
            now,
            in_camera: false,
            eraser_cursor: None,
            report: FrameReport {
                hand_visible: hand.is_some(),
                ..FrameReport::default()
            },
        };
        self.set_hand_visible(hand.is_some());

        match hand {
            Some(sample) => {
                self.hover.resume(now);
                let (w, h) = (self.canvas.width as f32, self.canvas.height as f32);
                let (gesture, classify_ms) =
                    measure(|| self.system.classifier.classify(sample, w, h));
                self.system.perf.record_stage(Stage::Classify, classify_ms);

                let (_, interpret_ms) = measure(|| self.interpret(&gesture, &mut ctx));
                self.system.perf.record_stage(Stage::Interpret, interpret_ms);
                self.system.last_gesture = Some(gesture);
            }
            None => {
                self.hover.pause(now);
                self.system.last_gesture = None;
            }
        }

        let (_, composite_ms) = measure(|| self.composite_frame(ctx.eraser_cursor));
        self.system.perf.record_stage(Stage::Composite, composite_ms);
        self.system.perf.end_frame();

        ctx.report
    }

    /// Pull one frame from `tracker` and process it. `None` once the
    /// stream has ended.
    pub fn run_tracker_frame(
        &mut self,
        tracker: &mut dyn HandTracker,
        now: Instant,
    ) -> Option<FrameReport> {
        let frame = tracker.next_frame()?;
        Some(self.process_frame(frame.hand.as_ref(), frame.image, now))
    }

    fn set_hand_visible(&mut self, visible: bool) {
        if self.system.hand_visible != visible {
            self.system.hand_visible = visible;
            self.system.events.push(EngineEvent::HandVisibilityChanged(visible));
        }
    }

    fn interpret(&mut self, g: &GestureState, ctx: &mut FrameContext) {
        ctx.in_camera = self.overlay.contains(g.index_tip);

        self.update_camera_gesture(g);
        self.update_toolbar_hover(g, ctx);

        if self.tools.mode() == Mode::Annotate {
            self.update_annotate_hover(g, ctx);
        } else {
            self.hover.shapes.clear();
            self.hover.erase.clear();
            self.hover.selection.clear();
        }

        if self.tools.mode() == Mode::Zoom {
            self.update_zoom(g, ctx);
        } else {
            self.hover.zoom.clear();
            self.interaction.pan.reset();
        }

        self.update_brush(g, ctx);
        self.update_annotate_eraser(g, ctx);
        self.update_shape_draft(g, ctx);
        self.update_selection(g, ctx);

        if self.tools.mode() == Mode::ColorSelect {
            self.update_palette(g, ctx);
        } else {
            self.hover.palette.clear();
        }
    }

    /// Top toolbar: one dwell group across every mode button.
    fn update_toolbar_hover(&mut self, g: &GestureState, ctx: &mut FrameContext) {
        let tip = g.index_tip;
        let buttons = self.canvas.layout.toolbar.clone();
        for (mode, rect) in buttons {
            let inside = point_in_rect(tip, &rect) && !ctx.in_camera;
            if self.hover.toolbar.evaluate(mode, inside, g.fingers.index, ctx.now) {
                ctx.fired(self, HoverTarget::Toolbar(mode));
                self.switch_mode(mode);
            }
        }
    }

    /// Shape, erase and selection buttons, shown only in Annotate mode.
    fn update_annotate_hover(&mut self, g: &GestureState, ctx: &mut FrameContext) {
        let tip = g.index_tip;
        let trigger = g.fingers.index;

        let shapes = self.canvas.layout.shapes.clone();
        for (kind, rect) in shapes {
            let inside = point_in_rect(tip, &rect);
            if self.hover.shapes.evaluate(kind, inside, trigger, ctx.now) {
                ctx.fired(self, HoverTarget::Shape(kind));
                self.switch_annotate_tool(AnnotateTool::Shape(kind));
            }
        }

        let erase = self.canvas.layout.erase;
        if self.hover.erase.evaluate((), point_in_rect(tip, &erase), trigger, ctx.now) {
            ctx.fired(self, HoverTarget::Erase);
            self.switch_annotate_tool(AnnotateTool::Eraser);
        }

        let selection = self.canvas.layout.selection;
        if self
            .hover
            .selection
            .evaluate((), point_in_rect(tip, &selection), trigger, ctx.now)
        {
            ctx.fired(self, HoverTarget::Selection);
            self.switch_annotate_tool(AnnotateTool::Selection);
        }
    }
}
