//! Engine lifecycle - construction, tracker start/stop, resize and
//! settings reload.

use super::state::{CameraOverlay, CanvasState, Engine, HoverState, InteractionState, SystemState};
use crate::background::BackgroundExecutor;
use crate::error::{EngineError, EngineResult};
use crate::gesture::GestureClassifier;
use crate::input::transform::Viewport;
use crate::layers::LayerStore;
use crate::layout::Layout;
use crate::mode::ToolState;
use crate::observe::{EngineEvent, Readiness};
use crate::perf::PerfMonitor;
use crate::settings::{EngineSettings, SettingsEvent, SettingsWatcher};
use crate::tracker::HandTracker;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

impl Engine {
    /// Create an engine for a `width` x `height` canvas. Settings that fail
    /// validation are replaced by the defaults.
    pub fn new(settings: EngineSettings, width: u32, height: u32) -> Self {
        let settings = match settings.validate() {
            Ok(()) => settings,
            Err(e) => {
                warn!(error = %e, "Invalid engine settings, using defaults");
                EngineSettings::default()
            }
        };
        let (w, h) = (width as f32, height as f32);
        let cam = settings.camera_overlay;
        let mut overlay = CameraOverlay {
            x: cam.x,
            y: cam.y,
            width: cam.width,
            height: cam.height,
        };
        overlay.move_to(cam.x, cam.y, w, h);

        info!(width, height, "Creating gesture engine");

        Self {
            canvas: CanvasState {
                viewport: Viewport::with_range(settings.min_scale, settings.max_scale),
                layers: LayerStore::new(width, height, settings.background_color),
                layout: Layout::compute(w, h, settings.palette.len()),
                width,
                height,
            },
            interaction: InteractionState::default(),
            tools: ToolState::new(settings.brush_color, settings.brush_size),
            overlay,
            hover: HoverState::new(Duration::from_millis(settings.hover_dwell_ms)),
            system: SystemState {
                classifier: GestureClassifier::from_settings(&settings),
                settings,
                perf: PerfMonitor::new(),
                background: BackgroundExecutor::with_default_workers(),
                readiness: Readiness::Pending,
                events: Vec::new(),
                save_ticket: None,
                save_slot: Arc::new(Mutex::new(None)),
                settings_watcher: None,
                hand_visible: false,
                last_gesture: None,
                video_frame: None,
                last_frame_at: None,
            },
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.system.settings
    }

    /// Hit regions of the on-canvas buttons, for shells that draw their own
    pub fn layout(&self) -> &Layout {
        &self.canvas.layout
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        (self.canvas.width, self.canvas.height)
    }

    pub fn readiness(&self) -> &Readiness {
        &self.system.readiness
    }

    pub fn is_ready(&self) -> bool {
        self.system.readiness.is_ready()
    }

    /// Start the tracker. Frames are ignored until this succeeds.
    ///
    /// A failed start leaves the engine permanently not ready; the failure
    /// is reported once through [`EngineEvent::TrackerFailed`].
    pub fn start(&mut self, tracker: &mut dyn HandTracker) -> EngineResult<()> {
        match &self.system.readiness {
            Readiness::Ready => return Ok(()),
            Readiness::Failed(_) => return Err(EngineError::NotReady),
            Readiness::Pending => {}
        }

        match tracker.start() {
            Ok(()) => {
                info!("Hand tracker ready");
                self.system.readiness = Readiness::Ready;
                self.system.events.push(EngineEvent::TrackerReady);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Hand tracker failed to start");
                let message = e.to_string();
                self.system.readiness = Readiness::Failed(message.clone());
                self.system.events.push(EngineEvent::TrackerFailed(message));
                Err(e)
            }
        }
    }

    /// Stop the tracker and drop in-flight interaction state.
    ///
    /// Drafts and marquees are discarded, not stamped. A floating selection
    /// is written back so its pixels are not lost.
    pub fn stop(&mut self, tracker: &mut dyn HandTracker) {
        tracker.stop();
        self.commit_floating_selection();
        self.interaction = InteractionState::default();
        self.canvas.layers.clear_preview();
        self.hover.clear();
        self.system.last_gesture = None;
        self.system.video_frame = None;
        if self.system.hand_visible {
            self.system.hand_visible = false;
            self.system.events.push(EngineEvent::HandVisibilityChanged(false));
        }
        if self.system.readiness.is_ready() {
            self.system.readiness = Readiness::Pending;
        }
        info!("Engine stopped");
    }

    /// Resize the canvas. Existing pixels stay at the same origin.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) == (self.canvas.width, self.canvas.height) {
            return;
        }
        let (w, h) = (width as f32, height as f32);
        self.canvas.layers.resize(width, height);
        self.canvas.width = width;
        self.canvas.height = height;
        self.canvas.layout = Layout::compute(w, h, self.system.settings.palette.len());
        let origin = self.overlay.origin();
        self.overlay.move_to(origin.x, origin.y, w, h);
        self.interaction.stroke.reset();
        info!(width, height, "Canvas resized");
    }

    /// Watch `path` for settings changes; see [`check_settings_reload`](Self::check_settings_reload).
    pub fn watch_settings(&mut self, path: PathBuf) -> EngineResult<()> {
        self.system.settings_watcher = Some(SettingsWatcher::new(path)?);
        Ok(())
    }

    /// Apply a changed settings file, if the watcher saw one. Returns true
    /// when new settings were applied.
    pub fn check_settings_reload(&mut self) -> bool {
        let Some(watcher) = self.system.settings_watcher.as_mut() else {
            return false;
        };
        let mut reload = false;
        while let Some(event) = watcher.poll() {
            match event {
                SettingsEvent::Modified | SettingsEvent::Created => reload = true,
                SettingsEvent::Deleted => debug!("Settings file deleted, keeping current settings"),
                SettingsEvent::Error(e) => warn!(error = %e, "Settings watcher error"),
            }
        }
        if !reload {
            return false;
        }

        let path = watcher.path().to_path_buf();
        match EngineSettings::try_load_from(&path).and_then(|s| self.apply_settings(s)) {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring invalid settings file");
                false
            }
        }
    }

    /// Re-apply thresholds, timing, zoom range, palette and overlay size.
    /// Layers, mode and brush stay as they are. Invalid settings are
    /// rejected and the current ones kept.
    pub fn apply_settings(&mut self, settings: EngineSettings) -> EngineResult<()> {
        settings.validate()?;
        let (w, h) = (self.canvas.width as f32, self.canvas.height as f32);
        self.system.classifier = GestureClassifier::from_settings(&settings);
        self.hover.set_dwell(Duration::from_millis(settings.hover_dwell_ms));
        self.canvas
            .viewport
            .set_scale_range(settings.min_scale, settings.max_scale);
        if settings.palette.len() != self.system.settings.palette.len() {
            self.hover.palette.clear();
        }
        self.canvas.layout = Layout::compute(w, h, settings.palette.len());
        self.overlay.width = settings.camera_overlay.width;
        self.overlay.height = settings.camera_overlay.height;
        let origin = self.overlay.origin();
        self.overlay.move_to(origin.x, origin.y, w, h);
        self.system.settings = settings;
        self.system.events.push(EngineEvent::SettingsReloaded);
        info!("Settings applied");
        Ok(())
    }
}
