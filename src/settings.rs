//! Engine configuration.
//!
//! Settings are read from `<config_dir>/gesture-canvas/settings.json`. Every
//! field has a default, so a partial file only overrides what it names. A
//! missing or unparseable file yields the defaults and a logged warning.

use crate::constants::*;
use crate::error::{EngineError, EngineResult};
use crate::types::Color;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, TryRecvError, channel};
use tracing::{debug, info, warn};

/// Placement and size of the picture-in-picture camera preview.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraOverlaySettings {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for CameraOverlaySettings {
    fn default() -> Self {
        Self {
            x: CAMERA_OVERLAY_ORIGIN.0,
            y: CAMERA_OVERLAY_ORIGIN.1,
            width: CAMERA_OVERLAY_WIDTH,
            height: CAMERA_OVERLAY_HEIGHT,
        }
    }
}

/// Encoding used for exported canvases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExportFormat {
    Jpeg { quality: u8 },
    Png,
}

impl Default for ExportFormat {
    fn default() -> Self {
        ExportFormat::Jpeg {
            quality: EXPORT_JPEG_QUALITY,
        }
    }
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Jpeg { .. } => "jpg",
            ExportFormat::Png => "png",
        }
    }
}

/// User-tunable engine settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub pinch_ratio_threshold: f32,
    /// `None` disables depth gating of the pinch test.
    pub pinch_depth_threshold: Option<f32>,
    /// Mirror landmarks horizontally for a selfie view.
    pub mirror: bool,
    pub hover_dwell_ms: u64,
    pub zoom_step: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    pub eraser_radius: f32,
    pub brush_size: f32,
    pub brush_color: Color,
    pub palette: Vec<Color>,
    pub background_color: Color,
    pub camera_overlay: CameraOverlaySettings,
    pub min_selection_size: f32,
    pub export_format: ExportFormat,
    pub show_skeleton: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            pinch_ratio_threshold: PINCH_RATIO_THRESHOLD,
            pinch_depth_threshold: Some(PINCH_DEPTH_THRESHOLD),
            mirror: true,
            hover_dwell_ms: HOVER_DWELL_MS,
            zoom_step: ZOOM_STEP,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            eraser_radius: ERASER_RADIUS,
            brush_size: DEFAULT_BRUSH_SIZE,
            brush_color: Color::from_hex(DEFAULT_BRUSH_COLOR).unwrap_or(Color::BLACK),
            palette: PALETTE_COLORS
                .iter()
                .filter_map(|hex| Color::from_hex(hex))
                .collect(),
            background_color: Color::from_hex(DEFAULT_BACKGROUND_COLOR).unwrap_or(Color::WHITE),
            camera_overlay: CameraOverlaySettings::default(),
            min_selection_size: MIN_SELECTION_SIZE,
            export_format: ExportFormat::default(),
            show_skeleton: true,
        }
    }
}

impl EngineSettings {
    /// Load from the default location, falling back to defaults.
    pub fn load() -> Self {
        match default_settings_path() {
            Some(path) => Self::load_from(&path),
            None => {
                warn!("No config directory available, using default settings");
                Self::default()
            }
        }
    }

    /// Load from `path`, falling back to defaults when the file is missing
    /// or malformed.
    pub fn load_from(path: &Path) -> Self {
        match Self::try_load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                if path.exists() {
                    warn!(path = %path.display(), error = %e, "Failed to load settings, using defaults");
                } else {
                    debug!(path = %path.display(), "No settings file, using defaults");
                }
                Self::default()
            }
        }
    }

    /// Strict variant of [`load_from`](Self::load_from).
    pub fn try_load_from(path: &Path) -> EngineResult<Self> {
        let content = fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> EngineResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!(path = %path.display(), "Settings saved");
        Ok(())
    }

    /// Reject values that would break engine invariants.
    pub fn validate(&self) -> EngineResult<()> {
        if !(self.min_scale > 0.0 && self.min_scale <= self.max_scale) {
            return Err(EngineError::Settings(format!(
                "invalid scale range [{}, {}]",
                self.min_scale, self.max_scale
            )));
        }
        if self.zoom_step <= 1.0 {
            return Err(EngineError::Settings(format!(
                "zoom_step must be greater than 1, got {}",
                self.zoom_step
            )));
        }
        if self.pinch_ratio_threshold <= 0.0 {
            return Err(EngineError::Settings(
                "pinch_ratio_threshold must be positive".to_string(),
            ));
        }
        if self.camera_overlay.width <= 0.0 || self.camera_overlay.height <= 0.0 {
            return Err(EngineError::Settings(
                "camera overlay must have a positive size".to_string(),
            ));
        }
        Ok(())
    }
}

/// Default settings file location.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("gesture-canvas").join("settings.json"))
}

// ============================================================================
// Hot Reload
// ============================================================================

/// Change observed on the settings file.
#[derive(Debug)]
pub enum SettingsEvent {
    Modified,
    Created,
    Deleted,
    Error(String),
}

/// Watches the settings file and reports changes without blocking.
pub struct SettingsWatcher {
    path: PathBuf,
    // Dropping the watcher stops the notification thread.
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
}

impl SettingsWatcher {
    /// Watch `path`. The parent directory is watched so that editors that
    /// replace the file atomically are still picked up.
    pub fn new(path: PathBuf) -> EngineResult<Self> {
        let (tx, rx) = channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })
        .map_err(|e| EngineError::Settings(e.to_string()))?;

        let target = path
            .parent()
            .filter(|p| p.exists())
            .unwrap_or(path.as_path())
            .to_path_buf();
        watcher
            .watch(&target, RecursiveMode::NonRecursive)
            .map_err(|e| EngineError::Settings(e.to_string()))?;
        debug!(path = %path.display(), "Watching settings file");

        Ok(Self {
            path,
            _watcher: watcher,
            rx,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Next pending change to the settings file, if any.
    pub fn poll(&mut self) -> Option<SettingsEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(Ok(event)) => {
                    if !event.paths.iter().any(|p| p == &self.path) {
                        continue;
                    }
                    match event.kind {
                        EventKind::Create(_) => return Some(SettingsEvent::Created),
                        EventKind::Modify(_) => return Some(SettingsEvent::Modified),
                        EventKind::Remove(_) => return Some(SettingsEvent::Deleted),
                        _ => continue,
                    }
                }
                Ok(Err(e)) => return Some(SettingsEvent::Error(e.to_string())),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return None,
            }
        }
    }
}
