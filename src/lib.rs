//! Gesture interaction engine.
//!
//! Hand-landmark frames in, painted raster canvas out. A [`HandTracker`]
//! supplies one [`HandSample`] per video frame; [`Engine::process_frame`]
//! classifies it, runs the dwell buttons and the active mode's interpreter,
//! and recomposites the canvas. Exports go to a [`CanvasStorage`].

pub mod background;
pub mod constants;
pub mod engine;
pub mod error;
pub mod gesture;
pub mod hover;
pub mod input;
pub(crate) mod layers;
pub mod layout;
pub mod mode;
pub mod observe;
pub mod perf;
pub mod raster;
pub mod settings;
pub mod storage;
pub mod tracker;
pub mod types;

pub use engine::{Engine, FrameReport};
pub use error::{EngineError, EngineResult};
pub use gesture::{GestureClassifier, GestureState, HandSample, Landmark};
pub use observe::{EngineEvent, Readiness, SaveOutcome, ShellState};
pub use settings::EngineSettings;
pub use storage::{BackgroundPayload, CanvasStorage, DirectoryStorage};
pub use tracker::{HandTracker, ReplayTracker, TrackerFrame};
pub use types::{AnnotateTool, Color, Mode, Point, Rect, ShapeKind, ZoomMode};
