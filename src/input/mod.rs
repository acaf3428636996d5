//! Gesture input handling for the canvas.
//!
//! This module turns classified hand gestures into canvas operations.
//!
//! ## Architecture
//!
//! Each continuous interaction keeps an explicit state machine (see
//! `state`) on the engine, and each action interpreter is an `impl Engine`
//! block that reads the frame's `GestureState` and advances exactly the
//! state it owns.
//!
//! ## Modules
//!
//! - `coords` - Distance, finger-up, hit tests, screen/world mapping
//! - `transform` - Viewport pan/zoom
//! - `state` - Interaction state enums
//! - `brush` - Brush strokes and the Brush-mode palm eraser
//! - `eraser` - Palm eraser shared by Brush and Annotate
//! - `shapes` - Shape drafting and stamping
//! - `selection` - Marquee, lift, drag and commit
//! - `palette` - Swatch picking in ColorSelect mode
//! - `zoom` - Zoom sub-mode buttons, zoom and pan gestures
//! - `camera` - Camera overlay drag, by pinch or pointer

pub mod coords;
pub mod state;
pub mod transform;
mod brush;
mod eraser;
mod shapes;
mod selection;
mod palette;
mod zoom;
mod camera;

pub use camera::PointerCursor;
pub use shapes::draw_shape;
pub use state::{CameraDrag, DraftState, PanState, SelectionState, ShapeDraft, StrokeState};
pub use transform::Viewport;
