//! Frame orchestrator - the `Engine` struct and its per-frame pipeline.
//!
//! This module is organized into several submodules:
//! - `state` - The Engine struct definition and sub-structs
//! - `lifecycle` - Construction, tracker start/stop, resize, settings reload
//! - `controls` - Explicit setters for shells that drive the engine without gestures
//! - `frame` - Per-frame pipeline: classify, hover, interpret, composite
//! - `render` - Screen-space chrome: UI affordances, camera overlay, skeleton
//! - `save` - Snapshot export and background loading
//! - `inspect` - Hidden hooks for integration tests
//!
//! The action interpreters live in `crate::input` as further `impl Engine`
//! blocks.

mod state;
mod lifecycle;
mod controls;
mod frame;
mod render;
mod save;
mod inspect;

pub use frame::FrameReport;
pub use save::encode_image;
pub(crate) use frame::FrameContext;
pub use state::{CameraOverlay, Engine, HoverState, InteractionState, SystemState};
