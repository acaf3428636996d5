//! Replay a recorded landmark stream through the engine and export the
//! resulting canvas.
//!
//! ```text
//! gesture-canvas <samples.jsonl> [out-dir]
//! ```

use anyhow::{Context, Result, bail};
use gesture_canvas::settings::default_settings_path;
use gesture_canvas::{
    DirectoryStorage, Engine, EngineEvent, EngineSettings, HandTracker, ReplayTracker,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const CANVAS_SIZE: (u32, u32) = (1280, 720);
const FRAME_INTERVAL: Duration = Duration::from_millis(33);
const SAVE_TIMEOUT: Duration = Duration::from_secs(30);

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gesture_canvas=info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let Some(samples) = args.next() else {
        bail!("usage: gesture-canvas <samples.jsonl> [out-dir]");
    };
    let out_dir = match args.next() {
        Some(dir) => PathBuf::from(dir),
        None => DirectoryStorage::default_root().context("no data directory available")?,
    };

    let settings = EngineSettings::load();
    let mut engine = Engine::new(settings, CANVAS_SIZE.0, CANVAS_SIZE.1);
    if let Some(path) = default_settings_path().filter(|p| p.exists()) {
        if let Err(e) = engine.watch_settings(path) {
            warn!(error = %e, "Settings hot-reload unavailable");
        }
    }

    let mut tracker = ReplayTracker::open(&samples);
    engine
        .start(&mut tracker)
        .with_context(|| format!("failed to start replay of {}", samples))?;

    let storage = Arc::new(DirectoryStorage::new(&out_dir));
    engine.load_background(storage.as_ref(), "replay");

    let start = Instant::now();
    let mut frames: u32 = 0;
    while let Some(frame) = tracker.next_frame() {
        let now = start
            + frame
                .timestamp_ms
                .map(Duration::from_millis)
                .unwrap_or(FRAME_INTERVAL * frames);
        let report = engine.process_frame(frame.hand.as_ref(), frame.image, now);
        if !report.fired.is_empty() {
            debug!(frame = frames, fired = ?report.fired, "Hover activations");
        }
        engine.check_settings_reload();
        frames += 1;
    }
    info!(frames, "Replay finished");

    engine.request_save(storage, "replay")?;
    if !engine.wait_for_save(SAVE_TIMEOUT) {
        bail!("export did not finish within {:?}", SAVE_TIMEOUT);
    }
    for event in engine.drain_events() {
        if let EngineEvent::SaveFinished(outcome) = event {
            if let Err(e) = outcome.result {
                bail!("export failed: {}", e);
            }
            info!(path = %out_dir.join("exports").join(&outcome.name).display(), "Canvas saved");
        }
    }

    engine.stop(&mut tracker);
    engine.system.perf.log_summary();
    Ok(())
}
