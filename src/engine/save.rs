//! Export and background loading.
//!
//! A save copies background and drawing into a standalone image on the
//! frame thread, then encodes it and hands it to storage on a worker. The
//! canvas keeps changing every frame, so nothing after the copy reads the
//! live layers.

use super::state::Engine;
use crate::error::{EngineError, EngineResult};
use crate::layers::BackgroundSource;
use crate::observe::{EngineEvent, SaveOutcome, ShellState};
use crate::raster;
use crate::settings::ExportFormat;
use crate::storage::{CanvasStorage, decode_data_url, is_data_url};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, RgbaImage};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Encode a flattened canvas. JPEG drops alpha.
pub fn encode_image(image: &RgbaImage, format: ExportFormat) -> EngineResult<Vec<u8>> {
    let mut bytes = Vec::new();
    match format {
        ExportFormat::Jpeg { quality } => {
            let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100)))
                .map_err(|e| EngineError::Encode(e.to_string()))?;
        }
        ExportFormat::Png => {
            image
                .write_with_encoder(PngEncoder::new(&mut bytes))
                .map_err(|e| EngineError::Encode(e.to_string()))?;
        }
    }
    Ok(bytes)
}

impl Engine {
    /// Flattened background + drawing at identity transform. Preview,
    /// selection and chrome are excluded.
    ///
    /// A restricted background is re-derived from its `data:` source, or
    /// replaced by the solid background color.
    pub fn export_snapshot(&self) -> RgbaImage {
        let layers = &self.canvas.layers;
        match layers.background_source() {
            BackgroundSource::Image {
                restricted: true,
                source_url,
            } => {
                let fill = self.system.settings.background_color;
                let mut base = RgbaImage::new(self.canvas.width, self.canvas.height);
                match source_url.as_deref().map(rederive_background) {
                    Some(Ok(image)) => {
                        debug!("Re-derived restricted background from its data URL");
                        raster::draw_fitted(&mut base, &image, fill);
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "Restricted background unreadable, exporting solid color");
                        raster::fill_all(&mut base, fill);
                    }
                    None => {
                        warn!("Restricted background has no source, exporting solid color");
                        raster::fill_all(&mut base, fill);
                    }
                }
                layers.flatten_over(base)
            }
            _ => layers.flatten(),
        }
    }

    /// Start an export of the current canvas under `name`.
    ///
    /// Returns a ticket identifying the save; the outcome arrives later as
    /// [`EngineEvent::SaveFinished`]. Only one save runs at a time.
    pub fn request_save(
        &mut self,
        storage: Arc<dyn CanvasStorage>,
        name: &str,
    ) -> EngineResult<String> {
        if self.system.save_ticket.is_some() {
            return Err(EngineError::SaveInProgress);
        }

        let snapshot = self.export_snapshot();
        let format = self.system.settings.export_format;
        let name = export_file_name(name, format);
        let ticket = Uuid::new_v4().to_string();
        info!(ticket = %ticket, name = %name, "Save started");

        self.system.save_ticket = Some(ticket.clone());
        self.system.events.push(EngineEvent::SaveStarted {
            ticket: ticket.clone(),
        });

        let slot = Arc::clone(&self.system.save_slot);
        let export_name = name.clone();
        let outcome_ticket = ticket.clone();
        self.system.background.spawn(
            "export_canvas",
            move || {
                let bytes = encode_image(&snapshot, format).map_err(|e| e.to_string())?;
                storage
                    .export_composite(&bytes, &export_name)
                    .map_err(|e| e.to_string())
            },
            move |result| {
                *slot.lock() = Some(SaveOutcome {
                    ticket: outcome_ticket,
                    name,
                    result,
                });
            },
        );
        Ok(ticket)
    }

    pub fn save_in_progress(&self) -> bool {
        self.system.save_ticket.is_some()
    }

    /// Run finished background callbacks and publish save outcomes.
    /// Called at the start of every frame.
    pub fn poll_background(&mut self) {
        self.system.background.process_results();
        let finished = self.system.save_slot.lock().take();
        if let Some(outcome) = finished {
            match &outcome.result {
                Ok(()) => info!(ticket = %outcome.ticket, name = %outcome.name, "Save finished"),
                Err(e) => warn!(ticket = %outcome.ticket, error = %e, "Save failed"),
            }
            self.system.save_ticket = None;
            self.system.events.push(EngineEvent::SaveFinished(outcome));
        }
    }

    /// Block until the in-flight save completes or `timeout` passes.
    /// Returns true when no save is left running.
    pub fn wait_for_save(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            self.poll_background();
            if !self.save_in_progress() {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    /// Draw the canvas background from storage, falling back to the solid
    /// background color. Never fails.
    pub fn load_background(&mut self, storage: &dyn CanvasStorage, canvas_id: &str) {
        let fill = self.system.settings.background_color;
        let payload = match storage.load_background_image(canvas_id) {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                debug!(canvas_id, "No background image, using solid color");
                self.canvas.layers.set_solid_background(fill);
                return;
            }
            Err(e) => {
                self.background_fallback(e.to_string());
                return;
            }
        };

        match image::load_from_memory(&payload.bytes) {
            Ok(image) => {
                self.canvas.layers.set_image_background(
                    &image.to_rgba8(),
                    fill,
                    payload.source_url,
                    payload.restricted,
                );
                info!(canvas_id, restricted = payload.restricted, "Background loaded");
                self.system.events.push(EngineEvent::BackgroundLoaded);
            }
            Err(e) => self.background_fallback(e.to_string()),
        }
    }

    fn background_fallback(&mut self, reason: String) {
        warn!(reason = %reason, "Background unavailable, using solid color");
        let fill = self.system.settings.background_color;
        self.canvas.layers.set_solid_background(fill);
        self.system.events.push(EngineEvent::BackgroundFallback(reason));
    }

    /// Read-only view for the shell.
    pub fn shell_state(&self) -> ShellState {
        ShellState {
            mode: self.tools.mode(),
            zoom_mode: self.tools.zoom_mode(),
            annotate_tool: self.tools.annotate_tool(),
            brush_color: self.tools.brush_color(),
            brush_size: self.tools.brush_size(),
            hand_visible: self.system.hand_visible,
            hover: self
                .system
                .last_frame_at
                .map(|now| self.hover.progress(now))
                .unwrap_or_default(),
            save_in_progress: self.save_in_progress(),
            readiness: self.system.readiness.clone(),
        }
    }

    /// Take every pending change notification, oldest first.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.system.events)
    }

    /// The presented frame
    pub fn composite(&self) -> &RgbaImage {
        self.canvas.layers.composite()
    }
}

/// Append the format's extension unless `name` already ends in an image
/// extension. `v1.2` becomes `v1.2.jpg`; `shot.PNG` is kept.
fn export_file_name(name: &str, format: ExportFormat) -> String {
    let has_image_ext = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)));
    if has_image_ext {
        name.to_string()
    } else {
        format!("{}.{}", name, format.extension())
    }
}

fn rederive_background(url: &str) -> EngineResult<RgbaImage> {
    if !is_data_url(url) {
        return Err(EngineError::MalformedBackground(format!(
            "cannot re-read {}",
            url.split(':').next().unwrap_or("url")
        )));
    }
    let bytes = decode_data_url(url)?;
    Ok(image::load_from_memory(&bytes)?.to_rgba8())
}
