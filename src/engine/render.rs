//! Screen-space chrome drawn over the composited canvas: eraser cursor,
//! hand skeleton, camera overlay and the dwell buttons with their progress
//! bars.

use super::state::Engine;
use crate::gesture::HAND_CONNECTIONS;
use crate::hover::HoverTarget;
use crate::profile_scope;
use crate::raster;
use crate::types::{AnnotateTool, Color, Mode, Point, Rect};
use image::{RgbaImage, imageops};

const BUTTON_FILL: Color = Color::rgba(30, 30, 30, 170);
const BUTTON_ACTIVE: Color = Color::rgba(6, 214, 160, 220);
const BUTTON_BORDER: Color = Color::rgba(255, 255, 255, 200);
const PROGRESS: Color = Color::rgba(255, 209, 102, 255);
const PROGRESS_HEIGHT: f32 = 4.0;

const ERASER_STROKE: Color = Color::rgba(255, 50, 50, 204);
const ERASER_FILL: Color = Color::rgba(255, 50, 50, 51);

const SKELETON_BONE: Color = Color::rgba(0, 255, 136, 255);
const SKELETON_JOINT: Color = Color::rgba(255, 68, 68, 255);

const CAMERA_BORDER: Color = Color::rgba(255, 255, 255, 204);
const CAMERA_TITLE: Color = Color::rgba(0, 0, 0, 77);
const CAMERA_BACKDROP: Color = Color::rgba(0, 0, 0, 255);

impl Engine {
    /// Rebuild the composite for this frame.
    pub(crate) fn composite_frame(&mut self, eraser_cursor: Option<Point>) {
        profile_scope!("composite");
        self.canvas.layers.recomposite(
            &self.canvas.viewport,
            self.interaction.draft.is_drafting(),
            &self.interaction.selection,
        );

        if let Some(center) = eraser_cursor {
            let radius = self.system.settings.eraser_radius;
            let composite = self.canvas.layers.composite_mut();
            raster::stroke_circle(composite, center, radius, 3.0, ERASER_STROKE);
            raster::fill_circle(composite, center, radius, ERASER_FILL);
        }

        if self.system.settings.show_skeleton {
            self.draw_skeleton();
        }
        self.draw_camera_overlay();
        self.draw_ui();
    }

    fn draw_skeleton(&mut self) {
        let Some(gesture) = self.system.last_gesture.as_ref() else {
            return;
        };
        let composite = self.canvas.layers.composite_mut();
        draw_hand(composite, &gesture.points, 2.0, 1.8);
    }

    fn draw_camera_overlay(&mut self) {
        let rect = self.overlay.rect();
        let (w, h) = (self.canvas.width as f32, self.canvas.height as f32);
        let mirror = self.system.settings.mirror;
        let composite = self.canvas.layers.composite_mut();

        match &self.system.video_frame {
            Some(frame) => {
                let scaled = raster::stretch(frame, rect.w.round() as u32, rect.h.round() as u32);
                let shown = if mirror { imageops::flip_horizontal(&scaled) } else { scaled };
                raster::draw_image(composite, &shown, rect.x.round() as i64, rect.y.round() as i64);
            }
            None => raster::fill_rect(composite, rect, CAMERA_BACKDROP),
        }

        if let Some(gesture) = self.system.last_gesture.as_ref() {
            let points = gesture.points.map(|p| {
                Point::new(rect.x + p.x / w.max(1.0) * rect.w, rect.y + p.y / h.max(1.0) * rect.h)
            });
            draw_hand(composite, &points, 2.0, 2.0);
        }

        raster::stroke_rect(composite, rect, 2.0, CAMERA_BORDER);
        raster::fill_rect(
            composite,
            Rect::new(rect.x, rect.y, rect.w, crate::constants::CAMERA_TITLE_HEIGHT),
            CAMERA_TITLE,
        );
    }

    fn draw_ui(&mut self) {
        let progress = self
            .system
            .last_frame_at
            .map(|now| self.hover.progress(now))
            .unwrap_or_default();
        let fraction = |target: HoverTarget| {
            progress
                .iter()
                .find(|p| p.target == target)
                .map(|p| p.fraction)
        };

        let mode = self.tools.mode();
        let zoom_mode = self.tools.zoom_mode();
        let tool = self.tools.annotate_tool();
        let brush_color = self.tools.brush_color();
        let layout = &self.canvas.layout;
        let palette = &self.system.settings.palette;
        let composite = self.canvas.layers.composite_mut();

        for (m, rect) in &layout.toolbar {
            draw_button(composite, *rect, *m == mode, fraction(HoverTarget::Toolbar(*m)));
        }

        match mode {
            Mode::Zoom => {
                for (z, rect) in &layout.zoom {
                    draw_button(composite, *rect, *z == zoom_mode, fraction(HoverTarget::Zoom(*z)));
                }
            }
            Mode::Annotate => {
                for (kind, rect) in &layout.shapes {
                    let active = tool == AnnotateTool::Shape(*kind);
                    draw_button(composite, *rect, active, fraction(HoverTarget::Shape(*kind)));
                }
                draw_button(
                    composite,
                    layout.erase,
                    tool.eraser_active(),
                    fraction(HoverTarget::Erase),
                );
                draw_button(
                    composite,
                    layout.selection,
                    tool.selection_active(),
                    fraction(HoverTarget::Selection),
                );
            }
            Mode::ColorSelect => {
                for (i, (swatch, color)) in layout.swatches.iter().zip(palette).enumerate() {
                    raster::fill_circle(composite, swatch.center, swatch.radius, *color);
                    let ring = if *color == brush_color { BUTTON_ACTIVE } else { BUTTON_BORDER };
                    raster::stroke_circle(composite, swatch.center, swatch.radius, 2.0, ring);
                    if let Some(f) = fraction(HoverTarget::Swatch(i)) {
                        raster::stroke_circle(
                            composite,
                            swatch.center,
                            swatch.radius + 5.0 * f,
                            3.0,
                            PROGRESS,
                        );
                    }
                }
            }
            Mode::Idle | Mode::Brush => {}
        }
    }
}

fn draw_button(img: &mut RgbaImage, rect: Rect, active: bool, progress: Option<f32>) {
    raster::fill_rect(img, rect, if active { BUTTON_ACTIVE } else { BUTTON_FILL });
    raster::stroke_rect(img, rect, 1.5, BUTTON_BORDER);
    if let Some(f) = progress.filter(|f| *f > 0.0) {
        let bar = Rect::new(rect.x, rect.bottom() - PROGRESS_HEIGHT, rect.w * f, PROGRESS_HEIGHT);
        raster::fill_rect(img, bar, PROGRESS);
    }
}

fn draw_hand(img: &mut RgbaImage, points: &[Point], bone_width: f32, joint_radius: f32) {
    for (a, b) in HAND_CONNECTIONS {
        if let (Some(pa), Some(pb)) = (points.get(a), points.get(b)) {
            raster::stroke_segment(img, *pa, *pb, bone_width, SKELETON_BONE);
        }
    }
    for p in points {
        raster::fill_circle(img, *p, joint_radius, SKELETON_JOINT);
    }
}
