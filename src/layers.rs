//! Raster layer store.
//!
//! Three canvas-sized surfaces (background, drawing, shape preview) plus the
//! composite that is presented each frame. The drawing and background layers
//! are private to the engine; only flattened copies leave it.

use crate::input::state::SelectionState;
use crate::input::transform::Viewport;
use crate::raster;
use crate::types::{Color, Point, Rect};
use image::RgbaImage;
use tracing::debug;

/// Where the background pixels came from.
#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundSource {
    Solid(Color),
    Image {
        source_url: Option<String>,
        /// Pixels may be shown but not read back for export
        restricted: bool,
    },
}

pub struct LayerStore {
    width: u32,
    height: u32,
    background: RgbaImage,
    drawing: RgbaImage,
    preview: RgbaImage,
    composite: RgbaImage,
    background_source: BackgroundSource,
}

const MARQUEE_STROKE: Color = Color::rgba(0, 255, 255, 204);
const MARQUEE_FILL: Color = Color::rgba(0, 255, 255, 51);
const FLOAT_STROKE: Color = Color::rgba(0, 255, 0, 204);
const FLOAT_FILL: Color = Color::rgba(0, 255, 0, 51);
const HANDLE_SIZE: f32 = 8.0;

impl LayerStore {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        let mut bg = RgbaImage::new(width, height);
        raster::fill_all(&mut bg, background);
        Self {
            width,
            height,
            background: bg,
            drawing: RgbaImage::new(width, height),
            preview: RgbaImage::new(width, height),
            composite: RgbaImage::new(width, height),
            background_source: BackgroundSource::Solid(background),
        }
    }

    pub fn drawing(&self) -> &RgbaImage {
        &self.drawing
    }

    pub fn drawing_mut(&mut self) -> &mut RgbaImage {
        &mut self.drawing
    }

    pub fn preview_mut(&mut self) -> &mut RgbaImage {
        &mut self.preview
    }

    pub fn composite(&self) -> &RgbaImage {
        &self.composite
    }

    pub fn composite_mut(&mut self) -> &mut RgbaImage {
        &mut self.composite
    }

    pub fn background_source(&self) -> &BackgroundSource {
        &self.background_source
    }

    pub fn clear_preview(&mut self) {
        raster::clear_all(&mut self.preview);
    }

    pub fn set_solid_background(&mut self, color: Color) {
        raster::fill_all(&mut self.background, color);
        self.background_source = BackgroundSource::Solid(color);
    }

    /// Draw `image` letterboxed over `fill`.
    pub fn set_image_background(
        &mut self,
        image: &RgbaImage,
        fill: Color,
        source_url: Option<String>,
        restricted: bool,
    ) {
        raster::draw_fitted(&mut self.background, image, fill);
        self.background_source = BackgroundSource::Image {
            source_url,
            restricted,
        };
    }

    /// Resize every surface. Drawing and background keep their pixels at the
    /// same origin; the preview starts empty.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        debug!(from_w = self.width, from_h = self.height, width, height, "Resizing layers");
        self.drawing = raster::reflow(&self.drawing, width, height);
        self.background = raster::reflow(&self.background, width, height);
        self.preview = RgbaImage::new(width, height);
        self.composite = RgbaImage::new(width, height);
        self.width = width;
        self.height = height;
    }

    /// Background plus drawing at identity transform.
    pub fn flatten(&self) -> RgbaImage {
        self.flatten_over(self.background.clone())
    }

    /// Drawing composited over a caller-provided base.
    pub fn flatten_over(&self, mut base: RgbaImage) -> RgbaImage {
        raster::draw_image(&mut base, &self.drawing, 0, 0);
        base
    }

    /// Rebuild the composite: background, then the drawing, preview and
    /// selection through `viewport`. Screen-space chrome is drawn afterwards
    /// by the caller.
    pub fn recomposite(&mut self, viewport: &Viewport, show_preview: bool, selection: &SelectionState) {
        self.composite.copy_from_slice(self.background.as_raw());
        blit_transformed(&mut self.composite, &self.drawing, Point::default(), viewport);
        if show_preview {
            blit_transformed(&mut self.composite, &self.preview, Point::default(), viewport);
        }

        if let Some(bounds) = selection.bounds() {
            let floating = selection.is_floating();
            let screen = transform_rect(bounds, viewport);
            let (stroke, fill) = if floating {
                (FLOAT_STROKE, FLOAT_FILL)
            } else {
                (MARQUEE_STROKE, MARQUEE_FILL)
            };
            raster::stroke_rect(&mut self.composite, screen, 2.0, stroke);
            raster::fill_rect(&mut self.composite, screen, fill);
            if floating {
                for (cx, cy) in [
                    (screen.x, screen.y),
                    (screen.right(), screen.y),
                    (screen.x, screen.bottom()),
                    (screen.right(), screen.bottom()),
                ] {
                    let handle = Rect::new(
                        cx - HANDLE_SIZE / 2.0,
                        cy - HANDLE_SIZE / 2.0,
                        HANDLE_SIZE,
                        HANDLE_SIZE,
                    );
                    raster::fill_rect(&mut self.composite, handle, FLOAT_STROKE);
                }
            }
        }

        if let SelectionState::Floating { pixels, origin } = selection {
            blit_transformed(&mut self.composite, pixels, *origin, viewport);
        }
    }
}

/// World-space rect to screen space.
pub fn transform_rect(rect: Rect, viewport: &Viewport) -> Rect {
    let a = viewport.world_to_screen(Point::new(rect.x, rect.y));
    let b = viewport.world_to_screen(Point::new(rect.right(), rect.bottom()));
    Rect::from_corners(a, b)
}

/// Source-over `src`, placed at world `origin`, onto screen-space `dst`.
fn blit_transformed(dst: &mut RgbaImage, src: &RgbaImage, origin: Point, viewport: &Viewport) {
    let screen_origin = viewport.world_to_screen(origin);
    let identity_scale = (viewport.scale() - 1.0).abs() < f32::EPSILON;
    if identity_scale
        && screen_origin.x.fract() == 0.0
        && screen_origin.y.fract() == 0.0
    {
        raster::draw_image(dst, src, screen_origin.x as i64, screen_origin.y as i64);
        return;
    }

    let bounds = transform_rect(
        Rect::new(origin.x, origin.y, src.width() as f32, src.height() as f32),
        viewport,
    );
    let (dw, dh) = (dst.width() as i64, dst.height() as i64);
    let x0 = (bounds.x.floor() as i64).clamp(0, dw);
    let y0 = (bounds.y.floor() as i64).clamp(0, dh);
    let x1 = (bounds.right().ceil() as i64).clamp(0, dw);
    let y1 = (bounds.bottom().ceil() as i64).clamp(0, dh);

    for sy in y0..y1 {
        for sx in x0..x1 {
            let world = viewport.screen_to_world(Point::new(sx as f32 + 0.5, sy as f32 + 0.5));
            let lx = (world.x - origin.x).floor();
            let ly = (world.y - origin.y).floor();
            if lx < 0.0 || ly < 0.0 || lx >= src.width() as f32 || ly >= src.height() as f32 {
                continue;
            }
            let px = *src.get_pixel(lx as u32, ly as u32);
            if px.0[3] == 0 {
                continue;
            }
            raster::blend_pixel(dst.get_pixel_mut(sx as u32, sy as u32), Color(px.0), 1.0);
        }
    }
}
