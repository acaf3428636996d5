//! Pixel primitives over `RgbaImage`.
//!
//! Shapes are rasterized from signed distance fields: each pixel center
//! inside the padded bounding box gets a coverage value from its distance to
//! the shape edge, then is blended with source-over (paint) or
//! destination-out (erase). Colors are straight (non-premultiplied) alpha.

use crate::types::{Color, Point, Rect};
use image::{Rgba, RgbaImage, imageops};

// ============================================================================
// Signed distance functions
// ============================================================================

/// Antialiasing ramp: 1 inside, 0 outside, smooth across one pixel.
#[inline]
fn coverage(d: f32) -> f32 {
    let t = ((d - 0.5) / (-0.5 - 0.5)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn sdf_circle(p: Point, center: Point, radius: f32) -> f32 {
    (p.x - center.x).hypot(p.y - center.y) - radius
}

/// Axis-aligned box centered at the origin with half-extents `hx`, `hy`.
#[inline]
fn sdf_box(px: f32, py: f32, hx: f32, hy: f32) -> f32 {
    let dx = px.abs() - hx;
    let dy = py.abs() - hy;
    let outside = (dx.max(0.0) * dx.max(0.0) + dy.max(0.0) * dy.max(0.0)).sqrt();
    let inside = dx.max(dy).min(0.0);
    outside + inside
}

/// Distance to segment `ab` (unsigned).
#[inline]
fn dist_segment(p: Point, a: Point, b: Point) -> f32 {
    let (ex, ey) = (b.x - a.x, b.y - a.y);
    let (wx, wy) = (p.x - a.x, p.y - a.y);
    let len2 = ex * ex + ey * ey;
    let t = if len2 <= f32::EPSILON {
        0.0
    } else {
        ((wx * ex + wy * ey) / len2).clamp(0.0, 1.0)
    };
    (wx - ex * t).hypot(wy - ey * t)
}

/// Signed distance to a simple polygon (negative inside).
fn sdf_polygon(p: Point, verts: &[Point]) -> f32 {
    let Some(first) = verts.first() else {
        return f32::MAX;
    };
    let mut d = (p.x - first.x).powi(2) + (p.y - first.y).powi(2);
    let mut sign = 1.0;
    let n = verts.len();
    for i in 0..n {
        let vi = verts[i];
        let vj = verts[(i + n - 1) % n];
        let (ex, ey) = (vj.x - vi.x, vj.y - vi.y);
        let (wx, wy) = (p.x - vi.x, p.y - vi.y);
        let len2 = ex * ex + ey * ey;
        let t = if len2 <= f32::EPSILON {
            0.0
        } else {
            ((wx * ex + wy * ey) / len2).clamp(0.0, 1.0)
        };
        let (bx, by) = (wx - ex * t, wy - ey * t);
        d = d.min(bx * bx + by * by);

        let c1 = p.y >= vi.y;
        let c2 = p.y < vj.y;
        let c3 = ex * wy > ey * wx;
        if (c1 && c2 && c3) || (!c1 && !c2 && !c3) {
            sign = -sign;
        }
    }
    sign * d.sqrt()
}

// ============================================================================
// Per-pixel blending
// ============================================================================

/// Source-over blend of `src` scaled by `cov` into `dst`.
#[inline]
pub fn blend_pixel(dst: &mut Rgba<u8>, src: Color, cov: f32) {
    let sa = src.0[3] as f32 / 255.0 * cov;
    if sa <= 0.0 {
        return;
    }
    let da = dst.0[3] as f32 / 255.0;
    if sa >= 1.0 || da <= 0.0 {
        let [r, g, b, _] = src.0;
        *dst = Rgba([r, g, b, (sa * 255.0).round() as u8]);
        return;
    }
    let out_a = sa + da * (1.0 - sa);
    let mut out = [0u8; 4];
    for c in 0..3 {
        let s = src.0[c] as f32;
        let d = dst.0[c] as f32;
        out[c] = ((s * sa + d * da * (1.0 - sa)) / out_a).round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round() as u8;
    *dst = Rgba(out);
}

/// Destination-out: remove `cov` of the existing alpha.
#[inline]
pub fn erase_pixel(dst: &mut Rgba<u8>, cov: f32) {
    if cov <= 0.0 {
        return;
    }
    let a = (dst.0[3] as f32 * (1.0 - cov.min(1.0))).round() as u8;
    *dst = if a == 0 { Rgba([0, 0, 0, 0]) } else { Rgba([dst.0[0], dst.0[1], dst.0[2], a]) };
}

#[derive(Clone, Copy)]
enum Op {
    Paint(Color),
    Erase,
}

/// Apply `op` to every pixel in the padded bounds, weighted by the SDF.
fn rasterize<F>(img: &mut RgbaImage, bounds: Rect, op: Op, sdf: F)
where
    F: Fn(Point) -> f32,
{
    let (w, h) = (img.width() as i64, img.height() as i64);
    let x0 = ((bounds.x - 1.0).floor() as i64).clamp(0, w);
    let y0 = ((bounds.y - 1.0).floor() as i64).clamp(0, h);
    let x1 = ((bounds.right() + 1.0).ceil() as i64).clamp(0, w);
    let y1 = ((bounds.bottom() + 1.0).ceil() as i64).clamp(0, h);

    for y in y0..y1 {
        for x in x0..x1 {
            let cov = coverage(sdf(Point::new(x as f32 + 0.5, y as f32 + 0.5)));
            if cov <= 0.0 {
                continue;
            }
            let px = img.get_pixel_mut(x as u32, y as u32);
            match op {
                Op::Paint(color) => blend_pixel(px, color, cov),
                Op::Erase => erase_pixel(px, cov),
            }
        }
    }
}

fn circle_bounds(center: Point, radius: f32) -> Rect {
    Rect::new(center.x - radius, center.y - radius, radius * 2.0, radius * 2.0)
}

fn inflate(rect: Rect, by: f32) -> Rect {
    Rect::new(rect.x - by, rect.y - by, rect.w + by * 2.0, rect.h + by * 2.0)
}

fn points_bounds(points: &[Point]) -> Rect {
    let mut min = Point::new(f32::MAX, f32::MAX);
    let mut max = Point::new(f32::MIN, f32::MIN);
    for p in points {
        min = Point::new(min.x.min(p.x), min.y.min(p.y));
        max = Point::new(max.x.max(p.x), max.y.max(p.y));
    }
    Rect::from_corners(min, max)
}

// ============================================================================
// Shapes
// ============================================================================

pub fn fill_circle(img: &mut RgbaImage, center: Point, radius: f32, color: Color) {
    rasterize(img, circle_bounds(center, radius), Op::Paint(color), |p| {
        sdf_circle(p, center, radius)
    });
}

/// Ring of `width` centered on the circle outline.
pub fn stroke_circle(img: &mut RgbaImage, center: Point, radius: f32, width: f32, color: Color) {
    let half = width / 2.0;
    rasterize(
        img,
        circle_bounds(center, radius + half),
        Op::Paint(color),
        |p| sdf_circle(p, center, radius).abs() - half,
    );
}

/// Thick line with round caps.
pub fn stroke_segment(img: &mut RgbaImage, a: Point, b: Point, width: f32, color: Color) {
    let half = width / 2.0;
    let bounds = inflate(Rect::from_corners(a, b), half);
    rasterize(img, bounds, Op::Paint(color), |p| dist_segment(p, a, b) - half);
}

pub fn fill_rect(img: &mut RgbaImage, rect: Rect, color: Color) {
    let c = rect.center();
    let (hx, hy) = (rect.w / 2.0, rect.h / 2.0);
    rasterize(img, rect, Op::Paint(color), |p| sdf_box(p.x - c.x, p.y - c.y, hx, hy));
}

/// Rectangle outline of `width`, centered on the edges with square corners.
pub fn stroke_rect(img: &mut RgbaImage, rect: Rect, width: f32, color: Color) {
    if rect.w <= 0.0 && rect.h <= 0.0 {
        return;
    }
    let c = rect.center();
    let (hx, hy) = (rect.w / 2.0, rect.h / 2.0);
    let half = width / 2.0;
    rasterize(img, inflate(rect, half), Op::Paint(color), |p| {
        sdf_box(p.x - c.x, p.y - c.y, hx, hy).abs() - half
    });
}

pub fn fill_polygon(img: &mut RgbaImage, verts: &[Point], color: Color) {
    if verts.len() < 3 {
        return;
    }
    rasterize(img, points_bounds(verts), Op::Paint(color), |p| sdf_polygon(p, verts));
}

/// Closed polygon outline with round joins.
pub fn stroke_polygon(img: &mut RgbaImage, verts: &[Point], width: f32, color: Color) {
    if verts.len() < 2 {
        return;
    }
    let half = width / 2.0;
    let n = verts.len();
    rasterize(
        img,
        inflate(points_bounds(verts), half),
        Op::Paint(color),
        |p| {
            (0..n)
                .map(|i| dist_segment(p, verts[i], verts[(i + 1) % n]))
                .fold(f32::MAX, f32::min)
                - half
        },
    );
}

/// Destination-out disc.
pub fn erase_circle(img: &mut RgbaImage, center: Point, radius: f32) {
    rasterize(img, circle_bounds(center, radius), Op::Erase, |p| {
        sdf_circle(p, center, radius)
    });
}

// ============================================================================
// Regions
// ============================================================================

/// Integer pixel rectangle covering `rect`, as `(x, y, w, h)`.
pub fn pixel_rect(rect: Rect) -> (i64, i64, u32, u32) {
    (
        rect.x.round() as i64,
        rect.y.round() as i64,
        rect.w.round().max(0.0) as u32,
        rect.h.round().max(0.0) as u32,
    )
}

/// Copy `rect` out of `img`. Pixels outside the image come back transparent.
pub fn copy_region(img: &RgbaImage, rect: Rect) -> RgbaImage {
    let (x, y, w, h) = pixel_rect(rect);
    let mut out = RgbaImage::new(w, h);
    for (ox, oy, px) in out.enumerate_pixels_mut() {
        let sx = x + ox as i64;
        let sy = y + oy as i64;
        if sx >= 0 && sy >= 0 && sx < img.width() as i64 && sy < img.height() as i64 {
            *px = *img.get_pixel(sx as u32, sy as u32);
        }
    }
    out
}

/// Set every pixel of `rect` to transparent.
pub fn clear_region(img: &mut RgbaImage, rect: Rect) {
    let (x, y, w, h) = pixel_rect(rect);
    for yy in y.max(0)..(y + h as i64).min(img.height() as i64) {
        for xx in x.max(0)..(x + w as i64).min(img.width() as i64) {
            img.put_pixel(xx as u32, yy as u32, Rgba([0, 0, 0, 0]));
        }
    }
}

/// Overwrite pixels of `img` with `src` at `origin`, transparent pixels included.
pub fn put_region(img: &mut RgbaImage, src: &RgbaImage, origin: Point) {
    let x = origin.x.round() as i64;
    let y = origin.y.round() as i64;
    for (sx, sy, px) in src.enumerate_pixels() {
        let dx = x + sx as i64;
        let dy = y + sy as i64;
        if dx >= 0 && dy >= 0 && dx < img.width() as i64 && dy < img.height() as i64 {
            img.put_pixel(dx as u32, dy as u32, *px);
        }
    }
}

/// Source-over `src` onto `dst` at integer offset.
pub fn draw_image(dst: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64) {
    imageops::overlay(dst, src, x, y);
}

/// Copy `src` into a new `width` x `height` image at the origin, cropping or
/// padding with transparency.
pub fn reflow(src: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let mut out = RgbaImage::new(width, height);
    imageops::replace(&mut out, src, 0, 0);
    out
}

/// Placement of an image scaled to fit inside a frame, preserving aspect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Letterbox `(img_w, img_h)` into `(frame_w, frame_h)`.
pub fn fit_rect(img_w: u32, img_h: u32, frame_w: u32, frame_h: u32) -> FitRect {
    let (iw, ih) = (img_w.max(1) as f32, img_h.max(1) as f32);
    let (fw, fh) = (frame_w as f32, frame_h as f32);
    let img_aspect = iw / ih;
    let frame_aspect = fw / fh.max(1.0);
    if img_aspect > frame_aspect {
        let h = fw / img_aspect;
        FitRect { x: 0.0, y: (fh - h) / 2.0, w: fw, h }
    } else {
        let w = fh * img_aspect;
        FitRect { x: (fw - w) / 2.0, y: 0.0, w, h: fh }
    }
}

/// Fill `dst` with `fill` and draw `src` aspect-fitted and centered on top.
pub fn draw_fitted(dst: &mut RgbaImage, src: &RgbaImage, fill: Color) {
    fill_all(dst, fill);
    let fit = fit_rect(src.width(), src.height(), dst.width(), dst.height());
    let (w, h) = (fit.w.round().max(1.0) as u32, fit.h.round().max(1.0) as u32);
    let scaled = imageops::resize(src, w, h, imageops::FilterType::Triangle);
    draw_image(dst, &scaled, fit.x.round() as i64, fit.y.round() as i64);
}

/// Scale `src` to exactly `width` x `height`.
pub fn stretch(src: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    imageops::resize(src, width.max(1), height.max(1), imageops::FilterType::Triangle)
}

pub fn fill_all(img: &mut RgbaImage, color: Color) {
    for px in img.pixels_mut() {
        *px = color.to_rgba();
    }
}

pub fn clear_all(img: &mut RgbaImage) {
    fill_all(img, Color::TRANSPARENT);
}
