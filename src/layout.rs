//! Screen-space placement of the gesture UI affordances.
//!
//! Recomputed whenever the canvas size or palette changes. The toolbar is
//! centered along the top edge; the zoom, shape, selection and palette
//! panels stack down the left side; the erase button hugs the right edge.

use crate::constants::*;
use crate::types::{Circle, Mode, Point, Rect, ShapeKind, ZoomMode};

#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    pub toolbar: Vec<(Mode, Rect)>,
    pub zoom: Vec<(ZoomMode, Rect)>,
    pub shapes: Vec<(ShapeKind, Rect)>,
    pub erase: Rect,
    pub selection: Rect,
    pub swatches: Vec<Circle>,
}

impl Layout {
    pub fn compute(width: f32, _height: f32, palette_len: usize) -> Self {
        let count = Mode::ALL.len() as f32;
        let total_w = count * TOOLBAR_BUTTON_WIDTH + (count - 1.0) * TOOLBAR_BUTTON_GAP;
        let start_x = TOOLBAR_MIN_LEFT.max((width - total_w) / 2.0);
        let toolbar = Mode::ALL
            .iter()
            .enumerate()
            .map(|(i, mode)| {
                let x = start_x + i as f32 * (TOOLBAR_BUTTON_WIDTH + TOOLBAR_BUTTON_GAP);
                (
                    *mode,
                    Rect::new(x, TOOLBAR_TOP_MARGIN, TOOLBAR_BUTTON_WIDTH, TOOLBAR_BUTTON_HEIGHT),
                )
            })
            .collect();

        let (zw, zh) = ZOOM_BUTTON_SIZE;
        let zoom = ZoomMode::ALL
            .iter()
            .enumerate()
            .map(|(i, z)| {
                let y = SIDE_PANEL_Y + i as f32 * (zh + ZOOM_BUTTON_GAP);
                (*z, Rect::new(SIDE_PANEL_X, y, zw, zh))
            })
            .collect();

        let (sw, sh) = SHAPE_BUTTON_SIZE;
        let shapes = ShapeKind::ALL
            .iter()
            .enumerate()
            .map(|(i, kind)| {
                let y = SIDE_PANEL_Y + i as f32 * (sh + SHAPE_BUTTON_GAP);
                (*kind, Rect::new(SIDE_PANEL_X, y, sw, sh))
            })
            .collect();

        let (ew, eh) = ERASE_BUTTON_SIZE;
        let erase = Rect::new(width - ew - ERASE_BUTTON_RIGHT_MARGIN, SIDE_PANEL_Y, ew, eh);

        let (sel_x, sel_y) = SELECTION_BUTTON_ORIGIN;
        let (sel_w, sel_h) = SELECTION_BUTTON_SIZE;
        let selection = Rect::new(sel_x, sel_y, sel_w, sel_h);

        let swatches = (0..palette_len)
            .map(|i| Circle {
                center: Point::new(
                    SIDE_PANEL_X,
                    SIDE_PANEL_Y + i as f32 * (SWATCH_RADIUS * 2.0 + SWATCH_GAP),
                ),
                radius: SWATCH_RADIUS,
            })
            .collect();

        Self {
            toolbar,
            zoom,
            shapes,
            erase,
            selection,
            swatches,
        }
    }

    pub fn toolbar_button(&self, mode: Mode) -> Option<Rect> {
        self.toolbar.iter().find(|(m, _)| *m == mode).map(|(_, r)| *r)
    }

    pub fn zoom_button(&self, zoom: ZoomMode) -> Option<Rect> {
        self.zoom.iter().find(|(z, _)| *z == zoom).map(|(_, r)| *r)
    }

    pub fn shape_button(&self, kind: ShapeKind) -> Option<Rect> {
        self.shapes.iter().find(|(k, _)| *k == kind).map(|(_, r)| *r)
    }
}
