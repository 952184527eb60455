use std::path::Path;

use image::{ImageFormat,ImageResult,Rgb,RgbImage};

use crate::interrupt::Interrupt;
use crate::points::*;
use crate::render::{DrawList,Rect,Shape,Surface};

pub const BACKGROUND : Rgb<u8> = Rgb([255, 255, 237]);
pub const STROKE : Rgb<u8> = Rgb([0, 0, 0]);
pub const MARKER : Rgb<u8> = Rgb([255, 0, 0]);

const STROKE_PT : f64 = 0.5;
const MARKER_DIAMETER_PT : f64 = 2.0;
const PT_PER_INCH : f64 = 72.0;

/*
World square [-limit, limit]^2 onto a square of `pixels` side.
Pixel i covers [i, i+1) and y grows downwards.
*/
#[derive(Copy,Clone,Debug,PartialEq)]
pub struct Viewport {
    limit : f64,
    pixels : u32,
}

impl Viewport {
    pub fn new(limit : f64, pixels : u32) -> Viewport {
        Viewport { limit, pixels }
    }

    #[inline]
    pub fn pixels(&self) -> u32 {self.pixels}

    pub fn px_per_unit(&self) -> f64 {
        self.pixels as f64 / (2.0 * self.limit)
    }

    pub fn to_screen(&self, pt : CPoint2) -> CPoint2 {
        CPoint2::new(pt.x + self.limit, self.limit - pt.y).scale(self.px_per_unit())
    }
}

#[derive(Copy,Clone,Debug,PartialEq)]
pub struct Style {
    pub background : Rgb<u8>,
    pub stroke : Rgb<u8>,
    pub stroke_px : f64,
    pub marker : Rgb<u8>,
    pub marker_radius_px : f64,
}

impl Style {
    // line widths are given in points, so they scale with resolution
    pub fn for_dpi(dpi : u32) -> Style {
        let px_per_pt = dpi as f64 / PT_PER_INCH;
        Style {
            background : BACKGROUND,
            stroke : STROKE,
            stroke_px : (STROKE_PT * px_per_pt).max(1.0),
            marker : MARKER,
            marker_radius_px : (MARKER_DIAMETER_PT * px_per_pt / 2.0).max(1.0),
        }
    }
}

/// Raster surface. Everything outside the image is clipped.
pub struct Canvas {
    image : RgbImage,
    viewport : Viewport,
    style : Style,
}

impl Canvas {
    pub fn new(viewport : Viewport, style : Style) -> Canvas {
        Canvas {
            image : RgbImage::from_pixel(viewport.pixels(), viewport.pixels(), style.background),
            viewport,
            style,
        }
    }

    // false when interrupted before the last shape
    pub fn paint(&mut self, list : &DrawList, interrupt : &Interrupt) -> bool {
        for shape in list.shapes() {
            if interrupt.is_triggered() {
                return false;
            }
            match *shape {
                Shape::Outline(rect) => self.outline(rect),
                Shape::Marker(at) => self.marker(at),
            }
        }
        true
    }

    #[inline]
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn save(&self, path : &Path) -> ImageResult<()> {
        self.image.save_with_format(path, ImageFormat::Png)
    }

    // pixels whose centers fall in [from, to)
    fn band(&mut self, from : CPoint2, to : CPoint2, color : Rgb<u8>) {
        let (from, to) = match (self.clamp(from), self.clamp(to)) {
            (Some(from), Some(to)) => (from, to),
            _ => return,
        };
        let first = (from - CPoint2::new(0.5, 0.5)).ceil();
        let last = (to - CPoint2::new(0.5, 0.5)).ceil().shift_x(-1).shift_y(-1);
        self.fill(first, last, color);
    }

    // pulls far away coordinates in to just outside the image
    fn clamp(&self, pt : CPoint2) -> Option<CPoint2> {
        if pt.x.is_nan() || pt.y.is_nan() {
            return None;
        }
        let edge = self.viewport.pixels() as f64 + 1.0;
        Some(CPoint2::new(pt.x.max(-1.0).min(edge), pt.y.max(-1.0).min(edge)))
    }

    // inclusive
    fn fill(&mut self, first : DPoint2, last : DPoint2, color : Rgb<u8>) {
        let (w, h) = (self.image.width() as i64, self.image.height() as i64);
        let (x0, x1) = (first.x.max(0), last.x.min(w - 1));
        let (y0, y1) = (first.y.max(0), last.y.min(h - 1));
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.image.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

impl Surface for Canvas {
    fn outline(&mut self, rect : Rect) {
        let top_left = self.viewport.to_screen(CPoint2::new(rect.corner.x, rect.corner.y + rect.height));
        let bottom_right = self.viewport.to_screen(CPoint2::new(rect.corner.x + rect.width, rect.corner.y));
        let half = self.style.stroke_px / 2.0;
        let color = self.style.stroke;
        let (left, right) = (top_left.x, bottom_right.x);
        let (top, bottom) = (top_left.y, bottom_right.y);

        self.band(CPoint2::new(left - half, top - half), CPoint2::new(right + half, top + half), color);
        self.band(CPoint2::new(left - half, bottom - half), CPoint2::new(right + half, bottom + half), color);
        self.band(CPoint2::new(left - half, top - half), CPoint2::new(left + half, bottom + half), color);
        self.band(CPoint2::new(right - half, top - half), CPoint2::new(right + half, bottom + half), color);
    }

    fn marker(&mut self, at : CPoint2) {
        let c = self.viewport.to_screen(at);
        let r = self.style.marker_radius_px;
        let color = self.style.marker;
        let (w, h) = (self.image.width() as i64, self.image.height() as i64);
        let (x0, x1) = (((c.x - r).floor() as i64).max(0), ((c.x + r).ceil() as i64).min(w - 1));
        let (y0, y1) = (((c.y - r).floor() as i64).max(0), ((c.y + r).ceil() as i64).min(h - 1));
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = CPoint2::new(x as f64 + 0.5, y as f64 + 0.5) - c;
                if d.x * d.x + d.y * d.y <= r * r {
                    self.image.put_pixel(x as u32, y as u32, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render;
    use serde_json::json;

    // one pixel per world unit, one pixel strokes
    fn small() -> Canvas {
        Canvas::new(Viewport::new(100.0, 200), Style::for_dpi(72))
    }

    #[test]
    fn viewport_flips_y() {
        let vp = Viewport::new(100.0, 200);
        assert_eq!(vp.to_screen(CPoint2::new(-100.0, 100.0)), CPoint2::new(0.0, 0.0));
        assert_eq!(vp.to_screen(CPoint2::new(100.0, -100.0)), CPoint2::new(200.0, 200.0));
        assert_eq!(vp.to_screen(CPoint2::new(0.0, 0.0)), CPoint2::new(100.0, 100.0));
    }

    #[test]
    fn style_scales_with_dpi() {
        let hi = Style::for_dpi(1200);
        assert!((hi.stroke_px - 0.5 * 1200.0 / 72.0).abs() < 1e-9);
        assert!((hi.marker_radius_px - 1200.0 / 72.0).abs() < 1e-9);
        let lo = Style::for_dpi(72);
        assert_eq!(lo.stroke_px, 1.0);
        assert_eq!(lo.marker_radius_px, 1.0);
    }

    #[test]
    fn blank_canvas_is_background() {
        let canvas = small();
        assert_eq!(canvas.image().dimensions(), (200, 200));
        assert!(canvas.image().pixels().all(|p| *p == BACKGROUND));
    }

    #[test]
    fn outline_strokes_edges_only() {
        let mut canvas = small();
        canvas.outline(Rect { corner: CPoint2::new(-50.0, -50.0), width: 100.0, height: 100.0 });
        let img = canvas.image();
        assert_eq!(*img.get_pixel(49, 100), STROKE);
        assert_eq!(*img.get_pixel(149, 100), STROKE);
        assert_eq!(*img.get_pixel(100, 49), STROKE);
        assert_eq!(*img.get_pixel(100, 149), STROKE);
        assert_eq!(*img.get_pixel(100, 100), BACKGROUND);
        assert_eq!(*img.get_pixel(20, 20), BACKGROUND);
    }

    #[test]
    fn marker_is_a_small_dot() {
        let mut canvas = small();
        canvas.marker(CPoint2::new(0.0, 0.0));
        let img = canvas.image();
        assert_eq!(*img.get_pixel(100, 100), MARKER);
        assert_eq!(*img.get_pixel(99, 99), MARKER);
        assert_eq!(*img.get_pixel(103, 100), BACKGROUND);
    }

    #[test]
    fn shapes_off_canvas_are_clipped() {
        let mut canvas = small();
        canvas.marker(CPoint2::new(5000.0, -5000.0));
        canvas.outline(Rect { corner: CPoint2::new(-1000.0, -1000.0), width: 2000.0, height: 2000.0 });
        assert!(canvas.image().pixels().all(|p| *p == BACKGROUND));
    }

    #[test]
    fn enormous_coordinates_are_clipped() {
        let mut canvas = small();
        canvas.outline(Rect { corner: CPoint2::new(-1e20, 0.0), width: 1.0, height: 1.0 });
        canvas.outline(Rect { corner: CPoint2::new(1e20, -1e20), width: 1.0, height: 1.0 });
        canvas.marker(CPoint2::new(-1e20, 1e20));
        assert!(canvas.image().pixels().all(|p| *p == BACKGROUND));

        // a square far bigger than the view only leaves its edges off canvas
        canvas.outline(Rect { corner: CPoint2::new(-1e20, -1e20), width: 2e20, height: 2e20 });
        assert!(canvas.image().pixels().all(|p| *p == BACKGROUND));
    }

    #[test]
    fn painting_stops_once_interrupted() {
        let mut list = DrawList::new();
        list.marker(CPoint2::new(0.0, 0.0));
        let interrupt = Interrupt::new();
        interrupt.trigger();
        let mut canvas = small();
        assert!(!canvas.paint(&list, &interrupt));
        assert!(canvas.image().pixels().all(|p| *p == BACKGROUND));
    }

    #[test]
    fn painting_a_recording_matches_drawing_directly() {
        let tree = json!({
            "boundary": {"center": {"x": 10, "y": -10}, "half_size": 30},
            "points": [{"x": 12, "y": -5}, {"x": -15, "y": 0}],
            "divided": false
        });
        let interrupt = Interrupt::new();
        let mut direct = small();
        render(&tree, &mut direct, &interrupt).unwrap();
        let mut list = DrawList::new();
        render(&tree, &mut list, &interrupt).unwrap();
        let mut replayed = small();
        assert!(replayed.paint(&list, &interrupt));
        assert_eq!(direct.image(), replayed.image());
    }
}
