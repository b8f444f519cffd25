//! Freehand ink and eraser strokes on the raster surface.
//!
//! Ink is not kept as vector paths: each segment is composited into the
//! surface's pixels as soon as it arrives. Undo therefore restores pixel
//! snapshots rather than replaying strokes.

use crate::background::BackgroundImage;
use crate::surface::RasterSurface;
use sk_core::{EditorConfig, Point, StrokeMode};
use tiny_skia::{BlendMode, LineCap, LineJoin, Paint, PathBuilder, Stroke, Transform};

/// The gesture currently in progress. Mode and width are fixed when the
/// stroke begins, so switching tools mid-stroke does not affect it.
#[derive(Debug, Clone, Copy)]
struct ActiveStroke {
    mode: StrokeMode,
    width: f32,
    last: Point,
}

pub struct StrokeRenderer {
    draw_width: f32,
    erase_width: f32,
    ink: [u8; 4],
    active: Option<ActiveStroke>,
}

impl Default for StrokeRenderer {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl StrokeRenderer {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            draw_width: config.draw_width,
            erase_width: config.erase_width,
            ink: config.ink_color,
            active: None,
        }
    }

    pub fn width_for(&self, mode: StrokeMode) -> f32 {
        match mode {
            StrokeMode::Draw => self.draw_width,
            StrokeMode::Erase => self.erase_width,
        }
    }

    /// Whether the pen is down.
    pub fn is_drawing(&self) -> bool {
        self.active.is_some()
    }

    /// Start a new path at `point`. Nothing is painted until the next point.
    pub fn begin_stroke(&mut self, mode: StrokeMode, point: Point) {
        self.active = Some(ActiveStroke {
            mode,
            width: self.width_for(mode),
            last: point,
        });
    }

    /// Paint a straight, round-capped segment from the previous point to
    /// `point`. Returns `false` (and paints nothing) when no stroke is in
    /// progress.
    pub fn extend_stroke(&mut self, surface: &mut RasterSurface, point: Point) -> bool {
        let Some(stroke) = self.active.as_mut() else {
            return false;
        };
        let from = stroke.last;
        stroke.last = point;
        let (mode, width) = (stroke.mode, stroke.width);

        let mut pb = PathBuilder::new();
        pb.move_to(from.x as f32, from.y as f32);
        pb.line_to(point.x as f32, point.y as f32);
        let Some(path) = pb.finish() else {
            return false;
        };

        let mut paint = Paint::default();
        paint.anti_alias = true;
        match mode {
            StrokeMode::Draw => {
                let [r, g, b, a] = self.ink;
                paint.set_color_rgba8(r, g, b, a);
                paint.blend_mode = BlendMode::SourceOver;
            }
            StrokeMode::Erase => {
                paint.set_color_rgba8(0, 0, 0, 255);
                paint.blend_mode = BlendMode::DestinationOut;
            }
        }
        let line = Stroke {
            width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };

        log::trace!(
            "STROKE {:?} w={} ({:.1}, {:.1}) -> ({:.1}, {:.1})",
            mode,
            width,
            from.x,
            from.y,
            point.x,
            point.y
        );
        surface
            .pixmap_mut()
            .stroke_path(&path, &paint, &line, Transform::identity(), None);
        true
    }

    /// Lift the pen. Returns whether a stroke was actually in progress.
    pub fn end_stroke(&mut self) -> bool {
        self.active.take().is_some()
    }

    /// Clear the surface and repaint the background, if any. Ink is gone
    /// afterwards; callers restore it from a snapshot when needed.
    pub fn redraw_base(surface: &mut RasterSurface, background: Option<&BackgroundImage>) {
        surface.clear();
        if let Some(bg) = background {
            bg.draw_onto(surface);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opaque_background(w: u32, h: u32) -> BackgroundImage {
        BackgroundImage::from_rgba8(w, h, [40, 120, 200, 255].repeat((w * h) as usize)).unwrap()
    }

    #[test]
    fn extend_without_begin_is_noop() {
        let mut surface = RasterSurface::new(20, 20).unwrap();
        let mut r = StrokeRenderer::default();
        assert!(!r.extend_stroke(&mut surface, Point::new(10.0, 10.0)));
        assert!(surface.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn begin_alone_paints_nothing() {
        let mut surface = RasterSurface::new(20, 20).unwrap();
        let mut r = StrokeRenderer::default();
        r.begin_stroke(StrokeMode::Draw, Point::new(5.0, 5.0));
        assert!(r.is_drawing());
        assert!(surface.data().iter().all(|&b| b == 0));
        assert!(r.end_stroke());
        assert!(!r.end_stroke());
        // Stroke ended: further moves are ignored.
        assert!(!r.extend_stroke(&mut surface, Point::new(9.0, 9.0)));
    }

    #[test]
    fn draw_paints_black_along_segment() {
        let mut surface = RasterSurface::new(60, 20).unwrap();
        let mut r = StrokeRenderer::default();
        r.begin_stroke(StrokeMode::Draw, Point::new(10.0, 10.0));
        assert!(r.extend_stroke(&mut surface, Point::new(50.0, 10.0)));
        r.end_stroke();

        let px = surface.pixel(30, 10).unwrap();
        assert!(px[3] > 0, "segment pixel should be inked: {px:?}");
        assert_eq!(&px[..3], &[0, 0, 0]);
        assert_eq!(surface.pixel(30, 2).unwrap()[3], 0);
    }

    #[test]
    fn erase_cuts_through_background() {
        let mut surface = RasterSurface::new(40, 40).unwrap();
        let bg = opaque_background(40, 40);
        StrokeRenderer::redraw_base(&mut surface, Some(&bg));
        assert_eq!(surface.pixel(20, 20).unwrap()[3], 255);

        let mut r = StrokeRenderer::default();
        r.begin_stroke(StrokeMode::Erase, Point::new(5.0, 20.0));
        r.extend_stroke(&mut surface, Point::new(35.0, 20.0));
        r.end_stroke();

        assert_eq!(surface.pixel(20, 20), Some([0, 0, 0, 0]));
        // Outside the 20px-wide eraser the background survives.
        assert_eq!(surface.pixel(20, 2).unwrap()[3], 255);
    }

    #[test]
    fn widths_follow_config() {
        let cfg = EditorConfig {
            draw_width: 3.0,
            erase_width: 24.0,
            ..EditorConfig::default()
        };
        let r = StrokeRenderer::new(&cfg);
        assert_eq!(r.width_for(StrokeMode::Draw), 3.0);
        assert_eq!(r.width_for(StrokeMode::Erase), 24.0);
    }

    #[test]
    fn redraw_base_without_background_clears() {
        let mut surface = RasterSurface::new(10, 10).unwrap();
        let mut r = StrokeRenderer::default();
        r.begin_stroke(StrokeMode::Draw, Point::new(1.0, 5.0));
        r.extend_stroke(&mut surface, Point::new(9.0, 5.0));
        StrokeRenderer::redraw_base(&mut surface, None);
        assert!(surface.data().iter().all(|&b| b == 0));
    }
}
