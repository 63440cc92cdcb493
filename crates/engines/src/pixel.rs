//! Pure-computation rasterisation of a [`Drawing`] into an RGBA8 buffer.
//!
//! Always available (no feature gate) so previews can be inspected in tests
//! without the `png` feature. Shapes are stamped with a round brush whose
//! diameter is the drawing's stroke width; each shape blends onto a pixel at
//! most once, so overlapping brush samples do not darken a single stroke.

use gen_art_core::geometry::{Drawing, Mark, Projection};
use gen_art_core::{DVec2, Rgba};

/// Distance between brush samples along a segment, in pixels.
const SAMPLE_SPACING: f64 = 0.5;

struct Canvas {
    width: usize,
    height: usize,
    rgb: Vec<[u8; 3]>,
    /// Id (plus one) of the last shape that touched each pixel.
    stamp: Vec<u32>,
}

impl Canvas {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rgb: vec![[255; 3]; width * height],
            stamp: vec![0; width * height],
        }
    }

    fn brush(&mut self, centre: DVec2, radius: f64, color: Rgba, id: u32) {
        if !centre.is_finite() {
            return;
        }
        let reach = radius.ceil() as i64;
        let (cx, cy) = (centre.x.floor() as i64, centre.y.floor() as i64);
        for y in (cy - reach)..=(cy + reach) {
            for x in (cx - reach)..=(cx + reach) {
                if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
                    continue;
                }
                let pixel_centre = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                if pixel_centre.distance(centre) > radius {
                    continue;
                }
                let idx = y as usize * self.width + x as usize;
                if self.stamp[idx] == id {
                    continue;
                }
                self.stamp[idx] = id;
                self.rgb[idx] = color.blend_over(self.rgb[idx], 1.0);
            }
        }
    }

    fn segment(&mut self, a: DVec2, b: DVec2, radius: f64, color: Rgba, id: u32) {
        let reach = DVec2::splat(radius + 1.0);
        let size = DVec2::new(self.width as f64, self.height as f64);
        let Some((a, b)) = clip_segment(a, b, -reach, size + reach) else {
            return;
        };
        let len = a.distance(b);
        if !len.is_finite() {
            return;
        }
        let samples = (len / SAMPLE_SPACING).ceil().max(1.0) as usize;
        for k in 0..=samples {
            self.brush(a.lerp(b, k as f64 / samples as f64), radius, color, id);
        }
    }

    fn into_rgba(self) -> Vec<u8> {
        self.rgb
            .into_iter()
            .flat_map(|[r, g, b]| [r, g, b, 255u8])
            .collect()
    }
}

/// Part of segment `ab` inside the rectangle `[min, max]` (Liang-Barsky), or
/// `None` when the segment misses it.
fn clip_segment(a: DVec2, b: DVec2, min: DVec2, max: DVec2) -> Option<(DVec2, DVec2)> {
    let d = b - a;
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    let edges = [
        (-d.x, a.x - min.x),
        (d.x, max.x - a.x),
        (-d.y, a.y - min.y),
        (d.y, max.y - a.y),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }
    }
    Some((a + d * t0, a + d * t1))
}

/// Draws `drawing` through `projection` onto a white `width x height` canvas.
///
/// The buffer length is `width * height * 4`; alpha is always 255. Geometry
/// outside the canvas is clipped.
pub fn rasterize<P: Projection + ?Sized>(
    drawing: &Drawing,
    projection: &P,
    width: usize,
    height: usize,
) -> Vec<u8> {
    let mut canvas = Canvas::new(width, height);
    let radius = (drawing.stroke_width / 2.0).max(0.5);
    for (i, shape) in drawing.shapes.iter().enumerate() {
        let id = (i as u32).wrapping_add(1).max(1);
        match &shape.mark {
            Mark::Path(points) => {
                let projected: Vec<DVec2> =
                    points.iter().map(|p| projection.project(*p)).collect();
                if let [only] = projected.as_slice() {
                    canvas.brush(*only, radius, shape.color, id);
                }
                for pair in projected.windows(2) {
                    canvas.segment(pair[0], pair[1], radius, shape.color, id);
                }
            }
            Mark::Dot(p) => canvas.brush(projection.project(*p), radius, shape.color, id),
        }
    }
    canvas.into_rgba()
}
