//! Drawable geometry and the page fit shared by the previewer and SVG export.
//!
//! Every engine publishes its last frame as a [`Drawing`]. Exporters never
//! recompute anything: they compute [`Bounds`] of the drawing, derive a
//! [`Placement`] onto a [`Page`], and stroke the same shapes the preview shows.

use crate::color::Rgba;
use crate::error::EngineError;
use glam::DVec2;

/// What a shape draws.
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    /// An open polyline through the points, in order.
    Path(Vec<DVec2>),
    /// A single round dot whose diameter is the drawing's stroke width.
    Dot(DVec2),
}

impl Mark {
    /// Points that contribute to the bounding box.
    pub fn points(&self) -> &[DVec2] {
        match self {
            Mark::Path(points) => points,
            Mark::Dot(p) => std::slice::from_ref(p),
        }
    }
}

/// A mark with its stroke color.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub mark: Mark,
    pub color: Rgba,
}

impl Shape {
    pub fn path(points: Vec<DVec2>, color: Rgba) -> Self {
        Self {
            mark: Mark::Path(points),
            color,
        }
    }

    pub fn dot(position: DVec2, color: Rgba) -> Self {
        Self {
            mark: Mark::Dot(position),
            color,
        }
    }
}

/// The renderable output of one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    pub shapes: Vec<Shape>,
    pub stroke_width: f64,
}

impl Drawing {
    /// An empty drawing with the given stroke width.
    pub fn new(stroke_width: f64) -> Self {
        Self {
            shapes: Vec::new(),
            stroke_width,
        }
    }

    /// True when no shape contributes a single point.
    pub fn is_empty(&self) -> bool {
        self.points().next().is_none()
    }

    /// All points of all shapes, in drawing order.
    pub fn points(&self) -> impl Iterator<Item = DVec2> + '_ {
        self.shapes
            .iter()
            .flat_map(|shape| shape.mark.points().iter().copied())
    }
}

impl Default for Drawing {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Axis-aligned bounding box of a drawing in data space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    /// Bounding box of every point in the drawing.
    ///
    /// Returns `None` for a drawing with no points, so callers handle the
    /// "nothing to draw" case before doing any extent arithmetic.
    pub fn of(drawing: &Drawing) -> Option<Bounds> {
        let mut points = drawing.points();
        let first = points.next()?;
        Some(points.fold(
            Bounds {
                min: first,
                max: first,
            },
            |b, p| Bounds {
                min: b.min.min(p),
                max: b.max.max(p),
            },
        ))
    }

    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }

    /// The canvas rectangle `[0, size.x] x [0, size.y]`.
    pub fn canvas(size: DVec2) -> Self {
        Bounds {
            min: DVec2::ZERO,
            max: size,
        }
    }
}

/// Wraps `v` into `[0, extent)`.
///
/// `rem_euclid` can round up to `extent` itself for tiny negative inputs; that
/// case maps to 0.
pub fn wrap(v: f64, extent: f64) -> f64 {
    let r = v.rem_euclid(extent);
    if r < extent {
        r
    } else {
        0.0
    }
}

/// Wraps both coordinates of `p` onto a `size.x x size.y` torus.
pub fn wrap_point(p: DVec2, size: DVec2) -> DVec2 {
    DVec2::new(wrap(p.x, size.x), wrap(p.y, size.y))
}

/// Target page for an export, in output units (SVG user units / pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl Page {
    /// A4 at 96 DPI with a 50 unit margin.
    pub const A4: Page = Page {
        width: 794.0,
        height: 1123.0,
        margin: 50.0,
    };

    /// A page matching a canvas exactly, without margin.
    pub fn canvas(width: usize, height: usize) -> Self {
        Self {
            width: width as f64,
            height: height as f64,
            margin: 0.0,
        }
    }
}

/// Maps a point from one coordinate space into another.
pub trait Projection {
    fn project(&self, p: DVec2) -> DVec2;
}

/// Uniform scale followed by a translation: `p * scale + translate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub scale: f64,
    pub translate: DVec2,
}

impl Placement {
    pub const IDENTITY: Placement = Placement {
        scale: 1.0,
        translate: DVec2::ZERO,
    };

    /// Fits `bounds` inside the page minus its margins, preserving aspect
    /// ratio, and centres it.
    ///
    /// The scale is `min(avail_w / art_w, avail_h / art_h)`. An axis with zero
    /// extent (a single vertical line, a single dot) does not constrain the
    /// scale; if both extents are zero the scale is 1.
    pub fn fit(bounds: Bounds, page: Page) -> Placement {
        let art = bounds.size();
        let avail = DVec2::new(
            (page.width - 2.0 * page.margin).max(0.0),
            (page.height - 2.0 * page.margin).max(0.0),
        );
        let axis_scale = |avail: f64, extent: f64| {
            if extent > 0.0 {
                Some(avail / extent)
            } else {
                None
            }
        };
        let scale = match (axis_scale(avail.x, art.x), axis_scale(avail.y, art.y)) {
            (Some(sx), Some(sy)) => sx.min(sy),
            (Some(s), None) | (None, Some(s)) => s,
            (None, None) => 1.0,
        };
        let page_size = DVec2::new(page.width, page.height);
        let translate = (page_size - art * scale) / 2.0 - bounds.min * scale;
        Placement { scale, translate }
    }

    /// Like [`Placement::fit`] over a drawing's own bounds.
    ///
    /// Returns `EngineError::EmptyGeometry` if the drawing has no points.
    pub fn fit_drawing(drawing: &Drawing, page: Page) -> Result<Placement, EngineError> {
        let bounds = Bounds::of(drawing).ok_or(EngineError::EmptyGeometry)?;
        Ok(Self::fit(bounds, page))
    }

    pub fn apply(&self, p: DVec2) -> DVec2 {
        p * self.scale + self.translate
    }

    /// Inverse of [`Placement::apply`].
    pub fn invert(&self, p: DVec2) -> DVec2 {
        (p - self.translate) / self.scale
    }
}

impl Projection for Placement {
    fn project(&self, p: DVec2) -> DVec2 {
        self.apply(p)
    }
}
