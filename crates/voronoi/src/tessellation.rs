//! Voronoi tessellation as the dual of a Bowyer-Watson Delaunay triangulation.
//!
//! Every Delaunay triangle contributes one Voronoi vertex (its circumcentre)
//! and every Delaunay edge one ridge between the vertices of the triangles on
//! either side. A hull edge has a triangle on one side only; its ridge runs off
//! to infinity and carries `None` for the missing end.

use gen_art_core::error::EngineError;
use gen_art_core::DVec2;
use std::collections::HashMap;

/// Fewest sites that still give a two-dimensional tessellation.
pub const MIN_POINTS: usize = 4;

/// Boundary between the cells of two input sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ridge {
    /// Indices of the two sites the ridge separates.
    pub sites: [usize; 2],
    /// Indices into [`Tessellation::vertices`]; `None` marks an end at infinity.
    pub ends: [Option<usize>; 2],
}

impl Ridge {
    pub fn is_bounded(&self) -> bool {
        self.ends.iter().all(Option::is_some)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tessellation {
    pub vertices: Vec<DVec2>,
    pub ridges: Vec<Ridge>,
}

impl Tessellation {
    /// Segments of every ridge with two finite ends.
    pub fn bounded_segments(&self) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
        self.ridges.iter().filter_map(|r| match r.ends {
            [Some(a), Some(b)] => Some((self.vertices[a], self.vertices[b])),
            _ => None,
        })
    }
}

/// Vertex at infinity shared by every hull triangle.
const GHOST: usize = usize::MAX;

/// Twice the signed area of `abc`; positive when counter-clockwise.
fn orient(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    (b - a).perp_dot(c - a)
}

/// Positive when `p` lies strictly inside the circle through the
/// counter-clockwise triangle `abc`.
fn in_circle(a: DVec2, b: DVec2, c: DVec2, p: DVec2) -> f64 {
    let (a, b, c) = (a - p, b - p, c - p);
    a.length_squared() * b.perp_dot(c)
        + b.length_squared() * c.perp_dot(a)
        + c.length_squared() * a.perp_dot(b)
}

/// Counter-clockwise corner indices. A hull triangle is `[a, b, GHOST]`: the
/// edge `a -> b` with the real triangulation on its right.
#[derive(Debug, Clone, Copy)]
struct Triangle {
    v: [usize; 3],
}

impl Triangle {
    /// Builds the triangle `(a, b, apex)`, rotating [`GHOST`] into the last slot.
    fn new(a: usize, b: usize, apex: usize) -> Self {
        let v = if a == GHOST {
            [b, apex, GHOST]
        } else if b == GHOST {
            [apex, a, GHOST]
        } else {
            [a, b, apex]
        };
        Self { v }
    }

    fn is_ghost(&self) -> bool {
        self.v[2] == GHOST
    }

    /// Whether `p` falls inside the circumcircle. For a hull triangle that
    /// circle is the open half-plane beyond its edge plus the open edge itself.
    fn conflicts(&self, pts: &[DVec2], p: DVec2) -> bool {
        let [a, b, c] = self.v;
        if c == GHOST {
            let (a, b) = (pts[a], pts[b]);
            let side = orient(a, b, p);
            side > 0.0 || (side == 0.0 && (a - p).dot(b - p) < 0.0)
        } else {
            in_circle(pts[a], pts[b], pts[c], p) > 0.0
        }
    }

    fn circumcentre(&self, pts: &[DVec2]) -> Option<DVec2> {
        let a = pts[self.v[0]];
        let (b, c) = (pts[self.v[1]] - a, pts[self.v[2]] - a);
        let d = 2.0 * b.perp_dot(c);
        if d == 0.0 || !d.is_finite() {
            return None;
        }
        let (b2, c2) = (b.length_squared(), c.length_squared());
        Some(a + DVec2::new(c.y * b2 - b.y * c2, b.x * c2 - c.x * b2) / d)
    }

    fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.v;
        [(a, b), (b, c), (c, a)]
    }
}

fn edge_key(a: usize, b: usize) -> (usize, usize) {
    (a.min(b), a.max(b))
}

fn validate(points: &[DVec2]) -> Result<(), EngineError> {
    if points.len() < MIN_POINTS {
        return Err(EngineError::DegenerateInput(format!(
            "need at least {MIN_POINTS} points, got {}",
            points.len()
        )));
    }
    if let Some(p) = points.iter().find(|p| !p.is_finite()) {
        return Err(EngineError::DegenerateInput(format!(
            "non-finite coordinate {p}"
        )));
    }
    let mut sorted: Vec<(u64, u64)> = points
        .iter()
        .map(|p| ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits()))
        .collect();
    sorted.sort_unstable();
    if sorted.windows(2).any(|w| w[0] == w[1]) {
        return Err(EngineError::DegenerateInput("duplicate points".to_string()));
    }
    Ok(())
}

/// Delaunay triangles of distinct `points`, hull triangles included.
///
/// Bowyer-Watson seeded from the first non-degenerate triangle of the input;
/// the hull is closed off by triangles on a shared vertex at infinity, so
/// points outside the current hull are inserted the same way as points
/// inside it.
fn triangulate(points: &[DVec2]) -> Result<Vec<Triangle>, EngineError> {
    let (a, b) = (0, 1);
    let c = (2..points.len())
        .find(|&i| orient(points[a], points[b], points[i]) != 0.0)
        .ok_or_else(|| EngineError::DegenerateInput("points are collinear".to_string()))?;
    let (b, c) = if orient(points[a], points[b], points[c]) > 0.0 {
        (b, c)
    } else {
        (c, b)
    };
    let mut triangles = vec![
        Triangle::new(a, b, c),
        Triangle::new(b, a, GHOST),
        Triangle::new(c, b, GHOST),
        Triangle::new(a, c, GHOST),
    ];

    for i in (0..points.len()).filter(|&i| i != a && i != b && i != c) {
        let p = points[i];
        let (bad, good): (Vec<Triangle>, Vec<Triangle>) = triangles
            .into_iter()
            .partition(|t| t.conflicts(points, p));
        if bad.is_empty() {
            return Err(EngineError::DegenerateInput(format!(
                "point {p} could not be inserted"
            )));
        }
        triangles = good;

        // Boundary of the cavity: edges that belong to exactly one bad triangle.
        let mut counts: HashMap<(usize, usize), ((usize, usize), u32)> = HashMap::new();
        for t in &bad {
            for (x, y) in t.edges() {
                counts.entry(edge_key(x, y)).or_insert(((x, y), 0)).1 += 1;
            }
        }
        let mut boundary: Vec<(usize, usize)> = counts
            .into_values()
            .filter(|&(_, count)| count == 1)
            .map(|(edge, _)| edge)
            .collect();
        boundary.sort_unstable();
        triangles.extend(boundary.into_iter().map(|(x, y)| Triangle::new(x, y, i)));
    }

    Ok(triangles)
}

/// Computes the Voronoi tessellation of `points`.
///
/// Returns `EngineError::DegenerateInput` for fewer than four points,
/// non-finite coordinates, duplicate points, or input with no Delaunay
/// triangle at all (every point on one line).
pub fn tessellate(points: &[DVec2]) -> Result<Tessellation, EngineError> {
    validate(points)?;
    let triangles: Vec<Triangle> = triangulate(points)?
        .into_iter()
        .filter(|t| !t.is_ghost())
        .collect();

    let vertices = triangles
        .iter()
        .map(|t| {
            t.circumcentre(points).ok_or_else(|| {
                EngineError::DegenerateInput(format!("flat triangle {:?}", t.v))
            })
        })
        .collect::<Result<Vec<DVec2>, EngineError>>()?;

    let mut sides: HashMap<(usize, usize), [Option<usize>; 2]> = HashMap::new();
    for (ti, t) in triangles.iter().enumerate() {
        for (a, b) in t.edges() {
            let ends = sides.entry(edge_key(a, b)).or_insert([None, None]);
            if ends[0].is_none() {
                ends[0] = Some(ti);
            } else {
                ends[1] = Some(ti);
            }
        }
    }
    let mut ridges: Vec<Ridge> = sides
        .into_iter()
        .map(|((a, b), ends)| Ridge {
            sites: [a, b],
            ends,
        })
        .collect();
    ridges.sort_unstable_by_key(|r| r.sites);

    Ok(Tessellation { vertices, ridges })
}
