#![deny(unsafe_code)]
//! Voronoi art engine.
//!
//! N sites circle around on a toroidal canvas, each with its own phase
//! (`2*PI*i/N`) plus a shared clock, and the tessellation of their current
//! positions is redrawn every tick. Ridges that run off to infinity are
//! dropped rather than clipped.

pub mod tessellation;

use gen_art_core::error::EngineError;
use gen_art_core::geometry::{wrap_point, Bounds, Drawing, Page, Shape};
use gen_art_core::params::{param_f64_in, param_usize_in};
use gen_art_core::prng::Xorshift64;
use gen_art_core::{DVec2, Engine, Rgba};
use log::{debug, warn};
use serde_json::{json, Value};
use std::f64::consts::TAU;
use std::ops::RangeInclusive;

pub use tessellation::{tessellate, Ridge, Tessellation};

/// Clock advance per tick.
pub const TIME_STEP: f64 = 0.05;
const COLOR_FREQUENCY: f64 = 0.1;
const STROKE_WIDTH: f64 = 1.0;

const DEFAULT_NUM_POINTS: usize = 100;
const DEFAULT_MOVEMENT_SPEED: f64 = 1.0;

const NUM_POINTS_RANGE: RangeInclusive<usize> = tessellation::MIN_POINTS..=500;
const MOVEMENT_SPEED_RANGE: RangeInclusive<f64> = 0.0..=10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoronoiParams {
    pub num_points: usize,
    /// Distance each site moves per tick.
    pub movement_speed: f64,
}

impl Default for VoronoiParams {
    fn default() -> Self {
        Self {
            num_points: DEFAULT_NUM_POINTS,
            movement_speed: DEFAULT_MOVEMENT_SPEED,
        }
    }
}

impl VoronoiParams {
    pub fn from_json(params: &Value) -> Self {
        Self::default().merged(params)
    }

    /// Overrides from `params`, clamped; `num_points` never drops below four.
    pub fn merged(&self, params: &Value) -> Self {
        Self {
            num_points: param_usize_in(params, "num_points", self.num_points, NUM_POINTS_RANGE),
            movement_speed: param_f64_in(
                params,
                "movement_speed",
                self.movement_speed,
                MOVEMENT_SPEED_RANGE,
            ),
        }
    }
}

/// Direction site `index` of `count` moves in at `time`.
pub fn heading(index: usize, count: usize, time: f64) -> f64 {
    TAU * index as f64 / count as f64 + time
}

pub struct Voronoi {
    params: VoronoiParams,
    size: DVec2,
    seed: u64,
    rng: Xorshift64,
    time: f64,
    points: Vec<DVec2>,
    tessellation: Option<Tessellation>,
    drawing: Drawing,
}

impl Voronoi {
    /// Creates an engine with no sites; they are placed on the first tick.
    ///
    /// Returns `EngineError::InvalidDimensions` if width or height is zero.
    pub fn new(
        width: usize,
        height: usize,
        seed: u64,
        params: VoronoiParams,
    ) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions);
        }
        Ok(Self {
            params,
            size: DVec2::new(width as f64, height as f64),
            seed,
            rng: Xorshift64::new(seed),
            time: 0.0,
            points: Vec::new(),
            tessellation: None,
            drawing: Drawing::new(STROKE_WIDTH),
        })
    }

    pub fn from_json(
        width: usize,
        height: usize,
        seed: u64,
        json_params: &Value,
    ) -> Result<Self, EngineError> {
        Self::new(width, height, seed, VoronoiParams::from_json(json_params))
    }

    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn voronoi_params(&self) -> &VoronoiParams {
        &self.params
    }

    /// Tessellation behind the current drawing, if a tick has run.
    pub fn tessellation(&self) -> Option<&Tessellation> {
        self.tessellation.as_ref()
    }

    fn place_sites(&mut self) {
        let (w, h) = (self.size.x, self.size.y);
        let rng = &mut self.rng;
        self.points = (0..self.params.num_points)
            .map(|_| rng.next_point(w, h))
            .collect();
        debug!("placed {} voronoi sites", self.points.len());
    }

    fn move_sites(&mut self) {
        let n = self.points.len();
        let speed = self.params.movement_speed;
        let size = self.size;
        for (i, p) in self.points.iter_mut().enumerate() {
            let (sin, cos) = heading(i, n, self.time).sin_cos();
            let moved = *p + DVec2::new(cos, sin) * speed;
            *p = wrap_point(moved, size);
        }
    }
}

impl Engine for Voronoi {
    fn step(&mut self) -> Result<(), EngineError> {
        if self.points.is_empty() {
            self.place_sites();
        }
        self.move_sites();
        let tess = match tessellate(&self.points) {
            Ok(tess) => tess,
            Err(e) => {
                warn!("skipping tessellation at t={:.2}: {e}", self.time);
                self.time += TIME_STEP;
                return Err(e);
            }
        };
        self.drawing = Drawing {
            shapes: tess
                .bounded_segments()
                .map(|(a, b)| Shape::path(vec![a, b], Rgba::sine_gray(a.x, a.y, COLOR_FREQUENCY)))
                .collect(),
            stroke_width: STROKE_WIDTH,
        };
        debug!(
            "tessellated {} sites: {} vertices, {} ridges drawn",
            self.points.len(),
            tess.vertices.len(),
            self.drawing.shapes.len()
        );
        self.tessellation = Some(tess);
        self.time += TIME_STEP;
        Ok(())
    }

    fn drawing(&self) -> &Drawing {
        &self.drawing
    }

    fn params(&self) -> Value {
        json!({
            "num_points": self.params.num_points,
            "movement_speed": self.params.movement_speed,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "num_points": {
                "type": "integer",
                "default": DEFAULT_NUM_POINTS,
                "min": NUM_POINTS_RANGE.start(),
                "max": NUM_POINTS_RANGE.end(),
                "description": "Number of sites"
            },
            "movement_speed": {
                "type": "number",
                "default": DEFAULT_MOVEMENT_SPEED,
                "min": MOVEMENT_SPEED_RANGE.start(),
                "max": MOVEMENT_SPEED_RANGE.end(),
                "description": "Distance each site travels per tick"
            }
        })
    }

    /// Discards the sites; new ones are placed on the next tick.
    fn set_params(&mut self, params: &Value) -> Result<(), EngineError> {
        self.params = self.params.merged(params);
        self.points.clear();
        Ok(())
    }

    fn reset(&mut self) {
        self.params = VoronoiParams::default();
        self.rng = Xorshift64::new(self.seed);
        self.time = 0.0;
        self.points.clear();
        self.tessellation = None;
        self.drawing = Drawing::new(STROKE_WIDTH);
    }

    fn page(&self) -> Page {
        Page::canvas(self.size.x as usize, self.size.y as usize)
    }

    fn export_frame(&self) -> Option<Bounds> {
        Some(Bounds::canvas(self.size))
    }
}
