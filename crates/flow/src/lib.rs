#![deny(unsafe_code)]
//! Fluid flow engine.
//!
//! Thousands of particles drift through a time-varying angle field built from
//! three sine waves. The canvas is a torus: a particle leaving one edge
//! re-enters on the opposite one, so the particle count never changes.

use gen_art_core::error::EngineError;
use gen_art_core::geometry::{wrap_point, Bounds, Drawing, Page, Shape};
use gen_art_core::params::{param_f64_in, param_usize_in};
use gen_art_core::prng::Xorshift64;
use gen_art_core::{DVec2, Engine, FieldSource, Rgba};
use log::debug;
use serde_json::{json, Value};
use std::f64::consts::PI;
use std::ops::RangeInclusive;
use std::time::Duration;

/// Global time advance per tick.
pub const TIME_STEP: f64 = 0.01;
/// Frequency of the position-dependent grey shading.
const COLOR_FREQUENCY: f64 = 0.01;
/// About 60 ticks per second.
const TICK_INTERVAL: Duration = Duration::from_millis(16);

const DEFAULT_NUM_PARTICLES: usize = 5000;
const DEFAULT_FLOW_SCALE: f64 = 0.005;
const DEFAULT_SPEED: f64 = 1.0;
const DEFAULT_PARTICLE_SIZE: usize = 1;

const NUM_PARTICLES_RANGE: RangeInclusive<usize> = 0..=20_000;
const FLOW_SCALE_RANGE: RangeInclusive<f64> = 0.0001..=0.01;
const SPEED_RANGE: RangeInclusive<f64> = 0.1..=10.0;
const PARTICLE_SIZE_RANGE: RangeInclusive<usize> = 1..=5;

/// Angle field `(sin(x*s + t) + sin(y*s + t) + sin((x + y)*s + t)) * PI`,
/// sampled as a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SineFlow {
    pub scale: f64,
}

impl SineFlow {
    pub fn angle(&self, p: DVec2, time: f64) -> f64 {
        let s = self.scale;
        ((p.x * s + time).sin() + (p.y * s + time).sin() + ((p.x + p.y) * s + time).sin()) * PI
    }
}

impl FieldSource for SineFlow {
    fn sample(&self, p: DVec2, time: f64) -> DVec2 {
        let (sin, cos) = self.angle(p, time).sin_cos();
        DVec2::new(cos, sin)
    }
}

/// Moves every particle one step along `source`, scaled by `speed`, on a
/// `size.x x size.y` torus.
pub fn advance<S: FieldSource + ?Sized>(
    particles: &mut [DVec2],
    source: &S,
    time: f64,
    speed: f64,
    size: DVec2,
) {
    for p in particles.iter_mut() {
        let moved = *p + source.sample(*p, time) * speed;
        *p = wrap_point(moved, size);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowParams {
    pub num_particles: usize,
    /// Spatial frequency of the flow field.
    pub flow_scale: f64,
    /// Distance travelled per tick.
    pub speed: f64,
    /// Dot diameter.
    pub particle_size: usize,
}

impl Default for FlowParams {
    fn default() -> Self {
        Self {
            num_particles: DEFAULT_NUM_PARTICLES,
            flow_scale: DEFAULT_FLOW_SCALE,
            speed: DEFAULT_SPEED,
            particle_size: DEFAULT_PARTICLE_SIZE,
        }
    }
}

impl FlowParams {
    pub fn from_json(params: &Value) -> Self {
        Self::default().merged(params)
    }

    pub fn merged(&self, params: &Value) -> Self {
        Self {
            num_particles: param_usize_in(
                params,
                "num_particles",
                self.num_particles,
                NUM_PARTICLES_RANGE,
            ),
            flow_scale: param_f64_in(params, "flow_scale", self.flow_scale, FLOW_SCALE_RANGE),
            speed: param_f64_in(params, "speed", self.speed, SPEED_RANGE),
            particle_size: param_usize_in(
                params,
                "particle_size",
                self.particle_size,
                PARTICLE_SIZE_RANGE,
            ),
        }
    }
}

/// Fluid flow engine over a `width x height` canvas.
pub struct Flow {
    params: FlowParams,
    size: DVec2,
    seed: u64,
    rng: Xorshift64,
    time: f64,
    particles: Vec<DVec2>,
    drawing: Drawing,
}

impl Flow {
    /// Creates an engine with no particles; they are scattered on the first tick.
    ///
    /// Returns `EngineError::InvalidDimensions` if width or height is zero.
    pub fn new(
        width: usize,
        height: usize,
        seed: u64,
        params: FlowParams,
    ) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions);
        }
        Ok(Self {
            size: DVec2::new(width as f64, height as f64),
            seed,
            rng: Xorshift64::new(seed),
            time: 0.0,
            particles: Vec::new(),
            drawing: Drawing::new(params.particle_size as f64),
            params,
        })
    }

    pub fn from_json(
        width: usize,
        height: usize,
        seed: u64,
        json_params: &Value,
    ) -> Result<Self, EngineError> {
        Self::new(width, height, seed, FlowParams::from_json(json_params))
    }

    pub fn particles(&self) -> &[DVec2] {
        &self.particles
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn flow_params(&self) -> &FlowParams {
        &self.params
    }

    fn scatter(&mut self) {
        let (w, h) = (self.size.x, self.size.y);
        let rng = &mut self.rng;
        self.particles = (0..self.params.num_particles)
            .map(|_| rng.next_point(w, h))
            .collect();
        debug!(
            "scattered {} particles over {}x{}",
            self.particles.len(),
            w,
            h
        );
    }
}

impl Engine for Flow {
    fn step(&mut self) -> Result<(), EngineError> {
        if self.particles.is_empty() && self.params.num_particles > 0 {
            self.scatter();
        }
        let source = SineFlow {
            scale: self.params.flow_scale,
        };
        advance(
            &mut self.particles,
            &source,
            self.time,
            self.params.speed,
            self.size,
        );
        self.time += TIME_STEP;
        self.drawing = Drawing {
            shapes: self
                .particles
                .iter()
                .map(|p| Shape::dot(*p, Rgba::sine_gray(p.x, p.y, COLOR_FREQUENCY)))
                .collect(),
            stroke_width: self.params.particle_size as f64,
        };
        Ok(())
    }

    fn drawing(&self) -> &Drawing {
        &self.drawing
    }

    fn params(&self) -> Value {
        json!({
            "num_particles": self.params.num_particles,
            "flow_scale": self.params.flow_scale,
            "speed": self.params.speed,
            "particle_size": self.params.particle_size,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "num_particles": {
                "type": "integer",
                "default": DEFAULT_NUM_PARTICLES,
                "min": NUM_PARTICLES_RANGE.start(),
                "max": NUM_PARTICLES_RANGE.end(),
                "description": "Number of particles"
            },
            "flow_scale": {
                "type": "number",
                "default": DEFAULT_FLOW_SCALE,
                "min": FLOW_SCALE_RANGE.start(),
                "max": FLOW_SCALE_RANGE.end(),
                "description": "Spatial frequency of the flow field"
            },
            "speed": {
                "type": "number",
                "default": DEFAULT_SPEED,
                "min": SPEED_RANGE.start(),
                "max": SPEED_RANGE.end(),
                "description": "Particle speed in pixels per tick"
            },
            "particle_size": {
                "type": "integer",
                "default": DEFAULT_PARTICLE_SIZE,
                "min": PARTICLE_SIZE_RANGE.start(),
                "max": PARTICLE_SIZE_RANGE.end(),
                "description": "Particle diameter"
            }
        })
    }

    /// Discards the particles; a fresh set is scattered on the next tick.
    fn set_params(&mut self, params: &Value) -> Result<(), EngineError> {
        self.params = self.params.merged(params);
        self.particles.clear();
        Ok(())
    }

    fn reset(&mut self) {
        self.params = FlowParams::default();
        self.rng = Xorshift64::new(self.seed);
        self.time = 0.0;
        self.particles.clear();
        self.drawing = Drawing::new(self.params.particle_size as f64);
    }

    fn tick_interval(&self) -> Duration {
        TICK_INTERVAL
    }

    fn page(&self) -> Page {
        Page::canvas(self.size.x as usize, self.size.y as usize)
    }

    fn export_frame(&self) -> Option<Bounds> {
        Some(Bounds::canvas(self.size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gen_art_core::geometry::Mark;

    fn flow(params: Value) -> Flow {
        Flow::from_json(200, 100, 42, &params).unwrap()
    }

    // ---- Flow field ----

    #[test]
    fn sine_flow_at_origin_and_time_zero_points_east() {
        let dir = SineFlow { scale: 0.005 }.sample(DVec2::ZERO, 0.0);
        assert_eq!(dir, DVec2::new(1.0, 0.0));
    }

    #[test]
    fn sine_flow_angle_matches_formula() {
        let flow = SineFlow { scale: 0.01 };
        let p = DVec2::new(30.0, 70.0);
        let t = 0.25;
        let expected = ((0.3_f64 + t).sin() + (0.7_f64 + t).sin() + (1.0_f64 + t).sin()) * PI;
        assert!((flow.angle(p, t) - expected).abs() < 1e-12);
        assert!((flow.sample(p, t).length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn advance_follows_a_closure_field() {
        let mut particles = vec![DVec2::new(199.5, 50.0)];
        let east = |_: DVec2, _: f64| DVec2::X;
        advance(&mut particles, &east, 0.0, 2.0, DVec2::new(200.0, 100.0));
        assert_eq!(particles[0], DVec2::new(1.5, 50.0));
    }

    // ---- Engine ----

    #[test]
    fn first_tick_scatters_every_particle() {
        let mut engine = flow(json!({"num_particles": 300}));
        assert!(engine.particles().is_empty());
        engine.step().unwrap();
        assert_eq!(engine.particles().len(), 300);
        assert_eq!(engine.drawing().shapes.len(), 300);
    }

    #[test]
    fn time_advances_by_a_hundredth_per_tick() {
        let mut engine = flow(json!({"num_particles": 10}));
        for _ in 0..5 {
            engine.step().unwrap();
        }
        assert!((engine.time() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn particles_are_shaded_by_position() {
        let mut engine = flow(json!({"num_particles": 20, "particle_size": 3}));
        engine.step().unwrap();
        let drawing = engine.drawing();
        assert_eq!(drawing.stroke_width, 3.0);
        for shape in &drawing.shapes {
            let Mark::Dot(p) = &shape.mark else {
                panic!("flow draws dots only");
            };
            assert_eq!(shape.color, Rgba::sine_gray(p.x, p.y, 0.01));
        }
    }

    #[test]
    fn zero_particles_steps_without_geometry() {
        let mut engine = flow(json!({"num_particles": 0}));
        engine.step().unwrap();
        assert!(engine.drawing().is_empty());
    }

    #[test]
    fn same_seed_same_particles() {
        let mut a = flow(json!({"num_particles": 50}));
        let mut b = flow(json!({"num_particles": 50}));
        for _ in 0..20 {
            a.step().unwrap();
            b.step().unwrap();
        }
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn set_params_discards_particles() {
        let mut engine = flow(json!({"num_particles": 50}));
        engine.step().unwrap();
        engine.set_params(&json!({"num_particles": 80})).unwrap();
        assert!(engine.particles().is_empty());
        engine.step().unwrap();
        assert_eq!(engine.particles().len(), 80);
    }

    #[test]
    fn reset_restores_defaults_and_time() {
        let mut engine = flow(json!({"num_particles": 50, "speed": 4.0}));
        engine.step().unwrap();
        engine.reset();
        assert_eq!(*engine.flow_params(), FlowParams::default());
        assert_eq!(engine.time(), 0.0);
        assert!(engine.particles().is_empty());
        assert!(engine.drawing().is_empty());
    }

    #[test]
    fn reset_replays_the_same_scatter() {
        let mut engine = flow(json!({}));
        engine.step().unwrap();
        let first = engine.particles().to_vec();
        engine.step().unwrap();
        engine.reset();
        engine.step().unwrap();
        assert_eq!(engine.particles(), first.as_slice());
    }

    #[test]
    fn out_of_range_params_are_clamped() {
        let p = FlowParams::from_json(&json!({
            "num_particles": 50_000,
            "flow_scale": 1.0,
            "speed": 0.0,
            "particle_size": 9,
        }));
        assert_eq!(p.num_particles, 20_000);
        assert_eq!(p.flow_scale, 0.01);
        assert_eq!(p.speed, 0.1);
        assert_eq!(p.particle_size, 5);
    }

    #[test]
    fn page_is_the_canvas() {
        let engine = flow(json!({}));
        assert_eq!(engine.page(), Page::canvas(200, 100));
        assert_eq!(engine.tick_interval(), Duration::from_millis(16));
        assert_eq!(
            engine.export_frame(),
            Some(Bounds::canvas(DVec2::new(200.0, 100.0)))
        );
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(matches!(
            Flow::from_json(0, 100, 1, &json!({})),
            Err(EngineError::InvalidDimensions)
        ));
    }

    // ---- Property-based tests ----

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn particles_stay_on_the_torus(
                seed in any::<u64>(),
                width in 1_usize..400,
                height in 1_usize..400,
                speed in 0.1_f64..=10.0,
                scale in 0.0001_f64..=0.01,
                ticks in 1_usize..40,
            ) {
                let params = json!({"num_particles": 64, "speed": speed, "flow_scale": scale});
                let mut engine = Flow::from_json(width, height, seed, &params).unwrap();
                for _ in 0..ticks {
                    engine.step().unwrap();
                    for p in engine.particles() {
                        prop_assert!(p.x >= 0.0 && p.x < width as f64, "x out of range: {}", p.x);
                        prop_assert!(p.y >= 0.0 && p.y < height as f64, "y out of range: {}", p.y);
                    }
                }
                prop_assert_eq!(engine.particles().len(), 64);
            }
        }
    }
}
