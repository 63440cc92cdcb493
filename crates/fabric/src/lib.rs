#![deny(unsafe_code)]
//! Organic fabric engine.
//!
//! A handful of vertical threads hang side by side; every tick a multi-octave
//! Perlin field is sampled along each thread and pushes its points sideways
//! and (twice as far) lengthwise, giving the characteristic woven wave. The
//! noise is offset by a phase that advances with every frame.
//!
//! [`classic`] holds the earlier sketch of the same idea, and [`view`] the
//! pan/tilt navigation used by the on-screen preview.

pub mod classic;
pub mod noise_field;
pub mod view;

use gen_art_core::error::EngineError;
use gen_art_core::field::Field;
use gen_art_core::geometry::{Drawing, Page, Shape};
use gen_art_core::params::{param_f64_in, param_u32, param_usize_in};
use gen_art_core::{Engine, Rgba};
use log::debug;
use noise::Perlin;
use serde_json::{json, Value};
use std::ops::RangeInclusive;
use std::time::Duration;

pub use classic::{ClassicFabric, ClassicParams};
pub use view::{Button, View};

use noise_field::{octave_noise_field, thread_lines};

/// Phase advance per frame.
const PHASE_STEP: f64 = 0.01;
/// Dark grey with some transparency.
const THREAD_COLOR: Rgba = Rgba::rgba(64, 64, 64, 180);
const TICK_INTERVAL: Duration = Duration::from_millis(50);

const DEFAULT_NUM_POINTS: usize = 50;
const DEFAULT_NUM_THREADS: usize = 1;
const DEFAULT_NOISE_SCALE: f64 = 0.2;
const DEFAULT_OCTAVES: u32 = 4;
const DEFAULT_MOVEMENT: f64 = 1.0;
const DEFAULT_LINE_THICKNESS: f64 = 0.5;
const DEFAULT_LINE_SPACING: f64 = 0.05;

const NUM_POINTS_RANGE: RangeInclusive<usize> = 2..=1000;
const NUM_THREADS_RANGE: RangeInclusive<usize> = 1..=80;
const NOISE_SCALE_RANGE: RangeInclusive<f64> = 0.05..=0.70;
const OCTAVES_RANGE: RangeInclusive<usize> = 1..=8;
const MOVEMENT_RANGE: RangeInclusive<f64> = 0.01..=3.0;
const LINE_THICKNESS_RANGE: RangeInclusive<f64> = 0.1..=2.0;
const LINE_SPACING_RANGE: RangeInclusive<f64> = 0.01..=0.20;

/// Tunable knobs of the fabric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FabricParams {
    /// Samples along each thread.
    pub num_points: usize,
    pub num_threads: usize,
    /// Base noise frequency ("fabric texture").
    pub noise_scale: f64,
    /// Number of noise octaves ("wave size").
    pub octaves: u32,
    /// Displacement amplitude.
    pub movement: f64,
    pub line_thickness: f64,
    /// Horizontal distance between neighbouring threads.
    pub line_spacing: f64,
    /// Perlin permutation seed.
    pub noise_seed: u32,
}

impl Default for FabricParams {
    fn default() -> Self {
        Self {
            num_points: DEFAULT_NUM_POINTS,
            num_threads: DEFAULT_NUM_THREADS,
            noise_scale: DEFAULT_NOISE_SCALE,
            octaves: DEFAULT_OCTAVES,
            movement: DEFAULT_MOVEMENT,
            line_thickness: DEFAULT_LINE_THICKNESS,
            line_spacing: DEFAULT_LINE_SPACING,
            noise_seed: 0,
        }
    }
}

impl FabricParams {
    /// Extracts parameters from a JSON object, falling back to defaults.
    pub fn from_json(params: &Value) -> Self {
        Self::default().merged(params)
    }

    /// Returns `self` overridden by whichever keys `params` carries, clamped
    /// to their ranges.
    pub fn merged(&self, params: &Value) -> Self {
        Self {
            num_points: param_usize_in(params, "num_points", self.num_points, NUM_POINTS_RANGE),
            num_threads: param_usize_in(params, "num_threads", self.num_threads, NUM_THREADS_RANGE),
            noise_scale: param_f64_in(params, "noise_scale", self.noise_scale, NOISE_SCALE_RANGE),
            octaves: param_usize_in(params, "octaves", self.octaves as usize, OCTAVES_RANGE) as u32,
            movement: param_f64_in(params, "movement", self.movement, MOVEMENT_RANGE),
            line_thickness: param_f64_in(
                params,
                "line_thickness",
                self.line_thickness,
                LINE_THICKNESS_RANGE,
            ),
            line_spacing: param_f64_in(params, "line_spacing", self.line_spacing, LINE_SPACING_RANGE),
            noise_seed: param_u32(params, "noise_seed", self.noise_seed),
        }
    }

    /// x of the leftmost thread, chosen so the threads are centred on zero.
    pub fn start_x(&self) -> f64 {
        -((self.num_threads - 1) as f64 * self.line_spacing) / 2.0
    }
}

/// The organic fabric engine.
pub struct Fabric {
    params: FabricParams,
    noise: Perlin,
    frame: u64,
    field: Field,
    drawing: Drawing,
    view: View,
}

impl Fabric {
    /// Creates a fabric at frame 0. Nothing is drawn until the first tick.
    pub fn new(params: FabricParams) -> Result<Self, EngineError> {
        Ok(Self {
            noise: Perlin::new(params.noise_seed),
            field: Field::new(params.num_threads, params.num_points)?,
            drawing: Drawing::new(params.line_thickness),
            frame: 0,
            view: View::default(),
            params,
        })
    }

    /// Creates a fabric from a JSON params object, falling back to defaults
    /// for missing keys.
    pub fn from_json(json_params: &Value) -> Result<Self, EngineError> {
        Self::new(FabricParams::from_json(json_params))
    }

    /// Frames computed so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Noise phase that the next tick samples at.
    pub fn phase(&self) -> f64 {
        self.frame as f64 * PHASE_STEP
    }

    /// The displacement field behind the last computed frame.
    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn fabric_params(&self) -> &FabricParams {
        &self.params
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }
}

impl Engine for Fabric {
    fn step(&mut self) -> Result<(), EngineError> {
        let p = self.params;
        self.field = octave_noise_field(
            &self.noise,
            p.num_points,
            p.num_threads,
            p.noise_scale,
            p.octaves,
            self.phase(),
        )?;
        self.drawing = Drawing {
            shapes: thread_lines(&self.field, p.start_x(), p.line_spacing, p.movement)
                .into_iter()
                .map(|line| Shape::path(line, THREAD_COLOR))
                .collect(),
            stroke_width: p.line_thickness,
        };
        self.frame += 1;
        Ok(())
    }

    fn drawing(&self) -> &Drawing {
        &self.drawing
    }

    fn params(&self) -> Value {
        let p = &self.params;
        json!({
            "num_points": p.num_points,
            "num_threads": p.num_threads,
            "noise_scale": p.noise_scale,
            "octaves": p.octaves,
            "movement": p.movement,
            "line_thickness": p.line_thickness,
            "line_spacing": p.line_spacing,
            "noise_seed": p.noise_seed,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "num_points": {
                "type": "integer",
                "default": DEFAULT_NUM_POINTS,
                "min": NUM_POINTS_RANGE.start(),
                "max": NUM_POINTS_RANGE.end(),
                "description": "Samples along each thread"
            },
            "num_threads": {
                "type": "integer",
                "default": DEFAULT_NUM_THREADS,
                "min": NUM_THREADS_RANGE.start(),
                "max": NUM_THREADS_RANGE.end(),
                "description": "Number of threads"
            },
            "noise_scale": {
                "type": "number",
                "default": DEFAULT_NOISE_SCALE,
                "min": NOISE_SCALE_RANGE.start(),
                "max": NOISE_SCALE_RANGE.end(),
                "description": "Fabric texture: base frequency of the noise"
            },
            "octaves": {
                "type": "integer",
                "default": DEFAULT_OCTAVES,
                "min": OCTAVES_RANGE.start(),
                "max": OCTAVES_RANGE.end(),
                "description": "Wave size: number of noise octaves summed"
            },
            "movement": {
                "type": "number",
                "default": DEFAULT_MOVEMENT,
                "min": MOVEMENT_RANGE.start(),
                "max": MOVEMENT_RANGE.end(),
                "description": "Movement amount: displacement amplitude"
            },
            "line_thickness": {
                "type": "number",
                "default": DEFAULT_LINE_THICKNESS,
                "min": LINE_THICKNESS_RANGE.start(),
                "max": LINE_THICKNESS_RANGE.end(),
                "description": "Thread thickness"
            },
            "line_spacing": {
                "type": "number",
                "default": DEFAULT_LINE_SPACING,
                "min": LINE_SPACING_RANGE.start(),
                "max": LINE_SPACING_RANGE.end(),
                "description": "Thread spacing"
            },
            "noise_seed": {
                "type": "integer",
                "default": 0,
                "min": 0,
                "max": u32::MAX,
                "description": "Perlin permutation seed"
            }
        })
    }

    /// Keeps the phase and redraws immediately with the new parameters.
    fn set_params(&mut self, params: &Value) -> Result<(), EngineError> {
        let next = self.params.merged(params);
        if next.noise_seed != self.params.noise_seed {
            self.noise = Perlin::new(next.noise_seed);
        }
        self.params = next;
        debug!("fabric params updated at frame {}: {:?}", self.frame, self.params);
        self.step()
    }

    fn reset(&mut self) {
        self.params = FabricParams::default();
        self.noise = Perlin::new(self.params.noise_seed);
        self.frame = 0;
        self.view = View::default();
        self.drawing = Drawing::new(self.params.line_thickness);
    }

    fn tick_interval(&self) -> Duration {
        TICK_INTERVAL
    }

    fn page(&self) -> Page {
        Page::A4
    }
}
