//! The first fabric sketch: uncentred threads whose motion slowly dies down.
//!
//! Every frame multiplies a slowdown factor by 0.995 before drawing, so the
//! weave settles over time. Touching any parameter revives it.

use gen_art_core::error::EngineError;
use gen_art_core::geometry::{Drawing, Page, Shape};
use gen_art_core::params::{param_f64_in, param_usize_in};
use gen_art_core::{Engine, Field, Rgba};
use log::debug;
use noise::Perlin;
use serde_json::{json, Value};
use std::ops::RangeInclusive;

use crate::noise_field::{octave_noise_field, thread_lines};

/// Where the classic fabric is exported when no path is given.
pub const DEFAULT_EXPORT_PATH: &str = "output/organic_fabric.svg";

/// Samples along every thread.
pub const NUM_POINTS: usize = 200;

const SLOWDOWN_DECAY: f64 = 0.995;
const THREAD_OPACITY: f64 = 0.7;

const NUM_THREADS_RANGE: RangeInclusive<usize> = 1..=50;
const NOISE_SCALE_RANGE: RangeInclusive<f64> = 0.05..=1.0;
const OCTAVES_RANGE: RangeInclusive<usize> = 1..=8;
const DISTORTION_RANGE: RangeInclusive<f64> = 0.01..=3.0;
const SPEED_RANGE: RangeInclusive<f64> = 0.005..=0.2;
const LINE_THICKNESS_RANGE: RangeInclusive<f64> = 0.1..=2.0;
const LINE_DENSITY_RANGE: RangeInclusive<f64> = 0.01..=0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassicParams {
    pub num_threads: usize,
    pub noise_scale: f64,
    pub octaves: u32,
    /// Displacement amplitude before slowdown.
    pub distortion: f64,
    /// Noise offset advanced per frame.
    pub speed: f64,
    pub line_thickness: f64,
    /// Horizontal distance between threads; thread 0 sits at x = 0.
    pub line_density: f64,
}

impl Default for ClassicParams {
    fn default() -> Self {
        Self {
            num_threads: 1,
            noise_scale: 0.2,
            octaves: 4,
            distortion: 1.0,
            speed: 0.01,
            line_thickness: 0.5,
            line_density: 0.05,
        }
    }
}

impl ClassicParams {
    pub fn merged(&self, params: &Value) -> Self {
        Self {
            num_threads: param_usize_in(params, "num_threads", self.num_threads, NUM_THREADS_RANGE),
            noise_scale: param_f64_in(params, "noise_scale", self.noise_scale, NOISE_SCALE_RANGE),
            octaves: param_usize_in(params, "octaves", self.octaves as usize, OCTAVES_RANGE) as u32,
            distortion: param_f64_in(params, "distortion", self.distortion, DISTORTION_RANGE),
            speed: param_f64_in(params, "speed", self.speed, SPEED_RANGE),
            line_thickness: param_f64_in(
                params,
                "line_thickness",
                self.line_thickness,
                LINE_THICKNESS_RANGE,
            ),
            line_density: param_f64_in(params, "line_density", self.line_density, LINE_DENSITY_RANGE),
        }
    }
}

/// Dark blue at 70% opacity.
fn thread_color() -> Rgba {
    Rgba::rgb(0, 0, 139).with_opacity(THREAD_OPACITY)
}

pub struct ClassicFabric {
    params: ClassicParams,
    noise: Perlin,
    frame: u64,
    slowdown: f64,
    field: Field,
    drawing: Drawing,
}

impl ClassicFabric {
    pub fn new(params: ClassicParams) -> Result<Self, EngineError> {
        Ok(Self {
            noise: Perlin::new(0),
            frame: 0,
            slowdown: 1.0,
            field: Field::new(params.num_threads, NUM_POINTS)?,
            drawing: Drawing::new(params.line_thickness),
            params,
        })
    }

    pub fn from_json(json_params: &Value) -> Result<Self, EngineError> {
        Self::new(ClassicParams::default().merged(json_params))
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Current amplitude multiplier, in (0, 1].
    pub fn slowdown(&self) -> f64 {
        self.slowdown
    }

    pub fn classic_params(&self) -> &ClassicParams {
        &self.params
    }

    fn render(&mut self, offset: f64) -> Result<(), EngineError> {
        let p = self.params;
        self.field = octave_noise_field(
            &self.noise,
            NUM_POINTS,
            p.num_threads,
            p.noise_scale,
            p.octaves,
            offset,
        )?;
        self.slowdown *= SLOWDOWN_DECAY;
        self.drawing = Drawing {
            shapes: thread_lines(
                &self.field,
                0.0,
                p.line_density,
                p.distortion * self.slowdown,
            )
            .into_iter()
            .map(|line| Shape::path(line, thread_color()))
            .collect(),
            stroke_width: p.line_thickness,
        };
        Ok(())
    }
}

impl Engine for ClassicFabric {
    fn step(&mut self) -> Result<(), EngineError> {
        self.render(self.frame as f64 * self.params.speed)?;
        self.frame += 1;
        Ok(())
    }

    fn drawing(&self) -> &Drawing {
        &self.drawing
    }

    fn params(&self) -> Value {
        let p = &self.params;
        json!({
            "num_threads": p.num_threads,
            "noise_scale": p.noise_scale,
            "octaves": p.octaves,
            "distortion": p.distortion,
            "speed": p.speed,
            "line_thickness": p.line_thickness,
            "line_density": p.line_density,
        })
    }

    fn param_schema(&self) -> Value {
        let d = ClassicParams::default();
        json!({
            "num_threads": {
                "type": "integer", "default": d.num_threads,
                "min": NUM_THREADS_RANGE.start(), "max": NUM_THREADS_RANGE.end(),
                "description": "Number of threads"
            },
            "noise_scale": {
                "type": "number", "default": d.noise_scale,
                "min": NOISE_SCALE_RANGE.start(), "max": NOISE_SCALE_RANGE.end(),
                "description": "Noise scale"
            },
            "octaves": {
                "type": "integer", "default": d.octaves,
                "min": OCTAVES_RANGE.start(), "max": OCTAVES_RANGE.end(),
                "description": "Wave size: number of noise octaves"
            },
            "distortion": {
                "type": "number", "default": d.distortion,
                "min": DISTORTION_RANGE.start(), "max": DISTORTION_RANGE.end(),
                "description": "Distortion amplitude"
            },
            "speed": {
                "type": "number", "default": d.speed,
                "min": SPEED_RANGE.start(), "max": SPEED_RANGE.end(),
                "description": "Animation speed: noise offset per frame"
            },
            "line_thickness": {
                "type": "number", "default": d.line_thickness,
                "min": LINE_THICKNESS_RANGE.start(), "max": LINE_THICKNESS_RANGE.end(),
                "description": "Line thickness"
            },
            "line_density": {
                "type": "number", "default": d.line_density,
                "min": LINE_DENSITY_RANGE.start(), "max": LINE_DENSITY_RANGE.end(),
                "description": "Line density: spacing between threads"
            }
        })
    }

    /// Revives the motion and redraws at offset 0; the frame counter is kept.
    fn set_params(&mut self, params: &Value) -> Result<(), EngineError> {
        self.params = self.params.merged(params);
        self.slowdown = 1.0;
        debug!("classic fabric params updated: {:?}", self.params);
        self.render(0.0)
    }

    fn reset(&mut self) {
        self.params = ClassicParams::default();
        self.frame = 0;
        self.slowdown = 1.0;
        self.drawing = Drawing::new(self.params.line_thickness);
    }

    fn page(&self) -> Page {
        Page::A4
    }
}
