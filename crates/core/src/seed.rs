//! Reproducible recipe for a rendered frame.
//!
//! A [`Seed`] captures everything needed to recreate an export: engine name,
//! canvas dimensions, parameter overrides, PRNG seed, and tick count. The CLI
//! writes one next to an export with `--save-seed` and reads it back with
//! `replay`.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reproducible recipe for one frame of an artwork.
///
/// Two identical `Seed` values fed to the same binary produce the same
/// drawing, and therefore byte-identical SVG output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seed {
    pub engine: String,
    pub width: usize,
    pub height: usize,
    #[serde(default = "empty_object")]
    pub params: Value,
    pub seed: u64,
    #[serde(default)]
    pub steps: usize,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

impl Seed {
    /// Creates a new Seed with empty params (`{}`) and zero steps.
    pub fn new(engine: &str, width: usize, height: usize, seed: u64) -> Self {
        Self {
            engine: engine.to_string(),
            width,
            height,
            params: empty_object(),
            seed,
            steps: 0,
        }
    }

    /// Replaces the parameter overrides.
    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }

    /// Replaces the tick count.
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    /// Validates that the canvas has non-zero dimensions and that
    /// `width * height` does not overflow.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.width == 0 || self.height == 0 {
            return Err(EngineError::InvalidDimensions);
        }
        self.width
            .checked_mul(self.height)
            .ok_or(EngineError::InvalidDimensions)?;
        Ok(())
    }
}
