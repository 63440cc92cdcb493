//! The core `Engine` trait that every generative artwork implements.
//!
//! The trait is object-safe so artworks can be used as `dyn Engine` for
//! runtime selection by name.

use crate::error::EngineError;
use crate::geometry::{Bounds, Drawing, Page};
use serde_json::Value;
use std::time::Duration;

/// Nominal timer period used when an engine does not specify one.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Core trait for generative artworks.
///
/// Each engine owns an immutable-between-updates parameter struct and a
/// mutable simulation state. A tick recomputes the field, advances the state,
/// and rebuilds the [`Drawing`] that both the previewer and the SVG exporter
/// consume.
///
/// This trait is **object-safe**: you can use `Box<dyn Engine>` or `&dyn Engine`
/// for runtime polymorphism.
pub trait Engine {
    /// Advance the simulation by one tick.
    fn step(&mut self) -> Result<(), EngineError>;

    /// Geometry of the last computed frame.
    fn drawing(&self) -> &Drawing;

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing all parameters: type, range, default, description.
    fn param_schema(&self) -> Value;

    /// Applies a partial parameter update.
    ///
    /// Keys missing from `params` keep their current value and out-of-range
    /// values are clamped. Each engine then applies its own reset policy
    /// (keep the phase, or discard particles and re-seed on the next tick).
    fn set_params(&mut self, params: &Value) -> Result<(), EngineError>;

    /// Restores default parameters, zeroes the clock and clears derived state.
    fn reset(&mut self);

    /// Nominal period between ticks.
    fn tick_interval(&self) -> Duration {
        DEFAULT_TICK_INTERVAL
    }

    /// Page the SVG exporter fits this engine's drawing onto.
    fn page(&self) -> Page {
        Page::A4
    }

    /// Fixed region of data space that fills the exported page.
    ///
    /// `None` fits the drawing's own bounds. Engines that draw in canvas
    /// coordinates return the canvas, so geometry running off it never
    /// rescales the frame.
    fn export_frame(&self) -> Option<Bounds> {
        None
    }
}
