//! Field sources: 2D vector fields sampled at any point and time.
//!
//! A [`FieldSource`] returns a displacement for a position at a given global
//! time. The flow engine advects particles through one; closures of the shape
//! `Fn(DVec2, f64) -> DVec2` are field sources too, which keeps tests and
//! ad-hoc steering fields short.
//!
//! All implementations must be deterministic: same inputs, same output.

use glam::DVec2;

/// A source of 2D displacement vectors.
pub trait FieldSource {
    /// Sample the field at position `p` at the given time.
    fn sample(&self, p: DVec2, time: f64) -> DVec2;
}

impl<F> FieldSource for F
where
    F: Fn(DVec2, f64) -> DVec2,
{
    fn sample(&self, p: DVec2, time: f64) -> DVec2 {
        self(p, time)
    }
}
