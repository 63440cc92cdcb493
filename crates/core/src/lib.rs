#![deny(unsafe_code)]
//! Core types and traits for the gen-art generative art system.
//!
//! Provides the `Engine` trait, the `Field` grid, the `FieldSource` vector
//! field trait, drawable geometry (`Drawing`, `Shape`, `Mark`) with its page
//! fit (`Bounds`, `Page`, `Placement`), `Rgba` colors, the `Xorshift64` PRNG,
//! reproducible `Seed` recipes, and parameter helpers.

pub mod color;
pub mod engine;
pub mod error;
pub mod field;
pub mod field_source;
pub mod geometry;
pub mod params;
pub mod prng;
pub mod seed;

pub use color::Rgba;
pub use engine::Engine;
pub use error::EngineError;
pub use field::Field;
pub use field_source::FieldSource;
pub use geometry::{wrap, wrap_point, Bounds, Drawing, Mark, Page, Placement, Projection, Shape};
pub use prng::Xorshift64;
pub use seed::Seed;

/// Re-exported so engine crates share one vector type.
pub use glam::DVec2;
