//! PNG preview of a [`Drawing`].
//!
//! Feature-gated behind `png` (default on) so builds that only need SVG export
//! do not pull in the `image` crate. The rasterisation itself lives in
//! [`crate::pixel`] (always available).

use gen_art_core::error::EngineError;
use gen_art_core::geometry::{Drawing, Projection};
use std::path::Path;

use crate::pixel::rasterize;

/// Rasterises `drawing` through `projection` and writes it as a PNG image.
///
/// Returns `EngineError::InvalidDimensions` if the size is zero or overflows
/// `u32`, or `EngineError::Io` on write failure.
pub fn write_png<P: Projection + ?Sized>(
    drawing: &Drawing,
    projection: &P,
    width: usize,
    height: usize,
    path: &Path,
) -> Result<(), EngineError> {
    if width == 0 || height == 0 {
        return Err(EngineError::InvalidDimensions);
    }
    let w = u32::try_from(width).map_err(|_| EngineError::InvalidDimensions)?;
    let h = u32::try_from(height).map_err(|_| EngineError::InvalidDimensions)?;
    let rgba = rasterize(drawing, projection, width, height);
    let img = image::RgbaImage::from_raw(w, h, rgba)
        .ok_or_else(|| EngineError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| EngineError::Io(e.to_string()))
}
