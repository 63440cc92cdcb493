//! Two-dimensional scalar field indexed by (row, column).
//!
//! A `Field` stores `width * height` f64 values in row-major layout. Engines
//! use rows for the discretized point index and columns for the thread or
//! particle index, so `field.get(i, j)` reads point `i` of thread `j`.
//! Values are unbounded: noise accumulation produces signed displacements.

use crate::error::EngineError;

/// A 2D scalar field of `height` rows by `width` columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl Field {
    /// Creates a zero-filled field with `width` columns and `height` rows.
    ///
    /// Returns `EngineError::InvalidDimensions` if either dimension is zero
    /// or if `width * height` overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, EngineError> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0.0; len],
        })
    }

    /// Creates a field from a pre-built row-major data vector, validating that
    /// `data.len() == width * height`.
    pub fn from_data(width: usize, height: usize, data: Vec<f64>) -> Result<Self, EngineError> {
        let expected = checked_len(width, height)?;
        if data.len() != expected {
            return Err(EngineError::DimensionMismatch {
                lhs_w: width,
                lhs_h: height,
                rhs_w: data.len(),
                rhs_h: 1,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Read-only access to the underlying row-major data.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Value at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= height` or `col >= width`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(
            row < self.height && col < self.width,
            "({row}, {col}) outside {}x{} field",
            self.height,
            self.width
        );
        self.data[row * self.width + col]
    }

    /// Iterates over one column top to bottom.
    ///
    /// Yields nothing if `col` is out of range.
    pub fn column(&self, col: usize) -> impl Iterator<Item = f64> + '_ {
        let width = self.width;
        let rows = if col < width { self.height } else { 0 };
        (0..rows).map(move |row| self.data[row * width + col])
    }

    /// In-place `self += other * amplitude`, the accumulation step of a
    /// multi-octave sum.
    ///
    /// Returns `EngineError::DimensionMismatch` if the fields differ in size.
    pub fn add_scaled_assign(&mut self, other: &Field, amplitude: f64) -> Result<(), EngineError> {
        if self.width != other.width || self.height != other.height {
            return Err(EngineError::DimensionMismatch {
                lhs_w: self.width,
                lhs_h: self.height,
                rhs_w: other.width,
                rhs_h: other.height,
            });
        }
        self.data
            .iter_mut()
            .zip(other.data.iter())
            .for_each(|(a, b)| *a += b * amplitude);
        Ok(())
    }

}

fn checked_len(width: usize, height: usize) -> Result<usize, EngineError> {
    if width == 0 || height == 0 {
        return Err(EngineError::InvalidDimensions);
    }
    width
        .checked_mul(height)
        .ok_or(EngineError::InvalidDimensions)
}
