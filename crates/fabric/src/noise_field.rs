//! Multi-octave Perlin displacement field and the thread geometry built on it.

use gen_art_core::error::EngineError;
use gen_art_core::field::Field;
use gen_art_core::DVec2;
use noise::{NoiseFn, Perlin};

/// Upper end of the vertical ramp every thread is laid along.
pub const THREAD_LENGTH: f64 = 10.0;

/// Builds an `num_points x num_threads` field (rows = points, columns = threads).
///
/// Octave `k` samples the noise at frequency `2^k` with amplitude
/// `1 / sqrt(2^k)`, at coordinates
/// `((i / num_points) * scale * freq + offset, (j / num_threads) * scale * freq + offset)`,
/// and the octaves are summed. The result depends only on the arguments and
/// the Perlin permutation, so identical inputs give a bit-identical field.
///
/// Returns `EngineError::InvalidDimensions` if either count is zero.
pub fn octave_noise_field(
    noise: &Perlin,
    num_points: usize,
    num_threads: usize,
    scale: f64,
    octaves: u32,
    offset: f64,
) -> Result<Field, EngineError> {
    let mut field = Field::new(num_threads, num_points)?;
    for octave in 0..octaves {
        let frequency = 2f64.powi(octave as i32);
        let amplitude = 1.0 / frequency.sqrt();
        let samples = (0..num_points)
            .flat_map(|i| (0..num_threads).map(move |j| (i, j)))
            .map(|(i, j)| {
                let x = (i as f64 / num_points as f64) * scale * frequency + offset;
                let y = (j as f64 / num_threads as f64) * scale * frequency + offset;
                noise.get([x, y])
            })
            .collect();
        let layer = Field::from_data(num_threads, num_points, samples)?;
        field.add_scaled_assign(&layer, amplitude)?;
    }
    Ok(field)
}

/// Linear ramp of `n` samples over `[0, THREAD_LENGTH]`, both ends included.
pub fn ramp(n: usize) -> impl Iterator<Item = f64> {
    let step = if n > 1 {
        THREAD_LENGTH / (n - 1) as f64
    } else {
        0.0
    };
    (0..n).map(move |i| i as f64 * step)
}

/// Turns a field into one polyline per thread.
///
/// Thread `j` starts at `x = start_x + j * spacing` on the ramp `y in [0, 10]`.
/// Each point `i` is pushed by `field(i, j) * amplitude` horizontally and twice
/// that vertically.
pub fn thread_lines(field: &Field, start_x: f64, spacing: f64, amplitude: f64) -> Vec<Vec<DVec2>> {
    (0..field.width())
        .map(|j| {
            let x_base = start_x + j as f64 * spacing;
            ramp(field.height())
                .zip(field.column(j))
                .map(|(y_base, d)| {
                    DVec2::new(x_base + d * amplitude, y_base + d * amplitude * 2.0)
                })
                .collect()
        })
        .collect()
}
