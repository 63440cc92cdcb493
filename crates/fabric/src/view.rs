//! On-screen view navigation for the fabric: pan, tilt and depth.
//!
//! The view only changes how the fabric is presented. Exported geometry is
//! always taken from data space, never through the view.

use gen_art_core::{DVec2, Projection};
use glam::{DMat4, DVec3};

/// Half-height of the orthographic volume the view is rendered into.
pub const ORTHO_HALF_HEIGHT: f64 = 10.0;

const DEFAULT_DISPLACEMENT: DVec3 = DVec3::new(0.0, -5.0, 0.0);
const DEFAULT_SCALE: f64 = 0.2;
const MIN_SCALE: f64 = 0.01;
const MAX_SCALE: f64 = 1.0;

/// Pointer button held during a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Drag translates the view.
    Primary,
    /// Drag rotates the view.
    Secondary,
}

/// Pan/rotate/zoom state of the fabric preview.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    displacement: DVec3,
    /// (pitch about x, yaw about y), in degrees.
    rotation: DVec2,
    scale: f64,
}

impl Default for View {
    fn default() -> Self {
        Self {
            displacement: DEFAULT_DISPLACEMENT,
            rotation: DVec2::ZERO,
            scale: DEFAULT_SCALE,
        }
    }
}

impl View {
    pub fn displacement(&self) -> DVec3 {
        self.displacement
    }

    pub fn rotation(&self) -> DVec2 {
        self.rotation
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Sets the overall scale, clamped to `[0.01, 1.0]`.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
    }

    /// Applies a pointer drag of `(dx, dy)` pixels.
    ///
    /// Primary translates by `(dx / 100, -dy / 100)`; secondary tilts by
    /// `dy / 5` degrees of pitch and `dx / 5` degrees of yaw.
    pub fn drag(&mut self, button: Button, dx: f64, dy: f64) {
        match button {
            Button::Primary => self.displacement += DVec3::new(dx / 100.0, -dy / 100.0, 0.0),
            Button::Secondary => self.rotation += DVec2::new(dy / 5.0, dx / 5.0),
        }
    }

    /// Applies a wheel event; one notch (120 units of angle delta) moves the
    /// view one unit in depth.
    pub fn scroll(&mut self, angle_delta: f64) {
        self.displacement.z += angle_delta / 120.0;
    }

    /// Model-view matrix: translate, pitch, yaw, then scale.
    pub fn matrix(&self) -> DMat4 {
        DMat4::from_translation(self.displacement)
            * DMat4::from_rotation_x(self.rotation.x.to_radians())
            * DMat4::from_rotation_y(self.rotation.y.to_radians())
            * DMat4::from_scale(DVec3::splat(self.scale))
    }

    /// Projection into pixel space of a `width x height` viewport that shows
    /// the orthographic volume `[-10 * aspect, 10 * aspect] x [-10, 10]`.
    pub fn screen_projection(&self, width: usize, height: usize) -> ScreenProjection {
        ScreenProjection {
            matrix: self.matrix(),
            width: width as f64,
            height: height.max(1) as f64,
        }
    }
}

impl Projection for View {
    /// View-space position of a data-space point, depth dropped.
    fn project(&self, p: DVec2) -> DVec2 {
        self.matrix()
            .transform_point3(DVec3::new(p.x, p.y, 0.0))
            .truncate()
    }
}

/// A view composed with the viewport mapping; y grows downward in pixels.
#[derive(Debug, Clone, Copy)]
pub struct ScreenProjection {
    matrix: DMat4,
    width: f64,
    height: f64,
}

impl Projection for ScreenProjection {
    fn project(&self, p: DVec2) -> DVec2 {
        let v = self.matrix.transform_point3(DVec3::new(p.x, p.y, 0.0));
        let aspect = self.width / self.height;
        let ndc = DVec2::new(
            v.x / (ORTHO_HALF_HEIGHT * aspect),
            v.y / ORTHO_HALF_HEIGHT,
        );
        DVec2::new(
            (ndc.x + 1.0) / 2.0 * self.width,
            (1.0 - ndc.y) / 2.0 * self.height,
        )
    }
}
