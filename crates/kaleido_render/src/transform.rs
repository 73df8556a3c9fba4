use anyhow::{bail, Result};
use kaleido_core::geometry::Vec2;
use serde::{Deserialize, Serialize};

/// Invertible affine map between pixel indices and plane coordinates:
/// `plane = corner + scale * pixel`. Pan and zoom are changes of corner and
/// scale; the mapper never sees pixel units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ViewTransform {
    scale: f64,
    corner_x: f64,
    corner_y: f64,
}

impl ViewTransform {
    pub fn new(scale: f64, corner_x: f64, corner_y: f64) -> Result<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            bail!("View scale must be positive and finite.");
        }
        if !corner_x.is_finite() || !corner_y.is_finite() {
            bail!("View corner must be finite.");
        }
        Ok(Self {
            scale,
            corner_x,
            corner_y,
        })
    }

    /// Window centered on the origin with plane half-height `extent`.
    pub fn centered(width: usize, height: usize, extent: f64) -> Result<Self> {
        if width == 0 || height == 0 {
            bail!("View dimensions must be positive.");
        }
        if !extent.is_finite() || extent <= 0.0 {
            bail!("View extent must be positive and finite.");
        }
        let scale = 2.0 * extent / height as f64;
        Self::new(scale, -0.5 * scale * width as f64, -extent)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn to_plane(&self, col: f64, row: f64) -> Vec2 {
        Vec2::new(
            self.corner_x + self.scale * col,
            self.corner_y + self.scale * row,
        )
    }

    pub fn to_pixel(&self, v: &Vec2) -> (f64, f64) {
        (
            (v.x - self.corner_x) / self.scale,
            (v.y - self.corner_y) / self.scale,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::ViewTransform;

    fn assert_err_contains<T: std::fmt::Debug>(result: anyhow::Result<T>, needle: &str) {
        let err = result.expect_err("expected error");
        let message = format!("{err}");
        assert!(
            message.contains(needle),
            "expected error to contain \"{needle}\", got \"{message}\""
        );
    }

    #[test]
    fn rejects_invalid_parameters() {
        assert_err_contains(ViewTransform::new(0.0, 0.0, 0.0), "scale");
        assert_err_contains(ViewTransform::new(f64::NAN, 0.0, 0.0), "scale");
        assert_err_contains(ViewTransform::new(1.0, f64::INFINITY, 0.0), "corner");
        assert_err_contains(ViewTransform::centered(0, 10, 1.0), "dimensions");
        assert_err_contains(ViewTransform::centered(10, 10, -1.0), "extent");
    }

    #[test]
    fn to_plane_and_to_pixel_are_inverse() {
        let view = ViewTransform::new(0.05, -2.0, -1.5).expect("view should construct");
        let p = view.to_plane(17.0, 23.0);
        let (col, row) = view.to_pixel(&p);
        assert!((col - 17.0).abs() < 1e-12);
        assert!((row - 23.0).abs() < 1e-12);
    }

    #[test]
    fn centered_window_spans_the_extent() {
        let view = ViewTransform::centered(200, 100, 1.5).expect("view should construct");
        let top = view.to_plane(100.0, 0.0);
        let bottom = view.to_plane(100.0, 100.0);
        assert!((top.y + 1.5).abs() < 1e-12);
        assert!((bottom.y - 1.5).abs() < 1e-12);
        assert!(top.x.abs() < 1e-12);
    }
}
