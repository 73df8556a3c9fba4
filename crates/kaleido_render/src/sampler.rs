use anyhow::{bail, Result};
use kaleido_core::geometry::Vec2;
use serde::{Deserialize, Serialize};

use crate::transform::ViewTransform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
}

/// Color source at mapped plane coordinates. `None` means the coordinates
/// fall outside the image; the driver substitutes its background color.
pub trait ImageSampler {
    fn sample(&self, x: f64, y: f64) -> Option<Rgba>;

    /// Sampling with the accumulated map stretch as a quality hint. The
    /// default ignores the hint.
    fn sample_quality(&self, x: f64, y: f64, _lyapunov: f64) -> Option<Rgba> {
        self.sample(x, y)
    }
}

/// Owned RGBA raster with its own placement in the plane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RasterImage {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
    view: ViewTransform,
}

impl RasterImage {
    pub fn new(
        width: usize,
        height: usize,
        pixels: Vec<Rgba>,
        view: ViewTransform,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            bail!("Image dimensions must be positive.");
        }
        if pixels.len() != width * height {
            bail!(
                "Pixel buffer length ({}) does not match dimensions ({}x{}).",
                pixels.len(),
                width,
                height
            );
        }
        Ok(Self {
            width,
            height,
            pixels,
            view,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn texel(&self, col: usize, row: usize) -> Rgba {
        self.pixels[row * self.width + col]
    }

    /// Nearest-texel lookup in pixel coordinates.
    pub fn nearest(&self, px: f64, py: f64) -> Option<Rgba> {
        let col = px.round();
        let row = py.round();
        if col < 0.0 || row < 0.0 || col >= self.width as f64 || row >= self.height as f64 {
            return None;
        }
        Some(self.texel(col as usize, row as usize))
    }

    /// Bilinear interpolation in pixel coordinates.
    pub fn bilinear(&self, px: f64, py: f64) -> Option<Rgba> {
        if px < 0.0 || py < 0.0 || px > (self.width - 1) as f64 || py > (self.height - 1) as f64 {
            return None;
        }
        let x0 = px.floor() as usize;
        let y0 = py.floor() as usize;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let tx = px - x0 as f64;
        let ty = py - y0 as f64;

        let blend = |channel: fn(Rgba) -> u8| -> u8 {
            let c00 = channel(self.texel(x0, y0)) as f64;
            let c10 = channel(self.texel(x1, y0)) as f64;
            let c01 = channel(self.texel(x0, y1)) as f64;
            let c11 = channel(self.texel(x1, y1)) as f64;
            let top = c00 + (c10 - c00) * tx;
            let bottom = c01 + (c11 - c01) * tx;
            (top + (bottom - top) * ty).round() as u8
        };
        Some(Rgba::new(
            blend(|c| c.r),
            blend(|c| c.g),
            blend(|c| c.b),
            blend(|c| c.a),
        ))
    }
}

impl ImageSampler for RasterImage {
    fn sample(&self, x: f64, y: f64) -> Option<Rgba> {
        let (px, py) = self.view.to_pixel(&Vec2::new(x, y));
        self.bilinear(px, py)
    }

    /// Stretched regions (lyapunov > 1) get the interpolating filter,
    /// contracted ones the cheap nearest lookup.
    fn sample_quality(&self, x: f64, y: f64, lyapunov: f64) -> Option<Rgba> {
        let (px, py) = self.view.to_pixel(&Vec2::new(x, y));
        if lyapunov > 1.0 {
            self.bilinear(px, py)
        } else {
            self.nearest(px, py)
        }
    }
}
