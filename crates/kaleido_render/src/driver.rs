use anyhow::{bail, Result};
use kaleido_core::mapper::{map_to_fundamental_domain, MapOutcome, MapSettings};
use kaleido_core::mirrors::MirrorConfig;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::sampler::{ImageSampler, Rgba};
use crate::transform::ViewTransform;

/// Per-pixel mapping results as flat arrays, one entry per pixel in row-major
/// order. `lyapunov < 0` marks pixels whose mapping failed; their `x`/`y`
/// entries are meaningless and must not be sampled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapGrid {
    pub width: usize,
    pub height: usize,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub lyapunov: Vec<f64>,
    pub reflections: Vec<u32>,
    pub iterations: Vec<u32>,
}

impl MapGrid {
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct PixelSample {
    x: f64,
    y: f64,
    lyapunov: f64,
    reflections: u32,
    iterations: u32,
}

/// Maps every pixel of a `width` x `height` framebuffer into the fundamental
/// domain. Rows are computed in parallel: the mirror set is read-only and
/// pixels share no state, so the only ordering is the final row concatenation.
pub fn compute_grid(
    config: &MirrorConfig,
    view: &ViewTransform,
    settings: &MapSettings,
    width: usize,
    height: usize,
) -> Result<MapGrid> {
    if width == 0 || height == 0 {
        bail!("Grid dimensions must be positive.");
    }

    let rows: Vec<Vec<PixelSample>> = (0..height)
        .into_par_iter()
        .map(|row| {
            let mut samples = Vec::with_capacity(width);
            for col in 0..width {
                let mut p = view.to_plane(col as f64, row as f64);
                let outcome = map_to_fundamental_domain(config, &mut p, settings);
                let iterations = match outcome {
                    MapOutcome::Converged { iterations, .. } => iterations,
                    MapOutcome::Failed => settings.max_iterations,
                };
                samples.push(PixelSample {
                    x: p.x,
                    y: p.y,
                    lyapunov: outcome.lyapunov(),
                    reflections: outcome.reflections(),
                    iterations,
                });
            }
            samples
        })
        .collect();

    let mut grid = MapGrid {
        width,
        height,
        x: Vec::with_capacity(width * height),
        y: Vec::with_capacity(width * height),
        lyapunov: Vec::with_capacity(width * height),
        reflections: Vec::with_capacity(width * height),
        iterations: Vec::with_capacity(width * height),
    };
    for row in rows {
        for sample in row {
            grid.x.push(sample.x);
            grid.y.push(sample.y);
            grid.lyapunov.push(sample.lyapunov);
            grid.reflections.push(sample.reflections);
            grid.iterations.push(sample.iterations);
        }
    }
    Ok(grid)
}

/// Two-tone coloring of the mirror structure by reflection parity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StructurePalette {
    pub even: Rgba,
    pub odd: Rgba,
    pub background: Rgba,
}

impl Default for StructurePalette {
    fn default() -> Self {
        Self {
            even: Rgba::WHITE,
            odd: Rgba::new(64, 64, 64, 255),
            background: Rgba::TRANSPARENT,
        }
    }
}

/// Colors each pixel by the parity of its reflection count; failed pixels
/// get the background color.
pub fn render_structure(grid: &MapGrid, palette: &StructurePalette) -> Vec<Rgba> {
    (0..grid.len())
        .map(|i| {
            if grid.lyapunov[i] < 0.0 {
                palette.background
            } else if grid.reflections[i] % 2 == 0 {
                palette.even
            } else {
                palette.odd
            }
        })
        .collect()
}

/// Samples the input image at the mapped coordinates of every converged
/// pixel, passing the Lyapunov factor through as the quality hint. Failed
/// pixels and coordinates outside the image get the background color.
pub fn render_image<S>(grid: &MapGrid, sampler: &S, background: Rgba) -> Vec<Rgba>
where
    S: ImageSampler + Sync,
{
    (0..grid.len())
        .into_par_iter()
        .map(|i| {
            let lyapunov = grid.lyapunov[i];
            if lyapunov < 0.0 {
                background
            } else {
                sampler
                    .sample_quality(grid.x[i], grid.y[i], lyapunov)
                    .unwrap_or(background)
            }
        })
        .collect()
}
