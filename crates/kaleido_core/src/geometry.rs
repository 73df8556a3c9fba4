use nalgebra::Vector2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 2D point or direction in the mapping plane.
pub type Vec2 = Vector2<f64>;

/// Tolerance for canonical-form disambiguation and approximate line equality.
pub const LINE_EPSILON: f64 = 0.001;

#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("mirror order {0} is out of range (1..=100)")]
    InvalidOrder(u32),
    #[error("normal vector has zero length")]
    ZeroNormal,
    #[error("geometric input is not finite")]
    NonFinite,
    #[error("circle radius must be positive, got {0}")]
    InvalidRadius(f64),
    #[error("symmetry orders ({k}, {m}, {n}) give a degenerate mirror configuration")]
    DegenerateTriangle { k: u32, m: u32, n: u32 },
}

/// Straight mirror in canonical normal form: a unit normal `n` and a distance
/// `d >= 0` from the origin, so that the line is `{p : dot(p, n) = d}`.
///
/// Lines through the origin get a unique representative by orienting the
/// normal towards positive x (or positive y when the normal is vertical).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    normal: Vec2,
    distance: f64,
}

impl Line {
    /// Builds the canonical form from an unnormalized normal and a signed
    /// distance. Zero-length normals and non-finite input are rejected.
    pub fn new(nx: f64, ny: f64, d: f64) -> Result<Self, GeometryError> {
        if !(nx.is_finite() && ny.is_finite() && d.is_finite()) {
            return Err(GeometryError::NonFinite);
        }
        let norm = (nx * nx + ny * ny).sqrt();
        if norm < 1e-12 {
            return Err(GeometryError::ZeroNormal);
        }
        let mut nx = nx / norm;
        let mut ny = ny / norm;
        let mut d = d / norm;
        if d < 0.0 {
            nx = -nx;
            ny = -ny;
            d = -d;
        }
        if d < LINE_EPSILON {
            // unique representative for lines through the origin
            let flip = if nx.abs() > LINE_EPSILON {
                nx < 0.0
            } else {
                ny < 0.0
            };
            if flip {
                nx = -nx;
                ny = -ny;
            }
        }
        Ok(Self {
            normal: Vec2::new(nx, ny),
            distance: d,
        })
    }

    pub fn normal(&self) -> Vec2 {
        self.normal
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Componentwise comparison of the canonical forms within `LINE_EPSILON`.
    pub fn approx_eq(&self, other: &Line) -> bool {
        (self.normal.x - other.normal.x).abs() < LINE_EPSILON
            && (self.normal.y - other.normal.y).abs() < LINE_EPSILON
            && (self.distance - other.distance).abs() < LINE_EPSILON
    }

    /// Positive on the outer half-plane (the side the normal points into).
    pub fn signed_distance(&self, p: &Vec2) -> f64 {
        self.normal.dot(p) - self.distance
    }

    pub fn is_inside(&self, p: &Vec2) -> bool {
        self.signed_distance(p) <= 0.0
    }

    /// Reflects `p` across the line in place. Rigid, scale factor 1.
    pub fn reflect(&self, p: &mut Vec2) {
        let s = self.signed_distance(p);
        *p -= 2.0 * s * self.normal;
    }
}

/// Curved mirror: reflections across it are circle inversions, which are
/// conformal but not rigid in the pixel metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    center: Vec2,
    radius: f64,
}

impl Circle {
    pub fn new(center: Vec2, radius: f64) -> Result<Self, GeometryError> {
        if !(center.x.is_finite() && center.y.is_finite() && radius.is_finite()) {
            return Err(GeometryError::NonFinite);
        }
        if radius <= 0.0 {
            return Err(GeometryError::InvalidRadius(radius));
        }
        Ok(Self { center, radius })
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn contains(&self, p: &Vec2) -> bool {
        (p - self.center).norm_squared() < self.radius * self.radius
    }

    pub fn scaled(&self, factor: f64) -> Circle {
        Circle {
            center: self.center * factor,
            radius: self.radius * factor.abs(),
        }
    }

    /// Inverts `p` at the circle, `z -> c + r^2 / conj(z - c)`, returning the
    /// image point and the conformal derivative magnitude `r^2 / |z - c|^2`
    /// (the local scale factor of the inversion at the pre-image).
    ///
    /// Callers must not pass the circle center itself; the mapper only
    /// inverts points whose distance to the center is bounded away from zero.
    pub fn invert(&self, p: &Vec2) -> (Vec2, f64) {
        let c = Complex64::new(self.center.x, self.center.y);
        let z = Complex64::new(p.x, p.y);
        let r2 = self.radius * self.radius;
        let offset = z - c;
        let factor = r2 / offset.norm_sqr();
        let w = c + r2 / offset.conj();
        (Vec2::new(w.re, w.im), factor)
    }
}
