use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::dihedral::Dihedral;
use crate::geometry::{Circle, GeometryError, Line, Vec2};

/// Classification by the corner angle sum 1/k + 1/m + 1/n.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Geometry {
    /// Angle sum above 1: tiling of the sphere, seen in stereographic
    /// projection. The equator projects to the world circle.
    Elliptic,
    /// Angle sum exactly 1: tiling of the plane.
    Euclidic,
    /// Angle sum below 1: tiling of the Poincare disc.
    Hyperbolic,
}

/// The third side of the triangle, opposite the center corner. Carries its
/// reflection rule: straight mirror, or circle inversion in the direction
/// that moves points towards the fundamental domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ThirdMirror {
    Line(Line),
    /// Elliptic: maps the far exterior into the triangle.
    InvertOutsideIn(Circle),
    /// Hyperbolic: maps the disc interior region inside the circle out.
    InvertInsideOut(Circle),
}

/// Classification tolerance for the angle sum.
const ANGLE_SUM_TOLERANCE: f64 = 1e-6;

/// Where the euclidic third mirror crosses the x-axis.
pub const EUCLIDIC_MIRROR_INTERCEPT: f64 = 1.0;

/// Immutable mirror set for one choice of symmetry orders. Rebuilt wholesale
/// on parameter change; the mapper takes it by shared reference, so one
/// config can serve any number of concurrent pixel computations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MirrorConfig {
    k: u32,
    m: u32,
    n: u32,
    geometry: Geometry,
    dihedral: Dihedral,
    third: Option<ThirdMirror>,
    world_radius: f64,
    world_radius2: f64,
}

impl MirrorConfig {
    /// Builds the mirror set for symmetry orders `k` (center corner), `m`
    /// (corner on the oblique mirror) and `n` (corner on the x-axis).
    ///
    /// `m` or `n` equal to 1 degenerates the triangle to a wedge: the config
    /// is then the plain dihedral group of order `k` with no third mirror.
    /// Zero orders and out-of-range `k` are rejected, as are triangle
    /// configurations whose curved mirror has no real radius.
    pub fn new(k: u32, m: u32, n: u32) -> Result<Self, GeometryError> {
        let dihedral = Dihedral::new(k)?;
        if m == 0 {
            return Err(GeometryError::InvalidOrder(m));
        }
        if n == 0 {
            return Err(GeometryError::InvalidOrder(n));
        }
        if m < 2 || n < 2 {
            return Ok(Self {
                k,
                m,
                n,
                geometry: Geometry::Euclidic,
                dihedral,
                third: None,
                world_radius: f64::INFINITY,
                world_radius2: f64::INFINITY,
            });
        }

        let gamma = PI / k as f64;
        let alpha = PI / n as f64;
        let beta = PI / m as f64;
        let angle_sum = 1.0 / k as f64 + 1.0 / m as f64 + 1.0 / n as f64;

        if angle_sum > 1.0 + ANGLE_SUM_TOLERANCE {
            // inverting circle of radius 1, rescaled so the projected
            // equator has radius 1
            // negated mirror image of the hyperbolic center
            let cy = -alpha.cos();
            let cx = -(alpha.cos() / gamma.tan() + beta.cos() / gamma.sin());
            let disc = 1.0 - cx * cx - cy * cy;
            if disc <= 1e-9 {
                return Err(GeometryError::DegenerateTriangle { k, m, n });
            }
            let factor = 1.0 / disc.sqrt();
            let circle = Circle::new(Vec2::new(factor * cx, factor * cy), factor)?;
            Ok(Self {
                k,
                m,
                n,
                geometry: Geometry::Elliptic,
                dihedral,
                third: Some(ThirdMirror::InvertOutsideIn(circle)),
                world_radius: 1.0,
                world_radius2: 1.0,
            })
        } else if angle_sum > 1.0 - ANGLE_SUM_TOLERANCE {
            let line = Line::new(
                alpha.sin(),
                alpha.cos(),
                EUCLIDIC_MIRROR_INTERCEPT * alpha.sin(),
            )?;
            Ok(Self {
                k,
                m,
                n,
                geometry: Geometry::Euclidic,
                dihedral,
                third: Some(ThirdMirror::Line(line)),
                world_radius: f64::INFINITY,
                world_radius2: f64::INFINITY,
            })
        } else {
            // inverting circle of radius 1, rescaled so the Poincare disc
            // has radius 1; its center lies outside the disc
            let cy = alpha.cos();
            let cx = cy / gamma.tan() + beta.cos() / gamma.sin();
            let disc = cx * cx + cy * cy - 1.0;
            if disc <= 1e-9 {
                return Err(GeometryError::DegenerateTriangle { k, m, n });
            }
            let factor = 1.0 / disc.sqrt();
            let circle = Circle::new(Vec2::new(factor * cx, factor * cy), factor)?;
            Ok(Self {
                k,
                m,
                n,
                geometry: Geometry::Hyperbolic,
                dihedral,
                third: Some(ThirdMirror::InvertInsideOut(circle)),
                world_radius: 1.0,
                world_radius2: 1.0,
            })
        }
    }

    /// Rescales the curved third mirror so the world radius (Poincare disc
    /// or projected equator) becomes `radius`. Euclidic and wedge configs
    /// have no intrinsic scale and are returned unchanged.
    pub fn with_world_radius(&self, radius: f64) -> Result<Self, GeometryError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(GeometryError::InvalidRadius(radius));
        }
        match self.third {
            Some(ThirdMirror::InvertOutsideIn(circle)) => {
                let scaled = circle.scaled(radius / self.world_radius);
                Ok(Self {
                    third: Some(ThirdMirror::InvertOutsideIn(scaled)),
                    world_radius: radius,
                    world_radius2: radius * radius,
                    ..*self
                })
            }
            Some(ThirdMirror::InvertInsideOut(circle)) => {
                let scaled = circle.scaled(radius / self.world_radius);
                Ok(Self {
                    third: Some(ThirdMirror::InvertInsideOut(scaled)),
                    world_radius: radius,
                    world_radius2: radius * radius,
                    ..*self
                })
            }
            _ => Ok(*self),
        }
    }

    pub fn orders(&self) -> (u32, u32, u32) {
        (self.k, self.m, self.n)
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn dihedral(&self) -> &Dihedral {
        &self.dihedral
    }

    pub fn third_mirror(&self) -> Option<&ThirdMirror> {
        self.third.as_ref()
    }

    pub fn world_radius(&self) -> f64 {
        self.world_radius
    }

    pub fn world_radius2(&self) -> f64 {
        self.world_radius2
    }

    /// The straight mirrors bounding the wedge, in canonical form.
    pub fn straight_mirrors(&self) -> Result<[Line; 2], GeometryError> {
        self.dihedral.mirrors()
    }

    /// Fundamental-domain membership test.
    pub fn is_inside(&self, p: &Vec2) -> bool {
        if !self.dihedral.is_inside(p) {
            return false;
        }
        match &self.third {
            None => true,
            Some(ThirdMirror::Line(line)) => line.is_inside(p),
            Some(ThirdMirror::InvertOutsideIn(circle)) => circle.contains(p),
            Some(ThirdMirror::InvertInsideOut(circle)) => {
                p.norm_squared() < self.world_radius2 && !circle.contains(p)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Geometry, MirrorConfig, ThirdMirror};
    use crate::geometry::{GeometryError, Vec2};

    fn config(k: u32, m: u32, n: u32) -> MirrorConfig {
        MirrorConfig::new(k, m, n).expect("config should construct")
    }

    #[test]
    fn classifies_by_angle_sum() {
        assert_eq!(config(6, 3, 2).geometry(), Geometry::Euclidic);
        assert_eq!(config(3, 3, 3).geometry(), Geometry::Euclidic);
        assert_eq!(config(4, 4, 2).geometry(), Geometry::Euclidic);
        assert_eq!(config(7, 3, 2).geometry(), Geometry::Hyperbolic);
        assert_eq!(config(5, 4, 2).geometry(), Geometry::Hyperbolic);
        assert_eq!(config(2, 3, 3).geometry(), Geometry::Elliptic);
        assert_eq!(config(3, 3, 2).geometry(), Geometry::Elliptic);
    }

    #[test]
    fn curved_constructions_have_unit_world_radius() {
        for (k, m, n) in [(7, 3, 2), (5, 4, 2), (2, 3, 3), (3, 3, 2)] {
            let config = config(k, m, n);
            assert!((config.world_radius() - 1.0).abs() < 1e-9);
            let circle = match config.third_mirror() {
                Some(ThirdMirror::InvertOutsideIn(c)) => c,
                Some(ThirdMirror::InvertInsideOut(c)) => c,
                other => panic!("expected a curved mirror, got {other:?}"),
            };
            let center2 = circle.center().norm_squared();
            let radius2 = circle.radius() * circle.radius();
            let world2 = match config.geometry() {
                Geometry::Elliptic => radius2 - center2,
                Geometry::Hyperbolic => center2 - radius2,
                Geometry::Euclidic => unreachable!(),
            };
            assert!(
                (world2 - 1.0).abs() < 1e-9,
                "world radius squared should be 1 for ({k}, {m}, {n}), got {world2}"
            );
        }
    }

    #[test]
    fn elliptic_center_opposes_the_fundamental_domain() {
        // (3, 2, 3): angle sum 7/6, both center components nonzero
        let config = config(3, 2, 3);
        assert_eq!(config.geometry(), Geometry::Elliptic);
        let circle = match config.third_mirror() {
            Some(ThirdMirror::InvertOutsideIn(c)) => c,
            other => panic!("expected elliptic mirror, got {other:?}"),
        };
        let scale = circle.radius();
        let center = circle.center() / scale;
        assert!((center.x + 0.5 / (std::f64::consts::PI / 3.0).tan()).abs() < 1e-9);
        assert!((center.y + 0.5).abs() < 1e-9);
    }

    #[test]
    fn unit_corner_orders_degenerate_to_wedge() {
        let wedge = config(5, 1, 7);
        assert!(wedge.third_mirror().is_none());
        assert_eq!(wedge.geometry(), Geometry::Euclidic);
        assert!(wedge.is_inside(&Vec2::new(1.0, 0.1)));
    }

    #[test]
    fn rejects_invalid_orders() {
        assert!(matches!(
            MirrorConfig::new(0, 3, 2),
            Err(GeometryError::InvalidOrder(0))
        ));
        assert!(matches!(
            MirrorConfig::new(200, 3, 2),
            Err(GeometryError::InvalidOrder(200))
        ));
        assert!(matches!(
            MirrorConfig::new(6, 0, 2),
            Err(GeometryError::InvalidOrder(0))
        ));
        assert!(matches!(
            MirrorConfig::new(6, 3, 0),
            Err(GeometryError::InvalidOrder(0))
        ));
    }

    #[test]
    fn with_world_radius_rescales_curved_mirror() {
        let config = config(7, 3, 2)
            .with_world_radius(0.97)
            .expect("rescale should succeed");
        assert!((config.world_radius() - 0.97).abs() < 1e-12);
        let circle = match config.third_mirror() {
            Some(ThirdMirror::InvertInsideOut(c)) => c,
            other => panic!("expected hyperbolic mirror, got {other:?}"),
        };
        let world2 = circle.center().norm_squared() - circle.radius() * circle.radius();
        assert!((world2 - 0.9409).abs() < 1e-9);
    }

    #[test]
    fn with_world_radius_rejects_invalid_radius() {
        let config = config(7, 3, 2);
        assert!(matches!(
            config.with_world_radius(0.0),
            Err(GeometryError::InvalidRadius(_))
        ));
        assert!(matches!(
            config.with_world_radius(f64::NAN),
            Err(GeometryError::InvalidRadius(_))
        ));
    }

    #[test]
    fn euclidic_inside_test_bounds_the_triangle() {
        let config = config(6, 3, 2);
        assert!(config.is_inside(&Vec2::new(0.5, 0.1)));
        assert!(config.is_inside(&Vec2::new(0.0, 0.0)));
        // beyond the third mirror at x = 1
        assert!(!config.is_inside(&Vec2::new(2.0, 0.1)));
        // below the x-axis mirror
        assert!(!config.is_inside(&Vec2::new(0.5, -0.1)));
    }

    #[test]
    fn hyperbolic_inside_test_requires_disc_membership() {
        let config = config(7, 3, 2);
        assert!(config.is_inside(&Vec2::new(0.1, 0.01)));
        assert!(!config.is_inside(&Vec2::new(1.5, 0.1)));
    }
}
