use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::geometry::{GeometryError, Line, Vec2};

/// Largest supported symmetry order at the center corner.
pub const MAX_ORDER: u32 = 100;

/// The rotation/mirror group of order `k` at the center corner. Its two
/// straight mirrors are the x-axis and the line at angle pi/k; the first
/// sector between them is `0 <= arg(p) <= pi/k`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Dihedral {
    order: u32,
    sector_angle: f64,
    // converts a polar angle to units of the full rotation step 2*pi/k
    sectors_per_turn: f64,
    cos_sector: f64,
    sin_sector: f64,
}

impl Dihedral {
    pub fn new(order: u32) -> Result<Self, GeometryError> {
        if order == 0 || order > MAX_ORDER {
            return Err(GeometryError::InvalidOrder(order));
        }
        let sector_angle = PI / order as f64;
        Ok(Self {
            order,
            sector_angle,
            sectors_per_turn: 0.5 / sector_angle,
            cos_sector: sector_angle.cos(),
            sin_sector: sector_angle.sin(),
        })
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    pub fn sector_angle(&self) -> f64 {
        self.sector_angle
    }

    /// True if `p` lies in the first sector (the wedge of the fundamental
    /// domain bounded by the two straight mirrors).
    pub fn is_inside(&self, p: &Vec2) -> bool {
        p.y >= 0.0 && p.y * self.cos_sector <= p.x * self.sin_sector
    }

    /// Folds `p` into the first sector by rotations and an x-axis mirror,
    /// returning the number of reflections used (0 if `p` was already
    /// inside, in which case `p` is left untouched). All reflections are
    /// rigid: the scale factor is 1.
    pub fn fold(&self, p: &mut Vec2) -> u32 {
        let mut sector = p.y.atan2(p.x) * self.sectors_per_turn;
        let turns = sector.floor();
        sector -= turns;
        let mut reflections = (turns.abs() as u32) * 2;
        if sector > 0.5 {
            sector = 1.0 - sector;
            reflections += 1;
        }
        if reflections == 0 {
            return 0;
        }
        let angle = sector / self.sectors_per_turn;
        let r = p.norm();
        *p = Vec2::new(r * angle.cos(), r * angle.sin());
        reflections
    }

    /// The two straight mirror lines in canonical form.
    pub fn mirrors(&self) -> Result<[Line; 2], GeometryError> {
        Ok([
            Line::new(0.0, 1.0, 0.0)?,
            Line::new(-self.sin_sector, self.cos_sector, 0.0)?,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::{Dihedral, MAX_ORDER};
    use crate::geometry::{GeometryError, Line, Vec2};

    #[test]
    fn rejects_out_of_range_orders() {
        assert!(matches!(
            Dihedral::new(0),
            Err(GeometryError::InvalidOrder(0))
        ));
        assert!(matches!(
            Dihedral::new(MAX_ORDER + 1),
            Err(GeometryError::InvalidOrder(_))
        ));
    }

    #[test]
    fn fold_leaves_interior_points_untouched() {
        let group = Dihedral::new(6).expect("group should construct");
        let mut p = Vec2::new(1.0, 0.2);
        let reflections = group.fold(&mut p);
        assert_eq!(reflections, 0);
        assert_eq!(p, Vec2::new(1.0, 0.2));
    }

    #[test]
    fn fold_maps_into_first_sector() {
        let group = Dihedral::new(6).expect("group should construct");
        let mut p = Vec2::new(-1.0, -0.3);
        let norm_before = p.norm();
        let reflections = group.fold(&mut p);
        assert!(reflections > 0);
        assert!(group.is_inside(&p));
        assert!((p.norm() - norm_before).abs() < 1e-12);
    }

    #[test]
    fn sector_boundary_counts_as_inside() {
        let group = Dihedral::new(6).expect("group should construct");
        assert!(group.is_inside(&Vec2::new(1.0, 0.0)));
        let angle = group.sector_angle();
        assert!(group.is_inside(&Vec2::new(angle.cos(), angle.sin())));
        let beyond = angle + 0.01;
        assert!(!group.is_inside(&Vec2::new(beyond.cos(), beyond.sin())));
        assert!(!group.is_inside(&Vec2::new(1.0, -0.01)));
    }

    #[test]
    fn mirrors_are_canonical_origin_lines() {
        let group = Dihedral::new(5).expect("group should construct");
        let [x_axis, oblique] = group.mirrors().expect("mirrors should construct");
        let expected = Line::new(0.0, 1.0, 0.0).expect("line should construct");
        assert!(x_axis.approx_eq(&expected));
        assert!((oblique.normal().norm() - 1.0).abs() < 1e-9);
        assert_eq!(oblique.distance(), 0.0);
    }
}
