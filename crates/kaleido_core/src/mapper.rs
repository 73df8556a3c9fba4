use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;
use crate::mirrors::{Geometry, MirrorConfig, ThirdMirror};

/// Iteration bound for the reflection loop.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MapSettings {
    pub max_iterations: u32,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            max_iterations: 100,
        }
    }
}

/// Per-point result of the fold into the fundamental domain.
///
/// `lyapunov` is the derivative magnitude of the composed reflection map in
/// the pixel metric: rigid reflections contribute 1, circle inversions
/// contribute their conformal factor `r^2 / d^2` at the pre-image. A large
/// value means the neighborhood of the point was stretched, which image
/// samplers use as a quality hint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MapOutcome {
    Converged {
        lyapunov: f64,
        reflections: u32,
        iterations: u32,
    },
    /// Iteration bound exceeded, or the point lies outside the valid mapping
    /// region (the Poincare disc, for hyperbolic configs). An expected
    /// per-point outcome, not an error.
    Failed,
}

impl MapOutcome {
    /// Sentinel reported by `lyapunov()` for failed points.
    pub const FAILURE_SENTINEL: f64 = -1.0;

    pub fn converged(&self) -> bool {
        matches!(self, MapOutcome::Converged { .. })
    }

    pub fn lyapunov(&self) -> f64 {
        match self {
            MapOutcome::Converged { lyapunov, .. } => *lyapunov,
            MapOutcome::Failed => Self::FAILURE_SENTINEL,
        }
    }

    pub fn reflections(&self) -> u32 {
        match self {
            MapOutcome::Converged { reflections, .. } => *reflections,
            MapOutcome::Failed => 0,
        }
    }
}

/// Folds `p` into the fundamental domain of `config` by repeated reflection,
/// mutating it in place. Pure in `(p, config)`: no state survives the call.
///
/// Each pass applies the third mirror if `p` lies on its outside, then the
/// dihedral fold; the pass order is fixed, so results are reproducible. The
/// loop converges when neither acts.
pub fn map_to_fundamental_domain(
    config: &MirrorConfig,
    p: &mut Vec2,
    settings: &MapSettings,
) -> MapOutcome {
    if config.geometry() == Geometry::Hyperbolic && p.norm_squared() >= config.world_radius2() {
        return MapOutcome::Failed;
    }
    let mut reflections = config.dihedral().fold(p);
    let mut lyapunov = 1.0;

    let third = match config.third_mirror() {
        Some(third) => third,
        // wedge: the single fold is the whole map
        None => {
            return MapOutcome::Converged {
                lyapunov,
                reflections,
                iterations: 0,
            }
        }
    };

    let mut iterations = 0;
    while iterations < settings.max_iterations {
        iterations += 1;
        let acted = apply_third_mirror(third, p, &mut lyapunov, &mut reflections);
        if !acted && config.dihedral().is_inside(p) {
            // do not hand out points outside the Poincare disc
            if config.geometry() == Geometry::Hyperbolic
                && p.norm_squared() >= config.world_radius2()
            {
                return MapOutcome::Failed;
            }
            return MapOutcome::Converged {
                lyapunov,
                reflections,
                iterations,
            };
        }
        reflections += config.dihedral().fold(p);
    }
    MapOutcome::Failed
}

fn apply_third_mirror(
    third: &ThirdMirror,
    p: &mut Vec2,
    lyapunov: &mut f64,
    reflections: &mut u32,
) -> bool {
    match third {
        ThirdMirror::Line(line) => {
            if line.signed_distance(p) > 0.0 {
                line.reflect(p);
                *reflections += 1;
                true
            } else {
                false
            }
        }
        ThirdMirror::InvertOutsideIn(circle) => {
            if !circle.contains(p) {
                let (mapped, factor) = circle.invert(p);
                *p = mapped;
                *lyapunov *= factor;
                *reflections += 1;
                true
            } else {
                false
            }
        }
        // the circle center lies outside the disc, so d^2 stays bounded
        // away from zero for every point the pre-check lets through
        ThirdMirror::InvertInsideOut(circle) => {
            if circle.contains(p) {
                let (mapped, factor) = circle.invert(p);
                *p = mapped;
                *lyapunov *= factor;
                *reflections += 1;
                true
            } else {
                false
            }
        }
    }
}
