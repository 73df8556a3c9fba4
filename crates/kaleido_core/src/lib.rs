//! Core engine for dihedral kaleidoscope mappings.
//!
//! A triangle with corner angles pi/k, pi/m, pi/n generates a reflection
//! group whose mirror images tile the plane (euclidic), the Poincare disc
//! (hyperbolic) or the stereographically projected sphere (elliptic).
//! Repeatedly reflecting a point across the mirrors folds the whole tiling
//! into a single fundamental domain.
//!
//! Key components:
//! - **Geometry**: `Vec2`, canonical-form `Line`, inverting `Circle`.
//! - **Dihedral**: the rotation/mirror group at the center corner.
//! - **Mirrors**: `MirrorConfig` built once from the symmetry orders (k, m, n).
//! - **Mapper**: the iterative fold into the fundamental domain, tracking the
//!   reflection count and the accumulated conformal scale factor.

pub mod dihedral;
pub mod geometry;
pub mod mapper;
pub mod mirrors;
