//! Pixel-space driver for the kaleidoscope mapping engine.
//!
//! Connects the core mapper to a framebuffer: an invertible view transform
//! takes pixel indices to plane coordinates, every pixel is folded into the
//! fundamental domain (rows in parallel, the mirror set is read-only), and
//! the resulting map grid is composited either as a structure visualization
//! keyed by reflection parity or by sampling an input image at the mapped
//! coordinates.

pub mod driver;
pub mod sampler;
pub mod transform;
