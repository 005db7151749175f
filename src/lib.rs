//! Greedy stochastic stencil placement for grayscale image approximation
//!
//! A blank canvas is darkened one stamp at a time. Every round samples random
//! positions, scales and rotations for a fixed stencil, renders each trial,
//! scores it against the target with mean squared error and commits the best
//! trial. The committed placements replay deterministically into every
//! intermediate canvas.

#![forbid(unsafe_code)]

/// Placement search, compositing and replay
pub mod algorithm;
/// Error metrics and stamp center selection
pub mod analysis;
/// Input/output operations and error handling
pub mod io;
/// Mathematical utilities for percentiles and filtering
pub mod math;
/// Rasters, stencils and their transforms
pub mod spatial;

pub use io::error::{Result, StencilError};
