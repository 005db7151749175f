//! Spatial data structures and raster manipulation
//!
//! This module contains spatial-related functionality including:
//! - Brightness rasters used for targets, canvases and stencils
//! - Stencil generation from polygon geometry
//! - Scaling and rotation of stencils

/// Single-channel brightness rasters
pub mod raster;
/// Stencil generation and introspection
pub mod template;
/// Resampling and rotation of stencils
pub mod transform;

pub use raster::Raster;
pub use template::ShapeTemplate;
