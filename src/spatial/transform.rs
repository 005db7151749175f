//! Geometric transforms applied to stencils before stamping
//!
//! Scaling resamples with a Lanczos filter so edges stay smooth; rotation
//! expands the output to hold the whole rotated stencil and samples the
//! source with nearest-neighbour lookups. Neither transform touches its input.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use ndarray::Array2;

use crate::io::error::{Result, invalid_parameter};
use crate::spatial::raster::Raster;

// Corner coordinates closer than this to an integer are treated as exact
const CORNER_SNAP: f64 = 1e-9;

/// Uniformly rescale a raster to `floor(side * scale)` on each axis
///
/// A scale small enough to truncate either side to zero yields an empty
/// raster, which stamps nothing.
///
/// # Errors
///
/// Returns an error if `scale` is not a finite positive number
pub fn resample(raster: &Raster, scale: f64) -> Result<Raster> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(invalid_parameter(
            "scale",
            &scale,
            &"scale must be a finite positive number",
        ));
    }

    let rows = (raster.rows() as f64 * scale) as usize;
    let cols = (raster.cols() as f64 * scale) as usize;

    if rows == 0 || cols == 0 {
        return Ok(Raster::filled(0, 0, 0));
    }
    if (rows, cols) == raster.shape() {
        return Ok(raster.clone());
    }

    let source = raster.to_luma()?;
    let resized = imageops::resize(&source, cols as u32, rows as u32, FilterType::Lanczos3);
    Raster::from_luma(resized)
}

/// Rotate a raster counter-clockwise by `degrees` about its center
///
/// The output grows to the bounding box of the rotated corners; area not
/// covered by the source is filled with zero (background).
///
/// # Errors
///
/// Returns an error if the raster is too large for an image buffer
// Quarter turns are matched exactly so they reduce to lossless transposes
#[allow(clippy::float_cmp)]
pub fn rotate_expand(raster: &Raster, degrees: f64) -> Result<Raster> {
    if raster.is_empty() || !degrees.is_finite() {
        return Ok(raster.clone());
    }

    let angle = degrees.rem_euclid(360.0);
    let rows = raster.rows();
    let cols = raster.cols();

    if angle == 0.0 {
        return Ok(raster.clone());
    }
    if angle == 90.0 {
        return Ok(Raster::from_array(Array2::from_shape_fn((cols, rows), |(r, c)| {
            raster.get(c, cols - 1 - r).unwrap_or(0)
        })));
    }
    if angle == 180.0 {
        return Ok(Raster::from_array(Array2::from_shape_fn((rows, cols), |(r, c)| {
            raster.get(rows - 1 - r, cols - 1 - c).unwrap_or(0)
        })));
    }
    if angle == 270.0 {
        return Ok(Raster::from_array(Array2::from_shape_fn((cols, rows), |(r, c)| {
            raster.get(rows - 1 - c, r).unwrap_or(0)
        })));
    }

    let (sin, cos) = angle.to_radians().sin_cos();
    let (new_cols, new_rows) = expanded_extent(cols as f64, rows as f64, sin, cos);

    // Projections place pixel centers on integer coordinates, and a positive
    // angle turns clockwise on screen
    let projection = Projection::translate(0.5 - cols as f32 / 2.0, 0.5 - rows as f32 / 2.0)
        .and_then(Projection::rotate(-angle.to_radians() as f32))
        .and_then(Projection::translate(
            new_cols as f32 / 2.0 - 0.5,
            new_rows as f32 / 2.0 - 0.5,
        ));

    let source = raster.to_luma()?;
    let mut rotated = GrayImage::new(new_cols as u32, new_rows as u32);
    warp_into(
        &source,
        &projection,
        Interpolation::Nearest,
        Luma([0]),
        &mut rotated,
    );

    Raster::from_luma(rotated)
}

/// Size (width, height) of the box holding a `width x height` rectangle after rotation
fn expanded_extent(width: f64, height: f64, sin: f64, cos: f64) -> (usize, usize) {
    let corners = [(0.0, 0.0), (width, 0.0), (width, height), (0.0, height)];
    let center_x = width / 2.0;
    let center_y = height / 2.0;

    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for (x, y) in corners {
        let dx = x - center_x;
        let dy = y - center_y;
        let rx = snap(dx.mul_add(cos, dy * sin) + center_x);
        let ry = snap((-dx).mul_add(sin, dy * cos) + center_y);
        min_x = min_x.min(rx);
        max_x = max_x.max(rx);
        min_y = min_y.min(ry);
        max_y = max_y.max(ry);
    }

    let new_width = (max_x.ceil() - min_x.floor()).max(1.0) as usize;
    let new_height = (max_y.ceil() - min_y.floor()).max(1.0) as usize;
    (new_width, new_height)
}

fn snap(value: f64) -> f64 {
    let nearest = value.round();
    if (value - nearest).abs() < CORNER_SNAP {
        nearest
    } else {
        value
    }
}
