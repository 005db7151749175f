//! Similarity scores between equal-size rasters
//!
//! Mean squared error is the optimization objective of the placement search.
//! Structural similarity is computed for reporting only and never feeds back
//! into the search.

use ndarray::{Array2, Slice, Zip};

use crate::io::configuration::{DATA_RANGE, SSIM_K1, SSIM_K2, SSIM_WINDOW};
use crate::io::error::{Result, ensure_same_shape, invalid_parameter};
use crate::math::filter::uniform_filter;
use crate::spatial::Raster;

/// Average of the squared per-pixel differences; lower is better
///
/// # Errors
///
/// Returns an error if:
/// - The rasters differ in dimensions
/// - The rasters are empty
pub fn mean_squared_error(a: &Raster, b: &Raster) -> Result<f64> {
    ensure_same_shape("mean squared error", a.shape(), b.shape())?;
    if a.is_empty() {
        return Err(invalid_parameter(
            "raster",
            &"0 pixels",
            &"cannot score empty rasters",
        ));
    }

    Ok(sum_squared_error(a, b) as f64 / a.len() as f64)
}

/// Exact sum of squared per-pixel differences
///
/// Callers must ensure the rasters share a shape; extra pixels of the larger
/// raster are ignored.
pub fn sum_squared_error(a: &Raster, b: &Raster) -> u64 {
    a.pixels()
        .iter()
        .zip(b.pixels().iter())
        .map(|(&x, &y)| {
            let d = u64::from(x.abs_diff(y));
            d * d
        })
        .sum()
}

/// Windowed structural similarity index in `[-1, 1]`; higher is better
///
/// Uses a `7 x 7` uniform window, sample covariances and the 8-bit dynamic
/// range. The score is the mean of the local index over every window that
/// fits entirely inside the rasters.
///
/// # Errors
///
/// Returns an error if:
/// - The rasters differ in dimensions
/// - Either side is shorter than the similarity window
pub fn structural_similarity(a: &Raster, b: &Raster) -> Result<f64> {
    ensure_same_shape("structural similarity", a.shape(), b.shape())?;
    let (rows, cols) = a.shape();
    if rows < SSIM_WINDOW || cols < SSIM_WINDOW {
        return Err(invalid_parameter(
            "raster",
            &format!("{rows}x{cols}"),
            &format!("both sides must be at least {SSIM_WINDOW} pixels"),
        ));
    }

    let x: Array2<f64> = a.pixels().mapv(f64::from);
    let y: Array2<f64> = b.pixels().mapv(f64::from);

    let mean_x = uniform_filter(&x, SSIM_WINDOW);
    let mean_y = uniform_filter(&y, SSIM_WINDOW);
    let mean_xx = uniform_filter(&(&x * &x), SSIM_WINDOW);
    let mean_yy = uniform_filter(&(&y * &y), SSIM_WINDOW);
    let mean_xy = uniform_filter(&(&x * &y), SSIM_WINDOW);

    let samples = (SSIM_WINDOW * SSIM_WINDOW) as f64;
    let cov_norm = samples / (samples - 1.0);
    let c1 = (SSIM_K1 * DATA_RANGE).powi(2);
    let c2 = (SSIM_K2 * DATA_RANGE).powi(2);

    let local = Zip::from(&mean_x)
        .and(&mean_y)
        .and(&mean_xx)
        .and(&mean_yy)
        .and(&mean_xy)
        .map_collect(|&ux, &uy, &uxx, &uyy, &uxy| {
            let var_x = cov_norm * ux.mul_add(-ux, uxx);
            let var_y = cov_norm * uy.mul_add(-uy, uyy);
            let cov_xy = cov_norm * ux.mul_add(-uy, uxy);

            let numerator = (2.0 * ux).mul_add(uy, c1) * 2.0f64.mul_add(cov_xy, c2);
            let denominator = ux.mul_add(ux, uy.mul_add(uy, c1)) * (var_x + var_y + c2);
            numerator / denominator
        });

    let pad = (SSIM_WINDOW - 1) / 2;
    let interior = local.slice_each_axis(|axis| Slice::from(pad..axis.len - pad));
    Ok(interior.mean().unwrap_or(1.0))
}
