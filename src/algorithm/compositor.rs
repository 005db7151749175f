//! Stamping a transformed stencil onto a canvas
//!
//! A stamp resamples the stencil by its scale, rotates it about its own
//! center with an expanding bounding box, centers the result on the target
//! position and forces every covered foreground pixel to full ink. Parts of
//! the stamp that fall outside the canvas are clipped away silently.

use bitvec::prelude::*;

use crate::io::configuration::INK_BRIGHTNESS;
use crate::io::error::Result;
use crate::spatial::transform::{resample, rotate_expand};
use crate::spatial::{Raster, ShapeTemplate};

/// Foreground footprint of a transformed stencil positioned in canvas space
#[derive(Debug, Clone)]
pub struct StampMask {
    /// Canvas coordinates `[x, y]` of the footprint's top-left pixel
    origin: [i64; 2],
    rows: usize,
    cols: usize,
    /// Row-major foreground flags
    bits: BitVec,
}

impl StampMask {
    /// Transform `template` and anchor its center at `position` (`[x, y]`)
    ///
    /// # Errors
    ///
    /// Returns an error if `scale` is not a finite positive number, or if
    /// the transformed stencil does not fit an image buffer
    pub fn new(
        template: &ShapeTemplate,
        position: [i32; 2],
        scale: f64,
        rotation: f64,
    ) -> Result<Self> {
        let resized = resample(template.raster(), scale)?;
        let rotated = rotate_expand(&resized, rotation)?;

        let rows = rotated.rows();
        let cols = rotated.cols();
        let bits: BitVec = rotated.pixels().iter().map(|&value| value > 0).collect();

        let origin = [
            i64::from(position[0]) - (cols / 2) as i64,
            i64::from(position[1]) - (rows / 2) as i64,
        ];

        Ok(Self {
            origin,
            rows,
            cols,
            bits,
        })
    }

    /// Canvas coordinates `[x, y]` of the footprint's top-left pixel
    pub const fn origin(&self) -> [i64; 2] {
        self.origin
    }

    /// Footprint extents as (rows, cols)
    pub const fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of foreground pixels before clipping
    pub fn foreground_count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Foreground pixels that land inside a `rows x cols` canvas, as `[row, col]`
    pub fn covered_pixels(
        &self,
        canvas_rows: usize,
        canvas_cols: usize,
    ) -> impl Iterator<Item = [usize; 2]> + '_ {
        let [origin_x, origin_y] = self.origin;
        let canvas_rows = canvas_rows as i64;
        let canvas_cols = canvas_cols as i64;

        // Clip the footprint rectangle to the canvas in footprint coordinates
        let row_start = (-origin_y).clamp(0, self.rows as i64) as usize;
        let row_end = (canvas_rows - origin_y).clamp(0, self.rows as i64) as usize;
        let col_start = (-origin_x).clamp(0, self.cols as i64) as usize;
        let col_end = (canvas_cols - origin_x).clamp(0, self.cols as i64) as usize;

        (row_start..row_end).flat_map(move |row| {
            (col_start..col_end).filter_map(move |col| {
                let inside = self
                    .bits
                    .get(row * self.cols + col)
                    .is_some_and(|bit| *bit);
                inside.then(|| {
                    [
                        (origin_y + row as i64) as usize,
                        (origin_x + col as i64) as usize,
                    ]
                })
            })
        })
    }
}

/// Stamp `template` onto a copy of `canvas`, centered at `position` (`[x, y]`)
///
/// The input canvas is left untouched; the returned canvas differs from it
/// only in pixels under the stencil's foreground, which are set to full ink.
/// A stamp entirely outside the canvas returns an unchanged copy.
///
/// # Errors
///
/// Returns an error if `scale` is not a finite positive number
pub fn stamp(
    canvas: &Raster,
    template: &ShapeTemplate,
    position: [i32; 2],
    scale: f64,
    rotation: f64,
) -> Result<Raster> {
    let mask = StampMask::new(template, position, scale, rotation)?;
    Ok(apply_mask(canvas, &mask))
}

/// Copy `canvas` and ink every pixel covered by `mask`
pub fn apply_mask(canvas: &Raster, mask: &StampMask) -> Raster {
    let (rows, cols) = canvas.shape();
    let mut pixels = canvas.pixels().clone();
    for [row, col] in mask.covered_pixels(rows, cols) {
        if let Some(pixel) = pixels.get_mut([row, col]) {
            *pixel = INK_BRIGHTNESS;
        }
    }
    Raster::from_array(pixels)
}
