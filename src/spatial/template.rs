//! Stamp stencils generated from explicit polygon geometry

use image::{GrayImage, Luma};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;

use crate::io::configuration::STENCIL_FOREGROUND;
use crate::io::error::{Result, invalid_parameter};
use crate::spatial::raster::Raster;

/// Star outline as fractions of the stencil side, clockwise from the top point
pub const STAR_VERTICES: [(f64, f64); 10] = [
    (0.50, 0.00),
    (0.61, 0.35),
    (1.00, 0.35),
    (0.68, 0.57),
    (0.79, 0.91),
    (0.50, 0.70),
    (0.21, 0.91),
    (0.32, 0.57),
    (0.00, 0.35),
    (0.39, 0.35),
];

/// Immutable square stencil: foreground pixels mark the shape and its outline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeTemplate {
    raster: Raster,
}

impl ShapeTemplate {
    /// Generate the five-pointed star stencil of side `size`
    ///
    /// Deterministic: the same `size` always yields the same stencil.
    ///
    /// # Errors
    ///
    /// Returns an error if `size` is zero
    pub fn star(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(invalid_parameter(
                "template_size",
                &size,
                &"stencil side must be positive",
            ));
        }

        let side = size as f64;
        let mut vertices: Vec<Point<i32>> = STAR_VERTICES
            .iter()
            .map(|&(fx, fy)| Point::new((side * fx).round() as i32, (side * fy).round() as i32))
            .collect();
        // A closed outline must not repeat its first vertex
        while vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }

        let mut canvas = GrayImage::new(size as u32, size as u32);
        draw_polygon_mut(&mut canvas, &vertices, Luma([STENCIL_FOREGROUND]));

        Ok(Self {
            raster: Raster::from_luma(canvas)?,
        })
    }

    /// Use an arbitrary square raster as a stencil; nonzero pixels are foreground
    ///
    /// # Errors
    ///
    /// Returns an error if the raster is empty or not square
    pub fn from_raster(raster: Raster) -> Result<Self> {
        if raster.is_empty() {
            return Err(invalid_parameter(
                "template",
                &"0x0",
                &"stencil must contain pixels",
            ));
        }
        if raster.rows() != raster.cols() {
            return Err(invalid_parameter(
                "template",
                &format!("{}x{}", raster.rows(), raster.cols()),
                &"stencil must be square",
            ));
        }
        Ok(Self { raster })
    }

    /// Side length in pixels
    pub fn side(&self) -> usize {
        self.raster.rows()
    }

    /// Borrow the stencil pixels
    pub const fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Number of foreground pixels
    pub fn foreground_count(&self) -> usize {
        self.raster.nonzero_count()
    }
}
