//! Single-channel brightness rasters shared by targets, canvases and stencils
//!
//! A raster is stored row-major as an `ndarray` matrix indexed `[row, col]`.
//! Rasters are plain values: every operation that changes pixels in this crate
//! produces a new raster instead of writing into one that may already be
//! recorded elsewhere.

use image::GrayImage;
use ndarray::Array2;

use crate::io::configuration::{BLANK_BRIGHTNESS, INK_BRIGHTNESS};
use crate::io::error::{Result, dimension_mismatch};

/// Grid of 8-bit brightness values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pixels: Array2<u8>,
}

impl Raster {
    /// Create a raster with every pixel set to `value`
    pub fn filled(rows: usize, cols: usize, value: u8) -> Self {
        Self {
            pixels: Array2::from_elem((rows, cols), value),
        }
    }

    /// Create a blank (fully bright) canvas
    pub fn blank(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, BLANK_BRIGHTNESS)
    }

    /// Wrap an existing brightness matrix
    pub const fn from_array(pixels: Array2<u8>) -> Self {
        Self { pixels }
    }

    /// Build a raster from row-major pixel data
    ///
    /// # Errors
    ///
    /// Returns an error if `data.len()` is not `rows * cols`
    pub fn from_vec(rows: usize, cols: usize, data: Vec<u8>) -> Result<Self> {
        let len = data.len();
        Array2::from_shape_vec((rows, cols), data)
            .map(Self::from_array)
            .map_err(|_shape_error| dimension_mismatch("raster construction", (rows, cols), (len, 1)))
    }

    /// Convert a decoded luma image into a raster
    ///
    /// # Errors
    ///
    /// Returns an error if the image buffer holds more samples than its dimensions
    pub fn from_luma(image: GrayImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        Self::from_vec(height as usize, width as usize, image.into_raw())
    }

    /// Convert the raster into a luma image for encoding
    ///
    /// # Errors
    ///
    /// Returns an error if the raster is too large for the image buffer
    pub fn to_luma(&self) -> Result<GrayImage> {
        let raw: Vec<u8> = self.pixels.iter().copied().collect();
        GrayImage::from_raw(self.cols() as u32, self.rows() as u32, raw).ok_or_else(|| {
            dimension_mismatch(
                "luma conversion",
                self.shape(),
                (self.rows() * self.cols(), 1),
            )
        })
    }

    /// Number of rows (image height)
    pub fn rows(&self) -> usize {
        self.pixels.nrows()
    }

    /// Number of columns (image width)
    pub fn cols(&self) -> usize {
        self.pixels.ncols()
    }

    /// Extents as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }

    /// Total number of pixels
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Whether the raster has no pixels at all
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Brightness at `[row, col]`, or `None` outside the raster
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        self.pixels.get([row, col]).copied()
    }

    /// Borrow the underlying matrix
    pub const fn pixels(&self) -> &Array2<u8> {
        &self.pixels
    }

    /// Count pixels with exactly the given brightness
    pub fn count_value(&self, value: u8) -> usize {
        self.pixels.iter().filter(|&&v| v == value).count()
    }

    /// Count fully inked pixels
    pub fn ink_count(&self) -> usize {
        self.count_value(INK_BRIGHTNESS)
    }

    /// Count pixels with any nonzero brightness
    pub fn nonzero_count(&self) -> usize {
        self.pixels.iter().filter(|&&v| v != 0).count()
    }
}
