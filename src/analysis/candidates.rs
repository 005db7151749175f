//! Stamp center candidates biased towards the pixels that most need ink
//!
//! The canvas can only get darker, so the useful signal is how much brighter
//! each canvas pixel still is than the target. Pixels whose deficit is above
//! the configured percentile of the whole deficit raster (and above zero)
//! form the candidate set a round draws its stamp centers from.

use ndarray::Array2;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::io::error::{Result, ensure_same_shape, invalid_parameter};
use crate::math::percentile::percentile_linear;
use crate::spatial::Raster;

/// Signed per-pixel difference `canvas - target`
///
/// Positive values mark pixels still brighter than the target; zero or
/// negative values mark pixels that are already dark enough.
///
/// # Errors
///
/// Returns an error if the rasters differ in dimensions
pub fn darkening_deficit(target: &Raster, canvas: &Raster) -> Result<Array2<i16>> {
    ensure_same_shape("darkening deficit", target.shape(), canvas.shape())?;
    Ok(ndarray::Zip::from(canvas.pixels())
        .and(target.pixels())
        .map_collect(|&c, &t| i16::from(c) - i16::from(t)))
}

/// Coordinates eligible to center the next stamp
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    /// Candidate pixels as `[row, col]`, in row-major order
    positions: Vec<[usize; 2]>,
    /// Deficit a pixel had to strictly exceed to be included
    threshold: f64,
}

impl CandidateSet {
    /// Candidate pixels as `[row, col]`
    pub fn positions(&self) -> &[[usize; 2]] {
        &self.positions
    }

    /// Deficit a pixel had to strictly exceed
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Number of candidate pixels
    pub const fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether no pixel qualified; the search treats this as convergence
    pub const fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Draw one candidate uniformly at random
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<[usize; 2]> {
        self.positions.as_slice().choose(rng).copied()
    }
}

/// Collect the pixels whose deficit strictly exceeds its `percentile`
///
/// The cut-off is never below zero, so pixels already at or below their
/// target brightness are never candidates.
///
/// # Errors
///
/// Returns an error if:
/// - The rasters differ in dimensions
/// - `percentile` is outside `[0, 100]`
pub fn select_candidates(target: &Raster, canvas: &Raster, percentile: f64) -> Result<CandidateSet> {
    if !(0.0..=100.0).contains(&percentile) {
        return Err(invalid_parameter(
            "candidate_percentile",
            &percentile,
            &"percentile must be within [0, 100]",
        ));
    }

    let deficit = darkening_deficit(target, canvas)?;
    let mut scratch: Vec<i16> = deficit.iter().copied().collect();
    let Some(cutoff) = percentile_linear(&mut scratch, percentile) else {
        return Ok(CandidateSet::default());
    };
    let threshold = cutoff.max(0.0);

    let positions = deficit
        .indexed_iter()
        .filter(|&(_, &value)| f64::from(value) > threshold)
        .map(|((row, col), _)| [row, col])
        .collect();

    Ok(CandidateSet {
        positions,
        threshold,
    })
}
