//! Committed stamp placements and their deterministic replay

use serde::{Deserialize, Serialize};

use crate::algorithm::compositor::stamp;
use crate::io::error::{Result, invalid_parameter};
use crate::spatial::{Raster, ShapeTemplate};

/// One committed stamp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Canvas column of the stamp center
    pub x: i32,
    /// Canvas row of the stamp center
    pub y: i32,
    /// Uniform scale factor applied to the stencil
    pub scale: f64,
    /// Counter-clockwise rotation in degrees
    pub rotation: f64,
}

impl Placement {
    /// Create a placement, rejecting scales that cannot be rendered
    ///
    /// # Errors
    ///
    /// Returns an error if `scale` is not a finite positive number
    pub fn new(x: i32, y: i32, scale: f64, rotation: f64) -> Result<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(invalid_parameter(
                "scale",
                &scale,
                &"scale must be a finite positive number",
            ));
        }
        Ok(Self {
            x,
            y,
            scale,
            rotation,
        })
    }

    /// Stamp center as `[x, y]`
    pub const fn position(&self) -> [i32; 2] {
        [self.x, self.y]
    }

    /// Stamp this placement onto a copy of `canvas`
    ///
    /// # Errors
    ///
    /// Returns an error if the placement's scale is not a finite positive number
    pub fn apply(&self, canvas: &Raster, template: &ShapeTemplate) -> Result<Raster> {
        stamp(canvas, template, self.position(), self.scale, self.rotation)
    }
}

/// Placements in commit order
///
/// Grows only by appending; entries are never reordered or removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementHistory {
    placements: Vec<Placement>,
}

impl PlacementHistory {
    /// Create an empty history
    pub const fn new() -> Self {
        Self {
            placements: Vec::new(),
        }
    }

    /// Create an empty history with room for `capacity` placements
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            placements: Vec::with_capacity(capacity),
        }
    }

    /// Append a committed placement
    pub fn push(&mut self, placement: Placement) {
        self.placements.push(placement);
    }

    /// Number of committed placements
    pub const fn len(&self) -> usize {
        self.placements.len()
    }

    /// Whether nothing has been committed
    pub const fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Placements in commit order
    pub fn as_slice(&self) -> &[Placement] {
        &self.placements
    }

    /// Iterate placements in commit order
    pub fn iter(&self) -> std::slice::Iter<'_, Placement> {
        self.placements.iter()
    }

    /// Most recent placement
    pub fn last(&self) -> Option<&Placement> {
        self.placements.last()
    }
}

impl FromIterator<Placement> for PlacementHistory {
    fn from_iter<I: IntoIterator<Item = Placement>>(iter: I) -> Self {
        Self {
            placements: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PlacementHistory {
    type Item = &'a Placement;
    type IntoIter = std::slice::Iter<'a, Placement>;

    fn into_iter(self) -> Self::IntoIter {
        self.placements.iter()
    }
}

/// Rebuild every intermediate canvas from a placement history
///
/// Returns `history.len() + 1` frames: the initial canvas followed by the
/// canvas after each placement, in commit order.
///
/// # Errors
///
/// Returns an error if any placement carries a scale that cannot be rendered
pub fn replay(
    initial: &Raster,
    template: &ShapeTemplate,
    history: &PlacementHistory,
) -> Result<Vec<Raster>> {
    let mut frames = Vec::with_capacity(history.len() + 1);
    let mut current = initial.clone();

    for placement in history {
        let next = placement.apply(&current, template)?;
        frames.push(std::mem::replace(&mut current, next));
    }
    frames.push(current);

    Ok(frames)
}

/// Rebuild only the final canvas of a placement history
///
/// # Errors
///
/// Returns an error if any placement carries a scale that cannot be rendered
pub fn replay_final(
    initial: &Raster,
    template: &ShapeTemplate,
    history: &PlacementHistory,
) -> Result<Raster> {
    history
        .iter()
        .try_fold(initial.clone(), |canvas, placement| {
            placement.apply(&canvas, template)
        })
}
