//! Greedy stochastic placement search
//!
//! Each round draws a batch of random stamps centered on the pixels that most
//! need ink, renders every one onto a copy of the working canvas, scores it
//! against the target with mean squared error and commits the best of the
//! batch. Committed stamps are never revisited. The search ends after the
//! configured number of rounds, or earlier once no pixel qualifies as a stamp
//! center.

use rand::Rng;
use tracing::{debug, info, trace};

use crate::algorithm::compositor::stamp;
use crate::algorithm::history::{Placement, PlacementHistory};
use crate::analysis::candidates::select_candidates;
use crate::analysis::metrics::mean_squared_error;
use crate::io::configuration::{
    CANDIDATE_PERCENTILE, DEFAULT_MAX_SHAPES, FULL_TURN_DEGREES, MAX_TRIAL_SCALE,
    MIN_TRIAL_SCALE, TRIALS_PER_ROUND,
};
use crate::io::error::{Result, ensure_same_shape, invalid_parameter};
use crate::spatial::{Raster, ShapeTemplate};

/// Search parameters controlling round count and trial sampling
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchConfig {
    /// Maximum number of rounds, and so of committed placements
    pub max_shapes: usize,
    /// Random trials rendered per round
    pub trials_per_round: usize,
    /// Smallest trial scale (inclusive)
    pub min_scale: f64,
    /// Largest trial scale (inclusive)
    pub max_scale: f64,
    /// Percentile of the darkening deficit a stamp center must exceed
    pub candidate_percentile: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_shapes: DEFAULT_MAX_SHAPES,
            trials_per_round: TRIALS_PER_ROUND,
            min_scale: MIN_TRIAL_SCALE,
            max_scale: MAX_TRIAL_SCALE,
            candidate_percentile: CANDIDATE_PERCENTILE,
        }
    }
}

impl SearchConfig {
    /// Default configuration capped at `max_shapes` rounds
    ///
    /// # Errors
    ///
    /// Returns an error if `max_shapes` is zero
    pub fn new(max_shapes: usize) -> Result<Self> {
        let config = Self {
            max_shapes,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every parameter
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `max_shapes` or `trials_per_round` is zero
    /// - The scale range is empty, non-finite or reaches zero
    /// - `candidate_percentile` is outside `[0, 100]`
    pub fn validate(&self) -> Result<()> {
        if self.max_shapes == 0 {
            return Err(invalid_parameter(
                "max_shapes",
                &self.max_shapes,
                &"at least one placement must be allowed",
            ));
        }
        if self.trials_per_round == 0 {
            return Err(invalid_parameter(
                "trials_per_round",
                &self.trials_per_round,
                &"each round needs at least one trial",
            ));
        }
        if !self.min_scale.is_finite()
            || !self.max_scale.is_finite()
            || self.min_scale <= 0.0
            || self.min_scale > self.max_scale
        {
            return Err(invalid_parameter(
                "scale_range",
                &format!("{}..={}", self.min_scale, self.max_scale),
                &"scale range must be positive, finite and non-empty",
            ));
        }
        if !(0.0..=100.0).contains(&self.candidate_percentile) {
            return Err(invalid_parameter(
                "candidate_percentile",
                &self.candidate_percentile,
                &"percentile must be within [0, 100]",
            ));
        }
        Ok(())
    }
}

/// Lifecycle of a search
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchState {
    /// More rounds may commit placements
    Running,
    /// Terminal; no further placements are attempted
    Done,
}

/// Why a search stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// No pixel qualified as a stamp center at the start of `round`
    Converged {
        /// Zero-based round that found no candidates
        round: usize,
    },
    /// Every allowed round committed a placement
    Exhausted,
}

/// Result of driving the search by a single round
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RoundOutcome {
    /// The best trial of the round was committed
    Committed {
        /// Zero-based round index
        round: usize,
        /// The committed placement
        placement: Placement,
        /// Error of the canvas before this round
        previous_mse: f64,
        /// Error of the canvas after committing
        mse: f64,
    },
    /// The search is done; repeated calls keep returning this
    Finished(Termination),
}

/// Everything a finished search produced
#[derive(Clone, Debug)]
pub struct SearchResult {
    /// Final working canvas
    pub canvas: Raster,
    /// Committed placements in commit order
    pub history: PlacementHistory,
    /// Why the search stopped
    pub termination: Termination,
    /// Mean squared error of `canvas` against the target
    pub final_mse: f64,
}

/// Greedy stochastic optimizer over stamp placements
///
/// Owns the working canvas for the duration of the search; the target and
/// stencil are shared read-only.
pub struct PlacementSearch<'a> {
    target: &'a Raster,
    template: &'a ShapeTemplate,
    config: SearchConfig,
    canvas: Raster,
    history: PlacementHistory,
    current_mse: f64,
    round: usize,
    termination: Option<Termination>,
}

impl<'a> PlacementSearch<'a> {
    /// Prepare a search that starts from `canvas`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `config` fails validation
    /// - `canvas` and `target` differ in dimensions
    /// - The target is empty
    pub fn new(
        target: &'a Raster,
        canvas: Raster,
        template: &'a ShapeTemplate,
        config: SearchConfig,
    ) -> Result<Self> {
        config.validate()?;
        ensure_same_shape("placement search", target.shape(), canvas.shape())?;
        let current_mse = mean_squared_error(target, &canvas)?;

        Ok(Self {
            target,
            template,
            config,
            canvas,
            history: PlacementHistory::with_capacity(config.max_shapes),
            current_mse,
            round: 0,
            termination: None,
        })
    }

    /// Prepare a search over a blank canvas the size of `target`
    ///
    /// # Errors
    ///
    /// Returns an error under the same conditions as [`PlacementSearch::new`]
    pub fn from_blank(
        target: &'a Raster,
        template: &'a ShapeTemplate,
        config: SearchConfig,
    ) -> Result<Self> {
        let canvas = Raster::blank(target.rows(), target.cols());
        Self::new(target, canvas, template, config)
    }

    /// Current lifecycle state
    pub const fn state(&self) -> SearchState {
        if self.termination.is_some() {
            SearchState::Done
        } else {
            SearchState::Running
        }
    }

    /// Whether the search has reached its terminal state
    pub const fn is_done(&self) -> bool {
        self.termination.is_some()
    }

    /// Why the search stopped, once it has
    pub const fn termination(&self) -> Option<Termination> {
        self.termination
    }

    /// Number of rounds completed so far
    pub const fn round(&self) -> usize {
        self.round
    }

    /// Working canvas as of the last commit
    pub const fn canvas(&self) -> &Raster {
        &self.canvas
    }

    /// Placements committed so far
    pub const fn history(&self) -> &PlacementHistory {
        &self.history
    }

    /// Error of the working canvas against the target
    pub const fn current_mse(&self) -> f64 {
        self.current_mse
    }

    /// Active configuration
    pub const fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run one round: sample trials, commit the best, or finish
    ///
    /// The best trial is committed even when it scores worse than the canvas
    /// it was drawn from.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or scoring a trial fails, which only
    /// happens when the search was built from inconsistent inputs
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<RoundOutcome> {
        if let Some(termination) = self.termination {
            return Ok(RoundOutcome::Finished(termination));
        }
        if self.round >= self.config.max_shapes {
            return Ok(self.finish(Termination::Exhausted));
        }

        let candidates =
            select_candidates(self.target, &self.canvas, self.config.candidate_percentile)?;
        trace!(
            round = self.round,
            candidates = candidates.len(),
            threshold = candidates.threshold(),
            "selected stamp centers"
        );
        if candidates.is_empty() {
            info!(round = self.round, "no pixel left to darken, search converged");
            return Ok(self.finish(Termination::Converged { round: self.round }));
        }

        let mut best: Option<(f64, Placement, Raster)> = None;
        for _ in 0..self.config.trials_per_round {
            let Some([row, col]) = candidates.choose(rng) else {
                break;
            };
            let placement = Placement {
                x: col as i32,
                y: row as i32,
                scale: rng.random_range(self.config.min_scale..=self.config.max_scale),
                rotation: rng.random_range(0.0..FULL_TURN_DEGREES),
            };

            let trial = stamp(
                &self.canvas,
                self.template,
                placement.position(),
                placement.scale,
                placement.rotation,
            )?;
            let score = mean_squared_error(self.target, &trial)?;

            if best.as_ref().is_none_or(|(best_score, _, _)| score < *best_score) {
                best = Some((score, placement, trial));
            }
        }

        let Some((mse, placement, canvas)) = best else {
            return Ok(self.finish(Termination::Converged { round: self.round }));
        };

        let round = self.round;
        let previous_mse = self.current_mse;
        self.history.push(placement);
        self.canvas = canvas;
        self.current_mse = mse;
        self.round += 1;

        debug!(
            round,
            x = placement.x,
            y = placement.y,
            scale = placement.scale,
            rotation = placement.rotation,
            previous_mse,
            mse,
            "committed placement"
        );
        if mse > previous_mse {
            debug!(round, previous_mse, mse, "best trial increased the error");
        }

        if self.round >= self.config.max_shapes {
            self.finish(Termination::Exhausted);
        }

        Ok(RoundOutcome::Committed {
            round,
            placement,
            previous_mse,
            mse,
        })
    }

    /// Run at most `rounds` further rounds, stopping early when the search finishes
    ///
    /// Returns the number of placements committed by this call.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`PlacementSearch::step`]
    pub fn run_rounds<R: Rng + ?Sized>(&mut self, rounds: usize, rng: &mut R) -> Result<usize> {
        let mut committed = 0;
        for _ in 0..rounds {
            match self.step(rng)? {
                RoundOutcome::Committed { .. } => committed += 1,
                RoundOutcome::Finished(_) => break,
            }
        }
        Ok(committed)
    }

    /// Drive the search to its terminal state and hand over the results
    ///
    /// # Errors
    ///
    /// Propagates errors from [`PlacementSearch::step`]
    pub fn run<R: Rng + ?Sized>(mut self, rng: &mut R) -> Result<SearchResult> {
        while !self.is_done() {
            self.step(rng)?;
        }
        Ok(self.into_result())
    }

    /// Hand over the current canvas and history
    ///
    /// A search that has not finished reports [`Termination::Exhausted`].
    pub fn into_result(self) -> SearchResult {
        SearchResult {
            canvas: self.canvas,
            history: self.history,
            termination: self.termination.unwrap_or(Termination::Exhausted),
            final_mse: self.current_mse,
        }
    }

    fn finish(&mut self, termination: Termination) -> RoundOutcome {
        if termination == Termination::Exhausted {
            info!(rounds = self.round, mse = self.current_mse, "search used every round");
        }
        self.termination = Some(termination);
        RoundOutcome::Finished(termination)
    }
}

/// Approximate `target` from `canvas` with up to `config.max_shapes` stamps
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the rasters differ in
/// dimensions
pub fn optimize_placements<R: Rng + ?Sized>(
    target: &Raster,
    canvas: Raster,
    template: &ShapeTemplate,
    config: SearchConfig,
    rng: &mut R,
) -> Result<SearchResult> {
    PlacementSearch::new(target, canvas, template, config)?.run(rng)
}
