//! Tests for search configuration and the round-by-round placement search

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use stencilfit::StencilError;
    use stencilfit::algorithm::search::{
        PlacementSearch, RoundOutcome, SearchConfig, SearchState, Termination,
        optimize_placements,
    };
    use stencilfit::analysis::metrics::mean_squared_error;
    use stencilfit::io::configuration::{
        CANDIDATE_PERCENTILE, DEFAULT_MAX_SHAPES, MAX_TRIAL_SCALE, MIN_TRIAL_SCALE,
        TRIALS_PER_ROUND,
    };
    use stencilfit::spatial::{Raster, ShapeTemplate};

    fn diagonal_ramp(side: usize) -> Raster {
        let data = (0..side * side)
            .map(|i| (4 * (i / side + i % side)).min(255) as u8)
            .collect();
        Raster::from_vec(side, side, data).unwrap()
    }

    fn small_config(max_shapes: usize) -> SearchConfig {
        SearchConfig {
            max_shapes,
            trials_per_round: 12,
            ..SearchConfig::default()
        }
    }

    // Tests defaults match the documented search constants
    // Verified by changing a default constant
    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();

        assert_eq!(config.max_shapes, DEFAULT_MAX_SHAPES);
        assert_eq!(config.trials_per_round, TRIALS_PER_ROUND);
        assert!((config.min_scale - MIN_TRIAL_SCALE).abs() < f64::EPSILON);
        assert!((config.max_scale - MAX_TRIAL_SCALE).abs() < f64::EPSILON);
        assert!((config.candidate_percentile - CANDIDATE_PERCENTILE).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    // Tests every invalid parameter is rejected
    // Verified by removing each validation branch
    #[test]
    fn test_config_validation() {
        assert!(matches!(
            SearchConfig::new(0),
            Err(StencilError::InvalidParameter {
                parameter: "max_shapes",
                ..
            })
        ));
        assert_eq!(SearchConfig::new(7).unwrap().max_shapes, 7);

        let no_trials = SearchConfig {
            trials_per_round: 0,
            ..SearchConfig::default()
        };
        assert!(no_trials.validate().is_err());

        let inverted = SearchConfig {
            min_scale: 2.0,
            max_scale: 1.0,
            ..SearchConfig::default()
        };
        assert!(inverted.validate().is_err());

        let zero_scale = SearchConfig {
            min_scale: 0.0,
            ..SearchConfig::default()
        };
        assert!(zero_scale.validate().is_err());

        let bad_percentile = SearchConfig {
            candidate_percentile: 120.0,
            ..SearchConfig::default()
        };
        assert!(bad_percentile.validate().is_err());
    }

    // Tests a target equal to the blank canvas converges before any placement
    // Verified by treating an empty candidate set as a skipped round
    #[test]
    fn test_blank_target_converges_immediately() {
        let target = Raster::blank(16, 16);
        let star = ShapeTemplate::star(8).unwrap();
        let config = SearchConfig::new(100).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let result = optimize_placements(&target, target.clone(), &star, config, &mut rng).unwrap();
        assert_eq!(result.termination, Termination::Converged { round: 0 });
        assert!(result.history.is_empty());
        assert_eq!(result.canvas, target);
        assert!(result.final_mse.abs() < f64::EPSILON);
    }

    // Tests a single dark pixel is matched exactly, then the search converges
    // Verified by skipping the candidate refresh between rounds
    #[test]
    fn test_single_pixel_target() {
        let mut data = vec![255; 100];
        if let Some(pixel) = data.get_mut(44) {
            *pixel = 0;
        }
        let target = Raster::from_vec(10, 10, data).unwrap();
        let block = ShapeTemplate::from_raster(Raster::filled(2, 2, 255)).unwrap();
        let config = SearchConfig::new(50).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        let result = PlacementSearch::from_blank(&target, &block, config)
            .unwrap()
            .run(&mut rng)
            .unwrap();

        assert_eq!(result.history.len(), 1);
        assert_eq!(result.termination, Termination::Converged { round: 1 });
        assert_eq!(result.canvas, target);
        let placement = result.history.last().copied().unwrap();
        assert_eq!(placement.position(), [4, 4]);
        assert!(placement.scale < 1.0);
    }

    // Tests a step reports the committed placement and its error change
    // Verified by reporting the error before the commit as the new error
    #[test]
    fn test_step_commits_best_trial() {
        let target = diagonal_ramp(32);
        let star = ShapeTemplate::star(8).unwrap();
        let mut search = PlacementSearch::from_blank(&target, &star, small_config(5)).unwrap();
        let initial_mse = search.current_mse();
        let mut rng = StdRng::seed_from_u64(3);

        let outcome = search.step(&mut rng).unwrap();
        let RoundOutcome::Committed {
            round,
            placement,
            previous_mse,
            mse,
        } = outcome
        else {
            unreachable!("first round of a ramp target must commit");
        };

        assert_eq!(round, 0);
        assert!((previous_mse - initial_mse).abs() < f64::EPSILON);
        assert!((mse - search.current_mse()).abs() < f64::EPSILON);
        assert!((mse - mean_squared_error(&target, search.canvas()).unwrap()).abs() < 1e-9);
        assert_eq!(search.history().last(), Some(&placement));
        assert_eq!(search.round(), 1);
        assert!((MIN_TRIAL_SCALE..=MAX_TRIAL_SCALE).contains(&placement.scale));
        assert!((0.0..360.0).contains(&placement.rotation));
    }

    // Tests a round commits its best trial even when every trial raises the error
    // Verified by keeping the canvas when the best trial is worse
    #[test]
    fn test_commits_best_trial_even_when_worse() {
        // Nearly white target: any stamp of the solid block overshoots
        let mut data = vec![255; 400];
        if let Some(pixel) = data.get_mut(210) {
            *pixel = 250;
        }
        let target = Raster::from_vec(20, 20, data).unwrap();
        let block = ShapeTemplate::from_raster(Raster::filled(10, 10, 255)).unwrap();
        let mut search =
            PlacementSearch::from_blank(&target, &block, SearchConfig::new(5).unwrap()).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let RoundOutcome::Committed {
            placement,
            previous_mse,
            mse,
            ..
        } = search.step(&mut rng).unwrap()
        else {
            unreachable!("the darker pixel must be stamped");
        };
        assert!((previous_mse - 25.0 / 400.0).abs() < 1e-12);
        assert!(mse > previous_mse);
        assert_eq!(placement.position(), [10, 10]);
        assert_eq!(search.history().len(), 1);
        assert_ne!(search.canvas(), &Raster::blank(20, 20));

        // Nothing is left brighter than its target
        assert_eq!(
            search.step(&mut rng).unwrap(),
            RoundOutcome::Finished(Termination::Converged { round: 1 })
        );
        assert_eq!(search.history().len(), 1);
    }

    // Tests the round budget ends the search with every round committed
    // Verified by allowing one extra round
    #[test]
    fn test_exhausts_round_budget() {
        let target = diagonal_ramp(32);
        let star = ShapeTemplate::star(8).unwrap();
        let mut search = PlacementSearch::from_blank(&target, &star, small_config(4)).unwrap();
        let mut rng = StdRng::seed_from_u64(11);

        assert_eq!(search.state(), SearchState::Running);
        assert_eq!(search.run_rounds(10, &mut rng).unwrap(), 4);
        assert_eq!(search.state(), SearchState::Done);
        assert_eq!(search.termination(), Some(Termination::Exhausted));
        assert_eq!(search.history().len(), 4);

        // Finished searches stay finished
        assert_eq!(
            search.step(&mut rng).unwrap(),
            RoundOutcome::Finished(Termination::Exhausted)
        );
        assert_eq!(search.history().len(), 4);
    }

    // Tests running zero rounds leaves the search untouched
    // Verified by always running at least one round
    #[test]
    fn test_zero_rounds() {
        let target = diagonal_ramp(16);
        let star = ShapeTemplate::star(8).unwrap();
        let mut search = PlacementSearch::from_blank(&target, &star, small_config(3)).unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        assert_eq!(search.run_rounds(0, &mut rng).unwrap(), 0);
        assert_eq!(search.round(), 0);
        assert!(search.history().is_empty());
        assert!(!search.is_done());
        assert_eq!(search.canvas(), &Raster::blank(16, 16));
    }

    // Tests equal seeds reproduce the whole search
    // Verified by seeding from the clock
    #[test]
    fn test_seeded_reproducibility() {
        let target = diagonal_ramp(24);
        let star = ShapeTemplate::star(8).unwrap();
        let run = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            PlacementSearch::from_blank(&target, &star, small_config(6))
                .unwrap()
                .run(&mut rng)
                .unwrap()
        };

        let first = run(9);
        let second = run(9);
        assert_eq!(first.history, second.history);
        assert_eq!(first.canvas, second.canvas);

        let other = run(10);
        assert_ne!(first.history, other.history);
    }

    // Tests a search refuses a canvas of the wrong size
    // Verified by cropping the canvas to the target
    #[test]
    fn test_rejects_mismatched_canvas() {
        let target = diagonal_ramp(16);
        let star = ShapeTemplate::star(8).unwrap();

        let result = PlacementSearch::new(&target, Raster::blank(16, 17), &star, small_config(3));
        assert!(matches!(result, Err(StencilError::DimensionMismatch { .. })));
    }

    // Tests an unfinished search reports exhaustion when handed over
    // Verified by reporting convergence for unfinished searches
    #[test]
    fn test_into_result_of_running_search() {
        let target = diagonal_ramp(16);
        let star = ShapeTemplate::star(8).unwrap();
        let mut search = PlacementSearch::from_blank(&target, &star, small_config(5)).unwrap();
        let mut rng = StdRng::seed_from_u64(8);

        search.run_rounds(2, &mut rng).unwrap();
        assert_eq!(search.config().max_shapes, 5);
        let canvas = search.canvas().clone();
        let result = search.into_result();
        assert_eq!(result.termination, Termination::Exhausted);
        assert_eq!(result.history.len(), 2);
        assert_eq!(result.canvas, canvas);
    }
}
