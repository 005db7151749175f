//! Tests for search constants and output naming

#[cfg(test)]
mod tests {
    use stencilfit::io::configuration::{
        BLANK_BRIGHTNESS, CANDIDATE_PERCENTILE, DATA_RANGE, DEFAULT_MAX_SHAPES, DEFAULT_SEED,
        DEFAULT_TEMPLATE_SIZE, FINAL_FRAME_HOLD, FULL_TURN_DEGREES, GIF_FRAME_DELAY_MS,
        HISTORY_SUFFIX, INK_BRIGHTNESS, INPUT_EXTENSIONS, MAX_INDIVIDUAL_PROGRESS_BARS,
        MAX_TRIAL_SCALE, MIN_TRIAL_SCALE, OUTPUT_SUFFIX, REPLAY_SUFFIX, SSIM_K1, SSIM_K2,
        SSIM_WINDOW, STENCIL_FOREGROUND, TRIALS_PER_ROUND,
    };

    // Tests trial sampling constants
    // Verified by changing constant values
    #[test]
    fn test_trial_sampling_values() {
        assert_eq!(TRIALS_PER_ROUND, 100);
        assert!((MIN_TRIAL_SCALE - 0.5).abs() < f64::EPSILON);
        assert!((MAX_TRIAL_SCALE - 1.5).abs() < f64::EPSILON);
        assert!((FULL_TURN_DEGREES - 360.0).abs() < f64::EPSILON);
        assert!((CANDIDATE_PERCENTILE - 95.0).abs() < f64::EPSILON);
    }

    // Tests brightness extremes span the 8-bit range
    // Verified by swapping ink and blank
    #[test]
    fn test_brightness_values() {
        assert_eq!(INK_BRIGHTNESS, u8::MIN);
        assert_eq!(BLANK_BRIGHTNESS, u8::MAX);
        assert_eq!(STENCIL_FOREGROUND, u8::MAX);
    }

    // Tests similarity parameters
    // Verified by using an even window
    #[test]
    fn test_similarity_values() {
        assert_eq!(SSIM_WINDOW, 7);
        assert!((SSIM_K1 - 0.01).abs() < f64::EPSILON);
        assert!((SSIM_K2 - 0.03).abs() < f64::EPSILON);
        assert!((DATA_RANGE - 255.0).abs() < f64::EPSILON);
    }

    // Tests command-line defaults
    // Verified by changing default values
    #[test]
    fn test_default_values() {
        assert_eq!(DEFAULT_SEED, 42);
        assert_eq!(DEFAULT_MAX_SHAPES, 100);
        assert_eq!(DEFAULT_TEMPLATE_SIZE, 50);
        assert_eq!(MAX_INDIVIDUAL_PROGRESS_BARS, 5);
    }

    // Tests output naming and animation timing
    // Verified by reusing the output suffix for the history
    #[test]
    fn test_output_values() {
        assert_eq!(OUTPUT_SUFFIX, "_stencil");
        assert_eq!(HISTORY_SUFFIX, "_placements");
        assert_eq!(REPLAY_SUFFIX, "_replay");
        assert_eq!(INPUT_EXTENSIONS, &["png", "jpg", "jpeg", "bmp"]);
        assert_eq!(GIF_FRAME_DELAY_MS, 200);
        assert_eq!(FINAL_FRAME_HOLD, 10);
    }
}
