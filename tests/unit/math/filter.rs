//! Tests for the separable box filter

#[cfg(test)]
mod tests {
    use ndarray::{Array2, array};
    use stencilfit::math::filter::{reflect_index, uniform_filter};

    // Tests reflection repeats the edge sample
    // Verified by reflecting about the edge sample instead of beyond it
    #[test]
    fn test_reflect_index() {
        assert_eq!(reflect_index(-1, 4), 0);
        assert_eq!(reflect_index(-2, 4), 1);
        assert_eq!(reflect_index(0, 4), 0);
        assert_eq!(reflect_index(3, 4), 3);
        assert_eq!(reflect_index(4, 4), 3);
        assert_eq!(reflect_index(5, 4), 2);
        assert_eq!(reflect_index(8, 4), 0);
        assert_eq!(reflect_index(3, 0), 0);
    }

    // Tests constant inputs are unchanged by averaging
    // Verified by padding with zeros
    #[test]
    fn test_constant_input_is_fixed_point() {
        let input = Array2::from_elem((9, 11), 42.0);

        let output = uniform_filter(&input, 7);
        assert!(output.iter().all(|&v| (v - 42.0).abs() < 1e-9));
    }

    // Tests window means on a small ramp with edge reflection
    // Verified by dropping the vertical pass
    #[test]
    fn test_window_means() {
        let input = array![[0.0, 3.0, 6.0], [0.0, 3.0, 6.0], [0.0, 3.0, 6.0]];

        let output = uniform_filter(&input, 3);
        let at = |row: usize, col: usize| output.get([row, col]).copied().unwrap_or(f64::NAN);
        // Left edge sees 0, 0, 3; center sees 0, 3, 6; right edge sees 3, 6, 6
        assert!((at(1, 0) - 1.0).abs() < 1e-9);
        assert!((at(1, 1) - 3.0).abs() < 1e-9);
        assert!((at(1, 2) - 5.0).abs() < 1e-9);
        assert!((at(0, 0) - 1.0).abs() < 1e-9);
    }

    // Tests a unit window is the identity
    // Verified by averaging with neighbours for size one
    #[test]
    fn test_unit_window_is_identity() {
        let input = array![[1.0, 2.0], [3.0, 4.0]];

        assert_eq!(uniform_filter(&input, 1), input);
    }
}
