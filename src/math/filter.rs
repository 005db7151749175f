//! Separable box filtering over 2-D matrices

use ndarray::{Array2, ArrayView1, ArrayViewMut1, Axis};

/// Mean over a `size x size` window centered on each element
///
/// Out-of-range samples are mirrored about the edge including the edge
/// sample itself (`d c b a | a b c d | d c b a`). An even `size` centers the
/// window one sample towards the origin.
pub fn uniform_filter(input: &Array2<f64>, size: usize) -> Array2<f64> {
    if size <= 1 || input.is_empty() {
        return input.clone();
    }

    let mut horizontal = Array2::zeros(input.raw_dim());
    for (source, target) in input
        .axis_iter(Axis(0))
        .zip(horizontal.axis_iter_mut(Axis(0)))
    {
        box_filter_1d(source, target, size);
    }

    let mut output = Array2::zeros(input.raw_dim());
    for (source, target) in horizontal
        .axis_iter(Axis(1))
        .zip(output.axis_iter_mut(Axis(1)))
    {
        box_filter_1d(source, target, size);
    }

    output
}

fn box_filter_1d(source: ArrayView1<'_, f64>, mut target: ArrayViewMut1<'_, f64>, size: usize) {
    let len = source.len() as isize;
    let before = (size / 2) as isize;
    let after = size as isize - before - 1;
    let norm = size as f64;

    for (i, out) in target.iter_mut().enumerate() {
        let center = i as isize;
        let sum: f64 = (center - before..=center + after)
            .map(|j| source.get(reflect_index(j, len)).copied().unwrap_or(0.0))
            .sum();
        *out = sum / norm;
    }
}

/// Map any index onto `[0, len)` by half-sample symmetric reflection
pub const fn reflect_index(index: isize, len: isize) -> usize {
    if len <= 0 {
        return 0;
    }
    let period = 2 * len;
    let wrapped = index.rem_euclid(period);
    if wrapped < len {
        wrapped as usize
    } else {
        (period - 1 - wrapped) as usize
    }
}
