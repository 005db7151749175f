use num_traits::AsPrimitive;

/// Percentile with linear interpolation between closest ranks
///
/// For `n` values sorted ascending, the result sits at fractional rank
/// `percentile / 100 * (n - 1)`, interpolating between the two neighbouring
/// values. Returns `None` for an empty slice or a percentile outside
/// `[0, 100]`. The slice is reordered in place.
pub fn percentile_linear<T>(values: &mut [T], percentile: f64) -> Option<f64>
where
    T: Copy + PartialOrd + AsPrimitive<f64>,
{
    if values.is_empty() || !(0.0..=100.0).contains(&percentile) {
        return None;
    }

    let rank = percentile / 100.0 * (values.len() - 1) as f64;
    let lower_rank = rank.floor() as usize;
    let upper_rank = rank.ceil() as usize;
    let fraction = rank - lower_rank as f64;

    let compare = |a: &T, b: &T| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal);

    let (_, &mut lower, above) = values.select_nth_unstable_by(lower_rank, compare);
    let lower: f64 = lower.as_();

    if upper_rank == lower_rank {
        return Some(lower);
    }

    // Everything past the lower rank is >= it, so the next rank is their minimum
    let upper: f64 = above
        .iter()
        .copied()
        .min_by(compare)
        .map_or(lower, |value| value.as_());

    Some(fraction.mul_add(upper - lower, lower))
}
