use std::cmp::Ordering;

/// Linear interpolation between the closest ranks.
///
/// `values` may come in any order, the sort happens on a private copy. An
/// empty input yields `0.0`. The percentile is not clamped: a rank whose
/// bracketing order statistics fall outside the data (or a NaN rank) yields
/// `f64::NAN` instead of panicking.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    try_percentile(values, p).unwrap_or(f64::NAN)
}

/// Same as [`percentile`], but tells apart a rank that lands exactly on a
/// missing order statistic (`None`) from an interpolation that involved one
/// (`Some(NaN)`).
pub fn try_percentile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return Some(0.0);
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(ascending);

    let n = sorted.len();
    let rank = (p / 100.0) * ((n - 1) as f64);
    let lo = rank.floor();
    let hi = rank.ceil();

    if lo == hi {
        return order_statistic(&sorted, lo);
    }

    match (order_statistic(&sorted, lo), order_statistic(&sorted, hi)) {
        (Some(lower), Some(upper)) => Some(lower + (rank - lo) * (upper - lower)),
        _ => Some(f64::NAN),
    }
}

// Numeric order with -0.0 == 0.0; NaN falls back to the IEEE total order.
// The sort is stable, so equal values keep their insertion order.
fn ascending(a: &f64, b: &f64) -> Ordering {
    a.partial_cmp(b).unwrap_or_else(|| a.total_cmp(b))
}

fn order_statistic(sorted: &[f64], index: f64) -> Option<f64> {
    // NaN fails both comparisons
    if index >= 0.0 && index < sorted.len() as f64 {
        Some(sorted[index as usize])
    } else {
        None
    }
}
