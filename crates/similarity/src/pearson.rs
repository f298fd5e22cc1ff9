//! Pearson correlation over sparse rating columns.
//!
//! A column holds only the users who rated an item. Two columns are compared
//! over the users present in both; everyone else is ignored, the same way a
//! pairwise-complete correlation skips missing cells.

use data_loader::UserId;

/// One item's ratings as `(user, rating)` pairs, sorted by user id
pub type Column = [(UserId, f64)];

/// A side counts as constant when its sum of squared deviations is at most
/// this fraction of its sum of squared values
const RELATIVE_VARIANCE_EPSILON: f64 = 1e-12;

/// Ratings given by users present in both columns, as two aligned vectors
///
/// Both columns must be sorted by user id.
pub fn co_ratings(a: &Column, b: &Column) -> (Vec<f64>, Vec<f64>) {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        let (user_a, rating_a) = a[i];
        let (user_b, rating_b) = b[j];
        if user_a < user_b {
            i += 1;
        } else if user_a > user_b {
            j += 1;
        } else {
            xs.push(rating_a);
            ys.push(rating_b);
            i += 1;
            j += 1;
        }
    }

    (xs, ys)
}

/// Pearson correlation coefficient of two paired sequences
///
/// Returns `None` when the correlation is undefined: fewer than two pairs,
/// either sequence is constant, or a value is not finite. Extra trailing values
/// on the longer side are ignored.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);

    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let (covariance, var_x, var_y, sq_x, sq_y) = xs.iter().zip(ys).fold(
        (0.0, 0.0, 0.0, 0.0, 0.0),
        |(cov, vx, vy, sx, sy), (&xi, &yi)| {
            let dx = xi - mean_x;
            let dy = yi - mean_y;
            (cov + dx * dy, vx + dx * dx, vy + dy * dy, sx + xi * xi, sy + yi * yi)
        },
    );

    // NaN fails every comparison, so reject non-finite sums explicitly
    if !(covariance.is_finite() && var_x.is_finite() && var_y.is_finite()) {
        return None;
    }
    if var_x <= RELATIVE_VARIANCE_EPSILON * sq_x || var_y <= RELATIVE_VARIANCE_EPSILON * sq_y {
        return None;
    }

    let r = covariance / (var_x.sqrt() * var_y.sqrt());
    if !r.is_finite() {
        return None;
    }
    // Rounding can push a perfect correlation a hair past 1
    Some(r.clamp(-1.0, 1.0))
}

/// Pearson correlation between two rating columns over their co-rating users
pub fn column_correlation(a: &Column, b: &Column) -> Option<f64> {
    let (xs, ys) = co_ratings(a, b);
    pearson(&xs, &ys)
}
