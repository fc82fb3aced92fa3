use std::f64::consts::PI;

/// `count / total` with the denominator floored at 1.
pub fn pass_fraction(count: usize, total: usize) -> f64 {
    count as f64 / total.max(1) as f64
}

/// Pass rate of one test column, weighted by each program's logic fitness.
///
/// `column[i]` is whether program `i` passes; `weights[i]` its logic fitness.
/// Zero total weight gives zero confidence.
pub fn confidence(column: &[bool], weights: &[f64]) -> f64 {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    let endorsed: f64 = column
        .iter()
        .zip(weights)
        .filter(|(pass, _)| **pass)
        .map(|(_, w)| *w)
        .sum();
    (endorsed / total).clamp(0.0, 1.0)
}

/// `-p log2 p - (1-p) log2 (1-p)`, exactly zero at and beyond the boundaries.
pub fn binary_entropy(p: f64) -> f64 {
    if p <= 0.0 || p >= 1.0 || p.is_nan() {
        return 0.0;
    }
    let q = 1.0 - p;
    (-p * p.log2() - q * q.log2()).clamp(0.0, 1.0)
}

/// Discrimination of a test passed by `passes` of `programs` programs.
pub fn discrimination(passes: usize, programs: usize) -> f64 {
    if programs == 0 || passes == 0 || passes >= programs {
        return 0.0;
    }
    binary_entropy(passes as f64 / programs as f64)
}

/// Cosine schedule from `min` at `step = 0` to `max` at `step = total`.
pub fn cosine_anneal(min: f64, max: f64, step: usize, total: usize) -> f64 {
    let progress = if total == 0 {
        0.0
    } else {
        (step.min(total) as f64) / total as f64
    };
    let w = (1.0 - (PI * progress).cos()) / 2.0;
    min + (max - min) * w
}
