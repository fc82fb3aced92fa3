use rand::seq::index;
use rand::Rng;
use std::cmp::Ordering;

/// k-way tournament: draw `k` distinct contenders, return the fittest.
///
/// `k` is clamped to `[1, len]`; ties go to the contender drawn first.
pub fn tournament_select<R: Rng + ?Sized>(
    fitness: &[f64],
    k: usize,
    rng: &mut R,
) -> Option<usize> {
    if fitness.is_empty() {
        return None;
    }
    let k = k.clamp(1, fitness.len());
    index::sample(rng, fitness.len(), k)
        .iter()
        .fold(None, |best: Option<usize>, i| match best {
            Some(b) if fitness[i] <= fitness[b] => Some(b),
            _ => Some(i),
        })
}

/// Uniform index into a collection of length `len`.
pub fn random_index<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(rng.gen_range(0..len))
    }
}

/// Indices sorted by descending fitness; equal fitness keeps input order.
pub fn truncation_order(fitness: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..fitness.len()).collect();
    order.sort_by(|a, b| {
        fitness[*b]
            .partial_cmp(&fitness[*a])
            .unwrap_or(Ordering::Equal)
    });
    order
}

/// Index of the highest fitness; the first one on ties.
pub fn champion_index(fitness: &[f64]) -> Option<usize> {
    truncation_order(fitness).first().copied()
}
