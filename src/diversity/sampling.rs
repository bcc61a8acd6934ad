//! Weighted random sampling without replacement.

use rand::Rng;

/// Draw up to `k` items from `items` without replacement, weighted by
/// `weights` (same length, same order).
///
/// On each draw the pool total is `sum(max(0, w))`. If the total is zero the
/// next item is drawn uniformly from the remaining pool. Negative weights
/// are treated as zero for sampling probability but the item stays eligible
/// (it can only be picked while the whole remaining pool has zero total).
///
/// If floating-point rounding causes the running-sum scan to fall through
/// without exceeding the draw (every remaining weight effectively zero), the
/// fallback clamps to the last remaining index rather than panicking or
/// looping.
///
/// # Panics
/// Panics if `items.len() != weights.len()`.
#[must_use]
pub fn weighted_sample<T: Clone>(
    items: &[T],
    weights: &[f64],
    k: usize,
    rng: &mut impl Rng,
) -> Vec<T> {
    assert_eq!(items.len(), weights.len());

    let mut pool: Vec<(T, f64)> = items.iter().cloned().zip(weights.iter().copied()).collect();
    let mut result = Vec::with_capacity(k.min(pool.len()));

    while result.len() < k && !pool.is_empty() {
        let total: f64 = pool.iter().map(|(_, w)| w.max(0.0)).sum();

        let chosen = if total <= 0.0 {
            rng.gen_range(0..pool.len())
        } else {
            let draw = rng.gen_range(0.0..total);
            let mut running = 0.0;
            let mut chosen = pool.len() - 1;
            let mut found = false;
            for (i, (_, w)) in pool.iter().enumerate() {
                running += w.max(0.0);
                if running > draw {
                    chosen = i;
                    found = true;
                    break;
                }
            }
            if !found {
                chosen = pool.len() - 1;
            }
            chosen
        };

        result.push(pool.remove(chosen).0);
    }

    result
}
