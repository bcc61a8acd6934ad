//! Bayesian rating store: Thompson sampling and the Kalman-style scalar
//! update.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::types::{MemoryRating, Reward, SIGMA_MAX, SIGMA_MIN};

/// Observation noise variance assumed for each feedback event.
const SIGMA_OBS: f64 = 1.0;
/// Additive drift that keeps posterior uncertainty from collapsing.
const SIGMA_DRIFT: f64 = 0.01;
/// Floor applied to Box-Muller's uniform draws to avoid `ln(0)`.
const BOX_MULLER_EPSILON: f64 = 1e-9;

/// Draw a single standard-normal sample via Box-Muller, using two uniform
/// draws from `rng` clamped away from zero, then return `mu + sigma * z`.
pub fn thompson_sample(mu: f64, sigma: f64, rng: &mut impl Rng) -> f64 {
    let u1: f64 = rng.gen_range(0.0..1.0).max(BOX_MULLER_EPSILON);
    let u2: f64 = rng.gen_range(0.0..1.0).max(BOX_MULLER_EPSILON);
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mu + sigma * z
}

/// Affine-map a Thompson sample into `[0, 1]` via `clamp((z + 1) / 2, 0, 1)`,
/// used as the `thompson` composite-utility signal.
#[must_use]
pub fn thompson_to_unit_interval(z: f64) -> f64 {
    ((z + 1.0) / 2.0).clamp(0.0, 1.0)
}

/// `mu = 0`, `sigma = 1.0`, `uses = 0`.
#[must_use]
pub fn initialize_rating(memory_id: &str, kernel_id: &str, now: DateTime<Utc>) -> MemoryRating {
    MemoryRating::fresh(memory_id, kernel_id, now)
}

/// Apply one Kalman-style scalar update for the given `reward`, returning the
/// updated rating. Sigma is clamped to `[0.1, 2.0]` *after* the drift term is
/// added.
#[must_use]
pub fn update_rating(rating: &MemoryRating, reward: Reward, now: DateTime<Utc>) -> MemoryRating {
    let v = rating.sigma * rating.sigma;
    let r = SIGMA_OBS * SIGMA_OBS;
    let gain = v / (v + r);

    let mu = rating.mu + gain * (reward.as_f64() - rating.mu);
    let sigma = ((1.0 - gain) * v).max(1e-6).sqrt() + SIGMA_DRIFT;
    let sigma = sigma.clamp(SIGMA_MIN, SIGMA_MAX);

    MemoryRating {
        memory_id: rating.memory_id.clone(),
        kernel_id: rating.kernel_id.clone(),
        mu,
        sigma,
        uses: rating.uses + 1,
        last_updated_at: now,
    }
}
