//! Clamped noise sampling for the gaussian input factor.

use rand_distr::{Distribution, Normal};


/// Samples a normal distribution with the given mean and standard deviation
/// and clamps the result between the given minimum and maximum, a standard
/// deviation that is not strictly positive always yields the mean
pub fn limited_distr(mean: f32, std: f32, minimum: f32, maximum: f32) -> f32 {
    if !(std > 0.) {
        return mean;
    }

    match Normal::new(mean, std) {
        Ok(normal) => {
            let output: f32 = normal.sample(&mut rand::thread_rng());

            output.max(minimum).min(maximum)
        }
        Err(_) => mean,
    }
}
