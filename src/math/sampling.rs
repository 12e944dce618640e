//! Sampling transforms used by the fragment distributions.

use nalgebra::Vector3;

/// Transforms a uniform sample `y` from `U(0, 1)` into a sample of the
/// bounded Pareto (power-law) distribution on `[min, max]` with the given
/// exponent.
///
/// `((max^(a+1) - min^(a+1)) y + min^(a+1))^(1/(a+1))`
#[must_use]
pub fn uniform_to_power_law(min: f64, max: f64, exponent: f64, y: f64) -> f64 {
    let step = exponent + 1.0;
    ((max.powf(step) - min.powf(step)) * y + min.powf(step)).powf(1.0 / step)
}

/// Builds a uniformly distributed direction on the unit sphere from
/// `u` in `[-1, 1]` and `theta` in `[0, 2 pi)`.
#[must_use]
pub fn unit_sphere_direction(u: f64, theta: f64) -> Vector3<f64> {
    let v = (1.0 - u * u).sqrt();
    Vector3::new(v * theta.cos(), v * theta.sin(), u)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every power-law sample stays inside the configured bounds.
        #[test]
        fn prop_power_law_bounds(y in 0.0..1.0f64) {
            for exponent in [-2.6, -2.71] {
                let value = uniform_to_power_law(0.05, 3.5, exponent, y);
                prop_assert!((0.05..=3.5).contains(&value), "sample {value} out of bounds");
            }
        }

        /// Every generated direction has unit norm.
        #[test]
        fn prop_unit_sphere_norm(
            u in -1.0..1.0f64,
            theta in 0.0..(2.0 * std::f64::consts::PI),
        ) {
            let norm = unit_sphere_direction(u, theta).norm();
            prop_assert!((norm - 1.0).abs() < 1e-10);
        }
    }
}
