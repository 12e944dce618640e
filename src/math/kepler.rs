//! Keplerian helper functions: anomaly conversions and the TLE mean-motion
//! relation.
//!
//! The mean anomaly solve uses Newton-Raphson on Kepler's equation with a
//! relative convergence threshold of 1e-16 and a hard iteration cap.

use std::f64::consts::PI;

use crate::error::{BreakupError, BreakupResult};

/// Standard gravitational parameter of Earth (m³/s²).
pub const EARTH_GRAVITATIONAL_PARAMETER: f64 = 3.986_004_418_8e14;

/// Relative accuracy of the Newton-Raphson anomaly solve.
const NEWTON_ACCURACY: f64 = 1e-16;

/// Iteration cap of the Newton-Raphson anomaly solve.
const NEWTON_MAX_ITERATIONS: usize = 100;

/// Norms an angle to `[0, 2π)` range by adding 2π if negative.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    if angle < 0.0 {
        angle + 2.0 * PI
    } else {
        angle
    }
}

/// Kepler's equation residual `E - e sin E - MA`.
fn kepler_equation(eccentric_anomaly: f64, mean_anomaly: f64, eccentricity: f64) -> f64 {
    eccentric_anomaly - eccentricity * eccentric_anomaly.sin() - mean_anomaly
}

/// Derivative of Kepler's equation `1 - e cos E`.
fn kepler_equation_derivative(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    1.0 - eccentricity * eccentric_anomaly.cos()
}

/// Converts the mean anomaly to the eccentric anomaly (both in radians).
///
/// Solves Kepler's equation with Newton-Raphson starting from
/// `E0 = MA + e sin MA`.
///
/// # Errors
///
/// [`BreakupError::ConvergenceExhausted`] if the solve does not converge
/// within the iteration cap.
pub fn mean_to_eccentric_anomaly(mean_anomaly: f64, eccentricity: f64) -> BreakupResult<f64> {
    let mut eccentric_anomaly = mean_anomaly + eccentricity * mean_anomaly.sin();
    for _ in 0..NEWTON_MAX_ITERATIONS {
        let step = kepler_equation(eccentric_anomaly, mean_anomaly, eccentricity)
            / kepler_equation_derivative(eccentric_anomaly, eccentricity);
        eccentric_anomaly -= step;
        if (step / eccentric_anomaly.abs().max(1.0)).abs() <= NEWTON_ACCURACY {
            return Ok(normalize_angle(eccentric_anomaly));
        }
    }
    Err(BreakupError::ConvergenceExhausted {
        iterations: NEWTON_MAX_ITERATIONS,
    })
}

/// Converts the eccentric anomaly to the mean anomaly (both in radians).
#[must_use]
pub fn eccentric_to_mean_anomaly(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    normalize_angle(eccentric_anomaly - eccentricity * eccentric_anomaly.sin())
}

/// Converts the true anomaly to the eccentric anomaly (both in radians).
#[must_use]
pub fn true_to_eccentric_anomaly(true_anomaly: f64, eccentricity: f64) -> f64 {
    let root = ((1.0 - eccentricity) / (1.0 + eccentricity)).sqrt();
    normalize_angle(2.0 * (root * (true_anomaly / 2.0).tan()).atan())
}

/// Converts the eccentric anomaly to the true anomaly (both in radians).
#[must_use]
pub fn eccentric_to_true_anomaly(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    let root = ((1.0 + eccentricity) / (1.0 - eccentricity)).sqrt();
    normalize_angle(2.0 * (root * (eccentric_anomaly / 2.0).tan()).atan())
}

/// Transforms a TLE mean motion in [rev/day] to the semi-major axis in [m].
///
/// `a = mu^(1/3) / (2 pi n / 86400)^(2/3)`
#[must_use]
pub fn mean_motion_to_semi_major_axis(mean_motion: f64) -> f64 {
    let rad_per_second = 2.0 * PI * mean_motion / 86_400.0;
    EARTH_GRAVITATIONAL_PARAMETER.cbrt() / rad_per_second.powf(2.0 / 3.0)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// The mean -> eccentric -> mean roundtrip is the identity.
        #[test]
        fn prop_mean_anomaly_roundtrip(
            mean_anomaly in 0.0..(2.0 * PI),
            eccentricity in 0.0..0.95f64,
        ) {
            let eccentric = mean_to_eccentric_anomaly(mean_anomaly, eccentricity);
            prop_assert!(eccentric.is_ok());
            if let Ok(eccentric) = eccentric {
                let recovered = eccentric_to_mean_anomaly(eccentric, eccentricity);
                let error = (recovered - mean_anomaly).abs();
                let wrapped = (error - 2.0 * PI).abs().min(error);
                prop_assert!(wrapped < 1e-12, "roundtrip error {wrapped}");
            }
        }

        /// The eccentric anomaly solve always lands in [0, 2 pi).
        #[test]
        fn prop_eccentric_anomaly_range(
            mean_anomaly in 0.0..(2.0 * PI),
            eccentricity in 0.0..0.95f64,
        ) {
            if let Ok(eccentric) = mean_to_eccentric_anomaly(mean_anomaly, eccentricity) {
                prop_assert!((0.0..2.0 * PI + 1e-12).contains(&eccentric));
            }
        }
    }
}
