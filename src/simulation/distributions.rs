//! The area-to-mass ratio distribution of the NASA breakup model
//! (Eq. 5, 6 and 7) and its piecewise-linear coefficient functions.
//!
//! All break points and slopes are the published values and differ between
//! rocket bodies and spacecraft; debris and unknown objects use the
//! spacecraft branch.

use crate::model::satellite::SatKind;
use crate::simulation::rng::FragmentRng;

/// Lower bound of the bridge regime (m).
const BRIDGE_LOWER: f64 = 0.08;

/// Upper bound of the bridge regime (m).
const BRIDGE_UPPER: f64 = 0.11;

fn is_rocket_body(kind: SatKind) -> bool {
    kind == SatKind::RocketBody
}

/// Piecewise-linear helper shared by all coefficient functions: constant
/// `lower_value` up to `lower_bound`, constant `upper_value` from
/// `upper_bound`, the given line in between.
fn piecewise(
    log_lc: f64,
    lower_bound: f64,
    upper_bound: f64,
    lower_value: f64,
    upper_value: f64,
    mid: impl Fn(f64) -> f64,
) -> f64 {
    if log_lc <= lower_bound {
        lower_value
    } else if log_lc >= upper_bound {
        upper_value
    } else {
        mid(log_lc)
    }
}

/// Weight of the first normal component for the big-fragment regime.
#[must_use]
pub fn alpha(kind: SatKind, log_lc: f64) -> f64 {
    if is_rocket_body(kind) {
        piecewise(log_lc, -1.4, 0.0, 1.0, 0.5, |x| 1.0 - 0.3571 * (x + 1.4))
    } else {
        piecewise(log_lc, -1.95, 0.55, 0.0, 1.0, |x| 0.3 + 0.4 * (x + 1.2))
    }
}

/// Mean of the first normal component for the big-fragment regime.
#[must_use]
pub fn mu_1(kind: SatKind, log_lc: f64) -> f64 {
    if is_rocket_body(kind) {
        piecewise(log_lc, -0.5, 0.0, -0.45, -0.9, |x| -0.45 - 0.9 * (x + 0.5))
    } else {
        piecewise(log_lc, -1.1, 0.0, -0.6, -0.95, |x| -0.6 - 0.318 * (x + 1.1))
    }
}

/// Standard deviation of the first normal component for the big-fragment
/// regime.
#[must_use]
pub fn sigma_1(kind: SatKind, log_lc: f64) -> f64 {
    if is_rocket_body(kind) {
        0.55
    } else {
        piecewise(log_lc, -1.3, -0.3, 0.1, 0.3, |x| 0.1 + 0.2 * (x + 1.3))
    }
}

/// Mean of the second normal component for the big-fragment regime.
#[must_use]
pub fn mu_2(kind: SatKind, log_lc: f64) -> f64 {
    if is_rocket_body(kind) {
        -0.9
    } else {
        piecewise(log_lc, -0.7, -0.1, -1.2, -2.0, |x| -1.2 - 1.333 * (x + 0.7))
    }
}

/// Standard deviation of the second normal component for the big-fragment
/// regime.
#[must_use]
pub fn sigma_2(kind: SatKind, log_lc: f64) -> f64 {
    if is_rocket_body(kind) {
        piecewise(log_lc, -1.0, 0.1, 0.28, 0.1, |x| -0.28 - 0.1636 * (x + 1.0))
    } else {
        piecewise(log_lc, -0.5, -0.3, 0.5, 0.3, |x| 0.5 - (x + 0.5))
    }
}

/// Mean of the small-fragment (soc) regime, shared by both kinds.
#[must_use]
pub fn mu_soc(log_lc: f64) -> f64 {
    piecewise(log_lc, -1.75, -1.25, -0.3, -1.0, |x| -0.3 - 1.4 * (x + 1.75))
}

/// Standard deviation of the small-fragment (soc) regime, shared by both
/// kinds.
#[must_use]
pub fn sigma_soc(log_lc: f64) -> f64 {
    if log_lc <= -3.5 {
        0.2
    } else {
        0.2 + 0.1333 * (log_lc + 3.5)
    }
}

fn sample_big_regime(rng: &FragmentRng, kind: SatKind, log_lc: f64) -> f64 {
    let weight = alpha(kind, log_lc);
    let n1 = rng.normal(mu_1(kind, log_lc), sigma_1(kind, log_lc));
    let n2 = rng.normal(mu_2(kind, log_lc), sigma_2(kind, log_lc));
    10f64.powf(weight * n1 + (1.0 - weight) * n2)
}

fn sample_small_regime(rng: &FragmentRng, log_lc: f64) -> f64 {
    10f64.powf(rng.normal(mu_soc(log_lc), sigma_soc(log_lc)))
}

/// Sample an area-to-mass ratio in m²/kg for a fragment of the given
/// characteristic length.
///
/// Fragments above 11 cm use the bimodal log-normal of the parent kind,
/// fragments below 8 cm the soc log-normal, and the bridge in between
/// interpolates both samples linearly in L_c.
#[must_use]
pub fn sample_area_to_mass_ratio(
    rng: &FragmentRng,
    kind: SatKind,
    characteristic_length: f64,
) -> f64 {
    let log_lc = characteristic_length.log10();
    if characteristic_length > BRIDGE_UPPER {
        sample_big_regime(rng, kind, log_lc)
    } else if characteristic_length < BRIDGE_LOWER {
        sample_small_regime(rng, log_lc)
    } else {
        let y1 = sample_big_regime(rng, kind, log_lc);
        let y0 = sample_small_regime(rng, log_lc);
        y0 + (characteristic_length - BRIDGE_LOWER) * (y1 - y0) / (BRIDGE_UPPER - BRIDGE_LOWER)
    }
}
