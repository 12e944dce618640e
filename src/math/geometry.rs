//! Geometric relations between characteristic length, area and mass
//! (Eq. 1, 8 and 9 of the NASA breakup model).

use std::f64::consts::PI;

/// Density scaling factor of Eq. 1 (kg/m³ at 1 m characteristic length).
const DENSITY_FACTOR: f64 = 92.937;

/// Density exponent of Eq. 1.
const DENSITY_EXPONENT: f64 = -0.74;

/// Characteristic length below which Eq. 8 applies instead of Eq. 9 (m).
const AREA_LC_BOUND: f64 = 0.001_67;

/// Density of a fragment of the given characteristic length (kg/m³).
#[must_use]
pub fn fragment_density(characteristic_length: f64) -> f64 {
    DENSITY_FACTOR * characteristic_length.powf(DENSITY_EXPONENT)
}

/// Mass of a sphere with the characteristic length as diameter and the
/// density of Eq. 1 (kg).
#[must_use]
pub fn sphere_mass(characteristic_length: f64) -> f64 {
    let radius = characteristic_length / 2.0;
    fragment_density(characteristic_length) * (4.0 / 3.0) * PI * radius.powi(3)
}

/// Inverse of [`sphere_mass`]: the characteristic length of a sphere of the
/// given mass (m).
#[must_use]
pub fn characteristic_length_from_mass(mass: f64) -> f64 {
    // rho(Lc) (4/3) pi (Lc/2)^3 = (pi/6) 92.937 Lc^2.26
    (6.0 * mass / (DENSITY_FACTOR * PI)).powf(1.0 / 2.26)
}

/// Area of a circle with the characteristic length as diameter (m²).
#[must_use]
pub fn circle_area(characteristic_length: f64) -> f64 {
    let radius = characteristic_length / 2.0;
    PI * radius * radius
}

/// Characteristic length of a circle of the given area (m).
#[must_use]
pub fn characteristic_length_from_area(area: f64) -> f64 {
    2.0 * (area / PI).sqrt()
}

/// Average cross-sectional area of a fragment (Eq. 8/9) in m².
#[must_use]
pub fn area_from_characteristic_length(characteristic_length: f64) -> f64 {
    if characteristic_length < AREA_LC_BOUND {
        0.540_424 * characteristic_length * characteristic_length
    } else {
        0.556_945 * characteristic_length.powf(2.004_707_7)
    }
}
