//! Classical orbital elements with epoch and anomaly conversions.
//!
//! The stored anomaly is always the *eccentric* anomaly; mean and true
//! anomalies are derived on demand as pure functions of `(E, e)`. The
//! cartesian conversions follow the pykep par2ic/ic2par algorithms and
//! support the elliptic and the hyperbolic branch.

use std::f64::consts::{FRAC_PI_4, PI};
use std::fmt;

use nalgebra::{Matrix3, Vector3};

use crate::error::BreakupResult;
use crate::math::kepler::{
    eccentric_to_mean_anomaly, eccentric_to_true_anomaly, mean_motion_to_semi_major_axis,
    mean_to_eccentric_anomaly, normalize_angle, true_to_eccentric_anomaly,
    EARTH_GRAVITATIONAL_PARAMETER,
};

/// Unit of angular getters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngularUnit {
    /// Degrees.
    Degree,
    /// Radians (canonical storage unit).
    Radian,
}

/// The three interchangeable orbital anomalies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalyKind {
    /// Eccentric anomaly (primary stored anomaly).
    Eccentric,
    /// Mean anomaly.
    Mean,
    /// True anomaly.
    True,
}

/// Timestamp of an orbital element tuple: year plus day-of-year with a
/// fractional part (e.g. `31.25992506` is January 31, 06:14:17).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Epoch {
    /// Calendar year, e.g. 2008.
    pub year: i32,
    /// Day of the year plus the fraction of that day.
    pub day_fraction: f64,
}

impl Epoch {
    /// Create a new epoch.
    #[must_use]
    pub const fn new(year: i32, day_fraction: f64) -> Self {
        Self { year, day_fraction }
    }
}

/// Immutable six-element orbital state with an optional epoch.
#[derive(Debug, Clone, Copy)]
pub struct OrbitalElements {
    /// Semi-major axis (m), positive; negated internally for `e > 1`.
    semi_major_axis: f64,
    /// Eccentricity (dimensionless, >= 0).
    eccentricity: f64,
    /// Inclination (rad).
    inclination: f64,
    /// Longitude of the ascending node (rad).
    raan: f64,
    /// Argument of periapsis (rad).
    argument_of_periapsis: f64,
    /// Eccentric anomaly (rad).
    eccentric_anomaly: f64,
    /// Epoch of the tuple, if known.
    epoch: Option<Epoch>,
}

impl OrbitalElements {
    /// Create orbital elements directly from the canonical representation
    /// `(a [m], e, i [rad], raan [rad], argument of periapsis [rad],
    /// eccentric anomaly [rad])`.
    #[must_use]
    pub const fn new(elements: [f64; 6], epoch: Option<Epoch>) -> Self {
        Self {
            semi_major_axis: elements[0],
            eccentricity: elements[1],
            inclination: elements[2],
            raan: elements[3],
            argument_of_periapsis: elements[4],
            eccentric_anomaly: elements[5],
            epoch,
        }
    }

    /// Create orbital elements with all angles in radians and the anomaly of
    /// the given kind (converted to eccentric internally).
    ///
    /// # Errors
    ///
    /// [`crate::error::BreakupError::ConvergenceExhausted`] if a mean anomaly
    /// cannot be converted.
    pub fn from_radians(
        elements: [f64; 6],
        anomaly_kind: AnomalyKind,
        epoch: Option<Epoch>,
    ) -> BreakupResult<Self> {
        let eccentricity = elements[1];
        let eccentric_anomaly = match anomaly_kind {
            AnomalyKind::Eccentric => normalize_angle(elements[5]),
            AnomalyKind::Mean => mean_to_eccentric_anomaly(elements[5], eccentricity)?,
            AnomalyKind::True => true_to_eccentric_anomaly(elements[5], eccentricity),
        };
        Ok(Self::new(
            [
                elements[0],
                eccentricity,
                elements[2],
                elements[3],
                elements[4],
                eccentric_anomaly,
            ],
            epoch,
        ))
    }

    /// Create orbital elements with all angles in degrees and the anomaly of
    /// the given kind.
    ///
    /// # Errors
    ///
    /// [`crate::error::BreakupError::ConvergenceExhausted`] if a mean anomaly
    /// cannot be converted.
    pub fn from_degrees(
        elements: [f64; 6],
        anomaly_kind: AnomalyKind,
        epoch: Option<Epoch>,
    ) -> BreakupResult<Self> {
        Self::from_radians(
            [
                elements[0],
                elements[1],
                elements[2].to_radians(),
                elements[3].to_radians(),
                elements[4].to_radians(),
                elements[5].to_radians(),
            ],
            anomaly_kind,
            epoch,
        )
    }

    /// Create orbital elements from the fields of a TLE line 2:
    /// `(mean motion [rev/day], e, i [deg], raan [deg], argument of
    /// periapsis [deg], mean anomaly [deg])`.
    ///
    /// # Errors
    ///
    /// [`crate::error::BreakupError::ConvergenceExhausted`] if the mean
    /// anomaly cannot be converted.
    pub fn from_tle(tle_data: [f64; 6], epoch: Epoch) -> BreakupResult<Self> {
        Self::from_degrees(
            [
                mean_motion_to_semi_major_axis(tle_data[0]),
                tle_data[1],
                tle_data[2],
                tle_data[3],
                tle_data[4],
                tle_data[5],
            ],
            AnomalyKind::Mean,
            Some(epoch),
        )
    }

    /// Recover the orbital elements from cartesian state vectors (position
    /// in [m], velocity in [m/s]).
    ///
    /// Singular for exactly equatorial or circular orbits, like the
    /// reference algorithm.
    #[must_use]
    pub fn from_state_vectors(position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        let mu = EARTH_GRAVITATIONAL_PARAMETER;
        let z_axis = Vector3::z();

        // Orbital angular momentum and parameter.
        let angular_momentum = position.cross(&velocity);
        let parameter = angular_momentum.dot(&angular_momentum) / mu;

        // Node line (singular at zero inclination).
        let node = z_axis.cross(&angular_momentum).normalize();

        // Eccentricity vector.
        let radius = position.norm();
        let eccentricity_vector = velocity.cross(&angular_momentum) / mu - position / radius;
        let eccentricity = eccentricity_vector.norm();

        let semi_major_axis = (parameter / (1.0 - eccentricity * eccentricity)).abs();
        let inclination = (angular_momentum.z / angular_momentum.norm()).acos();

        let mut argument_of_periapsis = (node.dot(&eccentricity_vector) / eccentricity).acos();
        if eccentricity_vector.z < 0.0 {
            argument_of_periapsis = 2.0 * PI - argument_of_periapsis;
        }

        let mut raan = node.x.acos();
        if node.y < 0.0 {
            raan = 2.0 * PI - raan;
        }

        let mut true_anomaly = (eccentricity_vector.dot(&position) / eccentricity / radius).acos();
        if position.dot(&velocity) < 0.0 {
            true_anomaly = 2.0 * PI - true_anomaly;
        }

        // Eccentric anomaly, or the Gudermannian for hyperbolic orbits.
        let root = if eccentricity < 1.0 {
            (1.0 - eccentricity) / (1.0 + eccentricity)
        } else {
            (eccentricity - 1.0) / (eccentricity + 1.0)
        };
        let eccentric_anomaly =
            normalize_angle(2.0 * (root.sqrt() * (true_anomaly / 2.0).tan()).atan());

        Self::new(
            [
                semi_major_axis,
                eccentricity,
                inclination,
                raan,
                argument_of_periapsis,
                eccentric_anomaly,
            ],
            None,
        )
    }

    /// Compute the cartesian position [m] and velocity [m/s] of these
    /// elements.
    #[must_use]
    pub fn to_cartesian(&self) -> (Vector3<f64>, Vector3<f64>) {
        let mu = EARTH_GRAVITATIONAL_PARAMETER;
        let eccentricity = self.eccentricity;
        // The stored semi-major axis is positive; the hyperbolic equations
        // expect it negative.
        let a = if eccentricity > 1.0 {
            -self.semi_major_axis
        } else {
            self.semi_major_axis
        };
        let cos_ea = self.eccentric_anomaly.cos();

        // 1 - Position and velocity in the perifocal frame.
        let (x_per, y_per, xdot_per, ydot_per) = if eccentricity < 1.0 {
            let sin_ea = self.eccentric_anomaly.sin();
            let b = a * (1.0 - eccentricity * eccentricity).sqrt();
            let n = (mu / (a * a * a)).sqrt();
            (
                a * (cos_ea - eccentricity),
                b * sin_ea,
                -(a * n * sin_ea) / (1.0 - eccentricity * cos_ea),
                (b * n * cos_ea) / (1.0 - eccentricity * cos_ea),
            )
        } else {
            // The anomaly is reinterpreted as the Gudermannian.
            let tan_ea = self.eccentric_anomaly.tan();
            let tan_half = (0.5 * self.eccentric_anomaly + FRAC_PI_4).tan();
            let b = -a * (eccentricity * eccentricity - 1.0).sqrt();
            let n = (-mu / (a * a * a)).sqrt();
            let dn_dzeta =
                eccentricity * (1.0 + tan_ea * tan_ea) - (0.5 + 0.5 * tan_half * tan_half) / tan_half;
            (
                a / cos_ea - a * eccentricity,
                b * tan_ea,
                a * tan_ea / cos_ea * n / dn_dzeta,
                b / (cos_ea * cos_ea) * n / dn_dzeta,
            )
        };

        // 2 - Rotation from the perifocal to the inertial frame.
        let (sin_raan, cos_raan) = self.raan.sin_cos();
        let (sin_argp, cos_argp) = self.argument_of_periapsis.sin_cos();
        let (sin_i, cos_i) = self.inclination.sin_cos();
        let rotation = Matrix3::new(
            cos_raan * cos_argp - sin_raan * sin_argp * cos_i,
            -cos_raan * sin_argp - sin_raan * cos_argp * cos_i,
            sin_raan * sin_i,
            sin_raan * cos_argp + cos_raan * sin_argp * cos_i,
            -sin_raan * sin_argp + cos_raan * cos_argp * cos_i,
            -cos_raan * sin_i,
            sin_argp * sin_i,
            cos_argp * sin_i,
            cos_i,
        );

        // 3 - Transform both perifocal vectors.
        let position = rotation * Vector3::new(x_per, y_per, 0.0);
        let velocity = rotation * Vector3::new(xdot_per, ydot_per, 0.0);
        (position, velocity)
    }

    /// The elements as the canonical array
    /// `[a, e, i, raan, argument of periapsis, eccentric anomaly]`.
    #[must_use]
    pub const fn as_array(&self) -> [f64; 6] {
        [
            self.semi_major_axis,
            self.eccentricity,
            self.inclination,
            self.raan,
            self.argument_of_periapsis,
            self.eccentric_anomaly,
        ]
    }

    /// Semi-major axis (m).
    #[must_use]
    pub const fn semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    /// Eccentricity (dimensionless).
    #[must_use]
    pub const fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    /// Inclination in the requested unit.
    #[must_use]
    pub fn inclination(&self, unit: AngularUnit) -> f64 {
        convert_angle(self.inclination, unit)
    }

    /// Longitude of the ascending node in the requested unit.
    #[must_use]
    pub fn raan(&self, unit: AngularUnit) -> f64 {
        convert_angle(self.raan, unit)
    }

    /// Argument of periapsis in the requested unit.
    #[must_use]
    pub fn argument_of_periapsis(&self, unit: AngularUnit) -> f64 {
        convert_angle(self.argument_of_periapsis, unit)
    }

    /// The requested anomaly, derived from the stored eccentric anomaly.
    #[must_use]
    pub fn anomaly(&self, kind: AnomalyKind, unit: AngularUnit) -> f64 {
        let anomaly = match kind {
            AnomalyKind::Eccentric => self.eccentric_anomaly,
            AnomalyKind::Mean => eccentric_to_mean_anomaly(self.eccentric_anomaly, self.eccentricity),
            AnomalyKind::True => eccentric_to_true_anomaly(self.eccentric_anomaly, self.eccentricity),
        };
        convert_angle(anomaly, unit)
    }

    /// Epoch of these elements, if known.
    #[must_use]
    pub const fn epoch(&self) -> Option<Epoch> {
        self.epoch
    }
}

/// Equality compares the six elements exactly; the epoch is metadata.
impl PartialEq for OrbitalElements {
    fn eq(&self, other: &Self) -> bool {
        self.as_array() == other.as_array()
    }
}

impl fmt::Display for OrbitalElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OrbitalElements{{a: {} e: {} i: {} raan: {} argp: {} EA: {}}}",
            self.semi_major_axis,
            self.eccentricity,
            self.inclination,
            self.raan,
            self.argument_of_periapsis,
            self.eccentric_anomaly
        )
    }
}

fn convert_angle(angle: f64, unit: AngularUnit) -> f64 {
    match unit {
        AngularUnit::Radian => angle,
        AngularUnit::Degree => angle.to_degrees(),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Elements -> cartesian -> elements recovers every element within
        /// 1e-4 relative tolerance for elliptic orbits away from the
        /// singular (circular/equatorial) cases.
        #[test]
        fn prop_cartesian_roundtrip(
            a in 6.6e6..5.0e7f64,
            e in 0.01..0.9f64,
            i in 0.05..3.0f64,
            raan in 0.05..6.2f64,
            argp in 0.05..6.2f64,
            ea in 0.05..6.2f64,
        ) {
            let elements = OrbitalElements::new([a, e, i, raan, argp, ea], None);
            let (position, velocity) = elements.to_cartesian();
            let recovered = OrbitalElements::from_state_vectors(position, velocity);
            let expected = elements.as_array();
            let actual = recovered.as_array();
            for k in 0..6 {
                let scale = expected[k].abs().max(1e-9);
                prop_assert!(
                    (actual[k] - expected[k]).abs() / scale < 1e-4,
                    "element {k}: {} vs {}", actual[k], expected[k]
                );
            }
        }
    }
}
