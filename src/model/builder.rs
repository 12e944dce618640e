//! Validating stepwise constructor for [`Satellite`].
//!
//! There are multiple ways to assemble a valid simulation input; instead of
//! one constructor per combination, facts are accumulated and checked on
//! finalization. Required: an id, mass *or* area, and a velocity *or* a full
//! set of orbital elements. Position is optional (fragments inherit it).

use nalgebra::Vector3;
use tracing::debug;

use crate::error::{BreakupError, BreakupResult};
use crate::math::geometry::{
    characteristic_length_from_area, characteristic_length_from_mass, circle_area, sphere_mass,
};
use crate::model::orbital_elements::OrbitalElements;
use crate::model::satellite::{SatKind, Satellite};

/// Builder accumulating satellite facts, validated by [`SatelliteBuilder::build`].
#[derive(Debug, Default)]
pub struct SatelliteBuilder {
    satellite: Option<Satellite>,
    has_id: bool,
    has_mass: bool,
    has_velocity: bool,
    has_position: bool,
}

impl SatelliteBuilder {
    /// Create a fresh builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn satellite_mut(&mut self) -> &mut Satellite {
        self.satellite.get_or_insert_with(|| Satellite::with_id(0))
    }

    /// Reset the builder to its initial state.
    pub fn reset(&mut self) -> &mut Self {
        *self = Self::default();
        self
    }

    /// Set the unique id, e.g. the NORAD catalog number.
    pub fn id(&mut self, id: u64) -> &mut Self {
        self.satellite_mut().set_id(id);
        self.has_id = true;
        self
    }

    /// Set the optional name.
    pub fn name(&mut self, name: impl Into<std::sync::Arc<str>>) -> &mut Self {
        self.satellite_mut().set_name(name);
        self
    }

    /// Set the satellite type; defaults to [`SatKind::Spacecraft`].
    pub fn kind(&mut self, kind: SatKind) -> &mut Self {
        self.satellite_mut().set_kind(kind);
        self
    }

    /// Parse and set the satellite type from a catalog token.
    ///
    /// # Errors
    ///
    /// [`BreakupError::Parse`] for an unknown token.
    pub fn kind_from_token(&mut self, token: &str) -> BreakupResult<&mut Self> {
        let kind = token.parse()?;
        Ok(self.kind(kind))
    }

    /// Set the mass and derive characteristic length, area and A/m treating
    /// the object as a sphere of the Eq. 1 density.
    ///
    /// Overrides previous attempts of setting the mass.
    pub fn mass(&mut self, mass: f64) -> &mut Self {
        let characteristic_length = characteristic_length_from_mass(mass);
        let area = circle_area(characteristic_length);
        let satellite = self.satellite_mut();
        satellite.set_mass(mass);
        satellite.set_area(area);
        satellite.set_area_to_mass_ratio(area / mass);
        satellite.set_characteristic_length(characteristic_length);
        self.has_mass = true;
        self
    }

    /// Set the area (radar cross section) and derive the characteristic
    /// length from the circle assumption plus the mass from the Eq. 1
    /// density sphere.
    ///
    /// Overrides previous attempts of setting the mass.
    pub fn mass_from_area(&mut self, area: f64) -> &mut Self {
        let characteristic_length = characteristic_length_from_area(area);
        let mass = sphere_mass(characteristic_length);
        let satellite = self.satellite_mut();
        satellite.set_mass(mass);
        satellite.set_area(area);
        satellite.set_area_to_mass_ratio(area / mass);
        satellite.set_characteristic_length(characteristic_length);
        self.has_mass = true;
        self
    }

    /// Set the cartesian velocity (m/s).
    ///
    /// Overrides a velocity previously derived from orbital elements.
    pub fn velocity(&mut self, velocity: Vector3<f64>) -> &mut Self {
        self.satellite_mut().set_velocity(velocity);
        self.has_velocity = true;
        self
    }

    /// Set the cartesian position (m).
    pub fn position(&mut self, position: Vector3<f64>) -> &mut Self {
        self.satellite_mut().set_position(position);
        self.has_position = true;
        self
    }

    /// Derive position and velocity from Keplerian elements.
    ///
    /// Overrides previously set cartesian vectors.
    pub fn orbital_elements(&mut self, orbital_elements: OrbitalElements) -> &mut Self {
        self.satellite_mut()
            .set_cartesian_from_orbital_elements(orbital_elements);
        self.has_velocity = true;
        self.has_position = true;
        self
    }

    /// Finalize and validate the satellite.
    ///
    /// # Errors
    ///
    /// [`BreakupError::IncompleteSatellite`] naming the missing attribute if
    /// the id, the mass (or area) or the velocity (or orbital elements) was
    /// never provided.
    pub fn build(&mut self) -> BreakupResult<Satellite> {
        let missing = if !self.has_id {
            Some("valid ID")
        } else if !self.has_mass {
            Some("mass")
        } else if !self.has_velocity {
            Some("velocity")
        } else {
            None
        };
        if let Some(missing) = missing {
            let satellite = self
                .satellite
                .as_ref()
                .map_or_else(|| Satellite::with_id(0).to_string(), ToString::to_string);
            return Err(BreakupError::IncompleteSatellite { satellite, missing });
        }
        let satellite = self.satellite.take().unwrap_or_else(|| Satellite::with_id(0));
        if !self.has_position {
            debug!("{satellite} has no position, this is not a problem");
        }
        self.reset();
        Ok(satellite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_mass_derives_geometry() {
        let mut builder = SatelliteBuilder::new();
        let result = builder
            .id(25544)
            .name("ISS")
            .mass(420_000.0)
            .velocity(Vector3::new(7660.0, 0.0, 0.0))
            .build();
        assert!(result.is_ok());
        if let Ok(sat) = result {
            let lc = sat.characteristic_length();
            assert!(lc > 0.0);
            assert_relative_eq!(sat.area(), PI * (lc / 2.0) * (lc / 2.0), max_relative = 1e-12);
            assert_relative_eq!(
                sat.area_to_mass_ratio(),
                sat.area() / sat.mass(),
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn test_area_derives_mass() {
        let mut builder = SatelliteBuilder::new();
        let result = builder
            .id(1)
            .mass_from_area(3.5)
            .velocity(Vector3::zeros())
            .build();
        assert!(result.is_ok());
        if let Ok(sat) = result {
            assert_relative_eq!(sat.area(), 3.5);
            assert_relative_eq!(
                sat.characteristic_length(),
                2.0 * (3.5_f64 / PI).sqrt(),
                max_relative = 1e-12
            );
            assert!(sat.mass() > 0.0);
            assert_relative_eq!(
                sat.area_to_mass_ratio(),
                sat.area() / sat.mass(),
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn test_missing_id_fails() {
        let mut builder = SatelliteBuilder::new();
        let result = builder.mass(100.0).velocity(Vector3::zeros()).build();
        assert!(
            matches!(result, Err(BreakupError::IncompleteSatellite { missing, .. }) if missing == "valid ID")
        );
    }

    #[test]
    fn test_missing_mass_fails() {
        let mut builder = SatelliteBuilder::new();
        let result = builder.id(1).velocity(Vector3::zeros()).build();
        assert!(
            matches!(result, Err(BreakupError::IncompleteSatellite { missing, .. }) if missing == "mass")
        );
    }

    #[test]
    fn test_missing_velocity_fails() {
        let mut builder = SatelliteBuilder::new();
        let result = builder.id(1).mass(100.0).build();
        assert!(
            matches!(result, Err(BreakupError::IncompleteSatellite { missing, .. }) if missing == "velocity")
        );
    }

    #[test]
    fn test_orbital_elements_satisfy_velocity_and_position() {
        let elements = OrbitalElements::new([6.8e6, 0.1, 0.7, 1.9, 0.8, 0.4], None);
        let mut builder = SatelliteBuilder::new();
        let result = builder.id(1).mass(100.0).orbital_elements(elements).build();
        assert!(result.is_ok());
        if let Ok(sat) = result {
            assert!(sat.velocity().norm() > 0.0);
            assert!(sat.position().norm() > 0.0);
            assert!(sat.has_cached_orbital_elements());
        }
    }

    #[test]
    fn test_kind_from_token() {
        let mut builder = SatelliteBuilder::new();
        assert!(builder.kind_from_token("R/B").is_ok());
        let result = builder.id(1).mass(1.0).velocity(Vector3::zeros()).build();
        assert!(matches!(result, Ok(sat) if sat.kind() == SatKind::RocketBody));

        assert!(SatelliteBuilder::new().kind_from_token("NOPE").is_err());
    }

    #[test]
    fn test_builder_resets_after_build() {
        let mut builder = SatelliteBuilder::new();
        let first = builder.id(1).mass(1.0).velocity(Vector3::zeros()).build();
        assert!(first.is_ok());
        // The second build starts from scratch and must fail on the id.
        let second = builder.build();
        assert!(matches!(
            second,
            Err(BreakupError::IncompleteSatellite { missing: "valid ID", .. })
        ));
    }
}
