//! The satellite entity: one parent or fragment of a breakup event.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::BreakupError;
use crate::model::orbital_elements::OrbitalElements;

/// Type of a satellite, derived from the NORAD catalog types.
///
/// Spacecraft and rocket bodies select different area-to-mass equations in
/// the breakup simulation; debris and unknown objects currently have no
/// special effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SatKind {
    /// A payload, e.g. an active satellite.
    #[default]
    Spacecraft,
    /// An upper stage or booster.
    RocketBody,
    /// A debris fragment.
    Debris,
    /// Catalog entries of unknown type.
    Unknown,
}

impl FromStr for SatKind {
    type Err = BreakupError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "SPACECRAFT" | "SC" | "PAY" => Ok(Self::Spacecraft),
            "ROCKET_BODY" | "RB" | "R/B" => Ok(Self::RocketBody),
            "DEBRIS" | "DEB" => Ok(Self::Debris),
            "UNKNOWN" | "UNK" => Ok(Self::Unknown),
            _ => Err(BreakupError::parse(format!(
                "satellite type could not be parsed from string: \"{token}\""
            ))),
        }
    }
}

impl fmt::Display for SatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            Self::Spacecraft => "SPACECRAFT",
            Self::RocketBody => "ROCKET_BODY",
            Self::Debris => "DEBRIS",
            Self::Unknown => "UNKNOWN",
        };
        write!(f, "{token}")
    }
}

/// An object in orbit: either a breakup parent or a generated fragment.
///
/// Position and the cached orbital elements always represent the same state;
/// mutating either cartesian vector invalidates the cache.
#[derive(Debug, Clone)]
pub struct Satellite {
    /// Unique NORAD-like catalog id.
    id: u64,
    /// Human readable name, shared between fragments of one parent.
    name: Option<Arc<str>>,
    /// Type of the satellite.
    kind: SatKind,
    /// Characteristic length L_c (m).
    characteristic_length: f64,
    /// Area-to-mass ratio A/m (m²/kg).
    area_to_mass_ratio: f64,
    /// Mass (kg).
    mass: f64,
    /// Area respectively radar cross section (m²).
    area: f64,
    /// Cartesian velocity (m/s); for fragments the sum of the parent base
    /// velocity and the ejection velocity.
    velocity: Vector3<f64>,
    /// Relative cartesian ejection velocity (m/s), fragments only.
    ejection_velocity: Vector3<f64>,
    /// Cartesian position (m).
    position: Vector3<f64>,
    /// Cache of the orbital-element view of position and velocity.
    orbital_elements_cache: Option<OrbitalElements>,
}

impl Satellite {
    /// Create an empty satellite with the given id.
    #[must_use]
    pub fn with_id(id: u64) -> Self {
        Self {
            id,
            name: None,
            kind: SatKind::default(),
            characteristic_length: 0.0,
            area_to_mass_ratio: 0.0,
            mass: 0.0,
            area: 0.0,
            velocity: Vector3::zeros(),
            ejection_velocity: Vector3::zeros(),
            position: Vector3::zeros(),
            orbital_elements_cache: None,
        }
    }

    /// Create a fully populated satellite (the AoS view of one fragment row).
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn from_parts(
        id: u64,
        name: Option<Arc<str>>,
        kind: SatKind,
        characteristic_length: f64,
        area_to_mass_ratio: f64,
        mass: f64,
        area: f64,
        velocity: Vector3<f64>,
        ejection_velocity: Vector3<f64>,
        position: Vector3<f64>,
    ) -> Self {
        Self {
            id,
            name,
            kind,
            characteristic_length,
            area_to_mass_ratio,
            mass,
            area,
            velocity,
            ejection_velocity,
            position,
            orbital_elements_cache: None,
        }
    }

    /// Catalog id.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Set the catalog id.
    pub fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    /// Name, or the empty string if none was given.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Shared name pointer, if any.
    #[must_use]
    pub const fn name_shared(&self) -> Option<&Arc<str>> {
        self.name.as_ref()
    }

    /// Set the name.
    pub fn set_name(&mut self, name: impl Into<Arc<str>>) {
        self.name = Some(name.into());
    }

    /// Type of the satellite.
    #[must_use]
    pub const fn kind(&self) -> SatKind {
        self.kind
    }

    /// Set the type.
    pub fn set_kind(&mut self, kind: SatKind) {
        self.kind = kind;
    }

    /// Characteristic length (m).
    #[must_use]
    pub const fn characteristic_length(&self) -> f64 {
        self.characteristic_length
    }

    /// Set the characteristic length (m).
    pub fn set_characteristic_length(&mut self, characteristic_length: f64) {
        self.characteristic_length = characteristic_length;
    }

    /// Area-to-mass ratio (m²/kg).
    #[must_use]
    pub const fn area_to_mass_ratio(&self) -> f64 {
        self.area_to_mass_ratio
    }

    /// Set the area-to-mass ratio (m²/kg).
    pub fn set_area_to_mass_ratio(&mut self, area_to_mass_ratio: f64) {
        self.area_to_mass_ratio = area_to_mass_ratio;
    }

    /// Mass (kg).
    #[must_use]
    pub const fn mass(&self) -> f64 {
        self.mass
    }

    /// Set the mass (kg).
    pub fn set_mass(&mut self, mass: f64) {
        self.mass = mass;
    }

    /// Area (m²).
    #[must_use]
    pub const fn area(&self) -> f64 {
        self.area
    }

    /// Set the area (m²).
    pub fn set_area(&mut self, area: f64) {
        self.area = area;
    }

    /// Cartesian velocity (m/s).
    #[must_use]
    pub const fn velocity(&self) -> Vector3<f64> {
        self.velocity
    }

    /// Set the velocity. Invalidates the orbital-elements cache.
    pub fn set_velocity(&mut self, velocity: Vector3<f64>) {
        self.orbital_elements_cache = None;
        self.velocity = velocity;
    }

    /// Cartesian ejection velocity (m/s).
    #[must_use]
    pub const fn ejection_velocity(&self) -> Vector3<f64> {
        self.ejection_velocity
    }

    /// Set the ejection velocity.
    ///
    /// The ejection velocity is a property of the breakup and not part of
    /// the orbital state, so the cache stays valid.
    pub fn set_ejection_velocity(&mut self, ejection_velocity: Vector3<f64>) {
        self.ejection_velocity = ejection_velocity;
    }

    /// Cartesian position (m).
    #[must_use]
    pub const fn position(&self) -> Vector3<f64> {
        self.position
    }

    /// Set the position. Invalidates the orbital-elements cache.
    pub fn set_position(&mut self, position: Vector3<f64>) {
        self.orbital_elements_cache = None;
        self.position = position;
    }

    /// Derive position and velocity from the given Keplerian elements and
    /// store them as the new orbital-elements cache.
    pub fn set_cartesian_from_orbital_elements(&mut self, orbital_elements: OrbitalElements) {
        let (position, velocity) = orbital_elements.to_cartesian();
        self.position = position;
        self.velocity = velocity;
        self.orbital_elements_cache = Some(orbital_elements);
    }

    /// The orbital-element view of the current position and velocity.
    ///
    /// Returns the cached value when valid, otherwise computes it from the
    /// state vectors. The cache is refreshed only through
    /// [`Self::set_cartesian_from_orbital_elements`]; the entity is
    /// sole-owner, so no interior mutability is involved.
    #[must_use]
    pub fn orbital_elements(&self) -> OrbitalElements {
        match self.orbital_elements_cache {
            Some(elements) => elements,
            None => OrbitalElements::from_state_vectors(self.position, self.velocity),
        }
    }

    /// Whether the orbital-element cache currently holds a value.
    #[must_use]
    pub const fn has_cached_orbital_elements(&self) -> bool {
        self.orbital_elements_cache.is_some()
    }
}

/// Satellites are compared by id.
impl PartialEq for Satellite {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Satellite {}

impl fmt::Display for Satellite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Satellite{{id: {} name: {} type: {} L_c: {} velocity: [{} {} {}] position: [{} {} {}]}}",
            self.id,
            self.name(),
            self.kind,
            self.characteristic_length,
            self.velocity.x,
            self.velocity.y,
            self.velocity.z,
            self.position.x,
            self.position.y,
            self.position.z,
        )
    }
}
