//! Builder that turns a configuration and a satellite list into the right
//! breakup specialization.
//!
//! Applies the id filter, derives the maximal given id and validates the
//! input cardinality against the declared simulation kind.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{BreakupError, BreakupResult};
use crate::model::satellite::Satellite;
use crate::simulation::pipeline::Breakup;

/// The declared kind of simulation from the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SimulationKind {
    /// One parent disintegrates.
    Explosion,
    /// Two parents collide.
    Collision,
    /// Derive the kind from the input cardinality, with a warning.
    #[default]
    Unknown,
}

impl std::fmt::Display for SimulationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = match self {
            Self::Explosion => "EXPLOSION",
            Self::Collision => "COLLISION",
            Self::Unknown => "UNKNOWN",
        };
        write!(f, "{token}")
    }
}

/// Assembles a [`Breakup`] from configuration facts and the input satellites.
#[derive(Debug, Default)]
pub struct BreakupBuilder {
    minimal_characteristic_length: f64,
    simulation_kind: SimulationKind,
    current_max_id: Option<u64>,
    id_filter: Option<HashSet<u64>>,
    enforce_mass_conservation: bool,
    satellites: Vec<Satellite>,
}

impl BreakupBuilder {
    /// Create a builder with the required minimal characteristic length.
    #[must_use]
    pub fn new(minimal_characteristic_length: f64) -> Self {
        Self {
            minimal_characteristic_length,
            ..Self::default()
        }
    }

    /// Set the declared simulation kind (default: derive from cardinality).
    #[must_use]
    pub fn simulation_kind(mut self, kind: SimulationKind) -> Self {
        self.simulation_kind = kind;
        self
    }

    /// Fix the largest id currently in use instead of deriving it.
    #[must_use]
    pub fn current_max_id(mut self, current_max_id: Option<u64>) -> Self {
        self.current_max_id = current_max_id;
        self
    }

    /// Keep only the satellites whose id is contained in the filter.
    #[must_use]
    pub fn id_filter(mut self, id_filter: Option<HashSet<u64>>) -> Self {
        self.id_filter = id_filter;
        self
    }

    /// Grow the output toward the mass budget when it falls short.
    #[must_use]
    pub const fn enforce_mass_conservation(mut self, enforce: bool) -> Self {
        self.enforce_mass_conservation = enforce;
        self
    }

    /// Set the input satellites.
    #[must_use]
    pub fn satellites(mut self, satellites: Vec<Satellite>) -> Self {
        self.satellites = satellites;
        self
    }

    /// Build the breakup simulation matching kind and input cardinality.
    ///
    /// # Errors
    ///
    /// [`BreakupError::InputCardinality`] if the filtered satellite count
    /// does not fit the declared kind (explosion: 1, collision: 2, unknown:
    /// 1 or 2).
    pub fn build(&self) -> BreakupResult<Breakup> {
        // The max id considers all available satellites, not only the
        // filtered ones.
        let max_id = self.derive_maximal_id();
        let mut filtered = self.apply_filter();

        let actual = filtered.len();
        let cardinality_error = |expected| BreakupError::InputCardinality {
            simulation_type: self.simulation_kind.to_string(),
            expected,
            actual,
        };

        match (self.simulation_kind, filtered.len()) {
            (SimulationKind::Explosion, 1) => Ok(self.explosion(&mut filtered, max_id)),
            (SimulationKind::Explosion, _) => Err(cardinality_error("1")),
            (SimulationKind::Collision, 2) => Ok(self.collision(&mut filtered, max_id)),
            (SimulationKind::Collision, _) => Err(cardinality_error("2")),
            (SimulationKind::Unknown, 1) => {
                warn!("simulation type was not specified, derived 'Explosion' from 1 satellite");
                Ok(self.explosion(&mut filtered, max_id))
            }
            (SimulationKind::Unknown, 2) => {
                warn!("simulation type was not specified, derived 'Collision' from 2 satellites");
                Ok(self.collision(&mut filtered, max_id))
            }
            (SimulationKind::Unknown, _) => Err(cardinality_error("1 or 2")),
        }
    }

    fn explosion(&self, filtered: &mut Vec<Satellite>, max_id: u64) -> Breakup {
        Breakup::explosion(
            filtered.swap_remove(0),
            self.minimal_characteristic_length,
            max_id,
            self.enforce_mass_conservation,
        )
    }

    fn collision(&self, filtered: &mut Vec<Satellite>, max_id: u64) -> Breakup {
        let second = filtered.swap_remove(1);
        let first = filtered.swap_remove(0);
        Breakup::collision(
            [first, second],
            self.minimal_characteristic_length,
            max_id,
            self.enforce_mass_conservation,
        )
    }

    fn apply_filter(&self) -> Vec<Satellite> {
        match &self.id_filter {
            Some(filter) => self
                .satellites
                .iter()
                .filter(|satellite| filter.contains(&satellite.id()))
                .cloned()
                .collect(),
            None => self.satellites.clone(),
        }
    }

    fn derive_maximal_id(&self) -> u64 {
        self.current_max_id.unwrap_or_else(|| {
            self.satellites
                .iter()
                .map(Satellite::id)
                .max()
                .unwrap_or(0)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::builder::SatelliteBuilder;
    use nalgebra::Vector3;

    fn satellite(id: u64) -> Satellite {
        let mut builder = SatelliteBuilder::new();
        let result = builder
            .id(id)
            .mass(100.0)
            .velocity(Vector3::zeros())
            .build();
        assert!(result.is_ok());
        result.unwrap_or_else(|_| Satellite::with_id(id))
    }

    #[test]
    fn test_explosion_with_one_satellite() {
        let result = BreakupBuilder::new(0.05)
            .simulation_kind(SimulationKind::Explosion)
            .satellites(vec![satellite(1)])
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_explosion_with_two_satellites_fails() {
        let result = BreakupBuilder::new(0.05)
            .simulation_kind(SimulationKind::Explosion)
            .satellites(vec![satellite(1), satellite(2)])
            .build();
        assert!(matches!(
            result,
            Err(BreakupError::InputCardinality { actual: 2, .. })
        ));
    }

    #[test]
    fn test_collision_with_two_satellites() {
        let result = BreakupBuilder::new(0.05)
            .simulation_kind(SimulationKind::Collision)
            .satellites(vec![satellite(1), satellite(2)])
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_collision_with_one_satellite_fails() {
        let result = BreakupBuilder::new(0.05)
            .simulation_kind(SimulationKind::Collision)
            .satellites(vec![satellite(1)])
            .build();
        assert!(matches!(
            result,
            Err(BreakupError::InputCardinality { actual: 1, .. })
        ));
    }

    #[test]
    fn test_unknown_derives_explosion_from_one() {
        let result = BreakupBuilder::new(0.05)
            .satellites(vec![satellite(1)])
            .build();
        assert!(matches!(result, Ok(b) if b.is_catastrophic().is_none()));
    }

    #[test]
    fn test_unknown_derives_collision_from_two() {
        let result = BreakupBuilder::new(0.05)
            .satellites(vec![satellite(1), satellite(2)])
            .build();
        assert!(matches!(result, Ok(b) if b.is_catastrophic().is_some()));
    }

    #[test]
    fn test_unknown_with_three_fails() {
        let result = BreakupBuilder::new(0.05)
            .satellites(vec![satellite(1), satellite(2), satellite(3)])
            .build();
        assert!(matches!(
            result,
            Err(BreakupError::InputCardinality {
                expected: "1 or 2",
                ..
            })
        ));
    }

    #[test]
    fn test_filter_keeps_only_listed_ids() {
        let filter: HashSet<u64> = [2, 3].into_iter().collect();
        let result = BreakupBuilder::new(0.05)
            .simulation_kind(SimulationKind::Collision)
            .id_filter(Some(filter))
            .satellites(vec![satellite(1), satellite(2), satellite(3)])
            .build();
        assert!(result.is_ok());
        if let Ok(breakup) = result {
            let ids: Vec<u64> = breakup.input().iter().map(Satellite::id).collect();
            assert_eq!(ids, vec![2, 3]);
        }
    }

    #[test]
    fn test_max_id_derived_from_all_satellites_not_filter() {
        let filter: HashSet<u64> = [1].into_iter().collect();
        let result = BreakupBuilder::new(0.05)
            .simulation_kind(SimulationKind::Explosion)
            .id_filter(Some(filter))
            .satellites(vec![satellite(1), satellite(900)])
            .build();
        assert!(matches!(result, Ok(b) if b.current_max_id() == 900));
    }

    #[test]
    fn test_explicit_max_id_wins() {
        let result = BreakupBuilder::new(0.05)
            .simulation_kind(SimulationKind::Explosion)
            .current_max_id(Some(5000))
            .satellites(vec![satellite(1)])
            .build();
        assert!(matches!(result, Ok(b) if b.current_max_id() == 5000));
    }

    #[test]
    fn test_max_id_zero_for_empty_input() {
        let builder = BreakupBuilder::new(0.05);
        assert_eq!(builder.derive_maximal_id(), 0);
    }
}
