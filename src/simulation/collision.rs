//! Collision specialization of the breakup pipeline.

use std::sync::Arc;

use crate::math::geometry::{
    area_from_characteristic_length, characteristic_length_from_mass,
};
use crate::model::satellite::SatKind;
use crate::simulation::distributions::sample_area_to_mass_ratio;
use crate::simulation::pipeline::{Breakup, EventKind};

/// Specific energy above which a collision is catastrophic (J/g).
const CATASTROPHIC_THRESHOLD: f64 = 40.0;

impl Breakup {
    /// Fragment count of a collision (Eq. 4).
    ///
    /// The parents are ordered so that the one with the larger
    /// characteristic length comes first; both the catastrophic regime and
    /// the reference mass `M` are decided here.
    pub(crate) fn collision_fragment_count(&mut self) {
        // The larger satellite (by characteristic length) is the target.
        if self.input[0].characteristic_length() < self.input[1].characteristic_length() {
            self.input.swap(0, 1);
        }

        self.maximal_characteristic_length = self.input[0]
            .characteristic_length()
            .max(self.input[1].characteristic_length());

        // A rocket body involved in the collision selects the rocket body
        // distribution family; the default stays spacecraft.
        if self.input[0].kind() == SatKind::RocketBody
            || self.input[1].kind() == SatKind::RocketBody
        {
            self.sat_kind = SatKind::RocketBody;
        }

        let target_mass = self.input[0].mass();
        let projectile_mass = self.input[1].mass();
        self.input_mass = target_mass + projectile_mass;

        // Relative collision velocity in m/s.
        let dv = (self.input[0].velocity() - self.input[1].velocity()).norm();

        // A collision is catastrophic above 40 J/g: both satellites fully
        // fragment. Below, only the smaller one does and the reference mass
        // is the projectile kinetic energy equivalent.
        let catastrophic_ratio = (projectile_mass * dv * dv) / (2.0 * target_mass * 1000.0);
        let catastrophic = catastrophic_ratio >= CATASTROPHIC_THRESHOLD;
        let reference_mass = if catastrophic {
            target_mass + projectile_mass
        } else if cfg!(feature = "legacy-noncatastrophic-mass") {
            // The 2001 paper: projectile mass times velocity in km/s.
            projectile_mass * dv / 1000.0
        } else {
            // The 2020 erratum: projectile kinetic energy equivalent.
            projectile_mass * dv * dv / 1.0e6
        };
        self.event = EventKind::Collision { catastrophic };

        let fragment_count = (0.1
            * reference_mass.powf(0.75)
            * self.minimal_characteristic_length.powf(-1.71)) as usize;
        let position = self.input[0].position();
        self.generate_fragments(fragment_count, position);
    }

    /// Prepend the remnant of a non-catastrophic collision.
    ///
    /// The larger parent does not fragment; the unassigned mass budget
    /// becomes a single remnant occupying row 0.
    pub(crate) fn collision_prepend_remnant(&mut self) {
        let remnant_mass = self.input_mass - self.output_mass;
        let lc = characteristic_length_from_mass(remnant_mass);
        let ratio = sample_area_to_mass_ratio(&self.rng, self.sat_kind, lc);
        let area = area_from_characteristic_length(lc);

        let row = self.output.prepend_element();
        *row.characteristic_length = lc;
        *row.area_to_mass_ratio = ratio;
        *row.area = area;
        *row.mass = remnant_mass;
        self.output_mass = self.input_mass;
    }

    /// Assign each fragment a parent and thereby its base velocity.
    ///
    /// Fragments larger than the smaller parent can only originate from the
    /// larger one. The rest is split so that the larger parent contributes
    /// its share of the realized output mass. Both passes carry the mass
    /// accumulator and run single-threaded.
    pub(crate) fn collision_assign_parents(&mut self) {
        let big = &self.input[0];
        let small = &self.input[1];
        let big_name: Arc<str> = Arc::from(format!("{}-Collision-Fragment", big.name()));
        let small_name: Arc<str> = Arc::from(format!("{}-Collision-Fragment", small.name()));
        let big_velocity = big.velocity();
        let small_velocity = small.velocity();
        let small_lc = small.characteristic_length();

        // The mass of the larger parent normed to the realized output mass.
        let normed_big_mass = big.mass() * self.output_mass / self.input_mass;

        let mut assigned_to_big = 0.0;
        for row in 0..self.output.len() {
            if self.output.characteristic_length[row] > small_lc {
                self.output.name[row] = Some(Arc::clone(&big_name));
                self.output.velocity[row] = big_velocity;
                assigned_to_big += self.output.mass[row];
            }
        }
        for row in 0..self.output.len() {
            if self.output.characteristic_length[row] <= small_lc {
                if assigned_to_big < normed_big_mass {
                    self.output.name[row] = Some(Arc::clone(&big_name));
                    self.output.velocity[row] = big_velocity;
                    assigned_to_big += self.output.mass[row];
                } else {
                    self.output.name[row] = Some(Arc::clone(&small_name));
                    self.output.velocity[row] = small_velocity;
                }
            }
        }
    }
}
