//! The breakup pipeline: a fixed-order statistical generator with
//! mass-conservation fix-up.
//!
//! [`Breakup::run`] executes seven steps: init, fragment count,
//! characteristic length distribution, area-to-mass distribution, mass
//! conservation, parent assignment and ejection velocity distribution.
//! The distribution steps are data-parallel over rows; mass conservation
//! and parent assignment carry accumulators and stay sequential.

use nalgebra::Vector3;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::math::geometry::area_from_characteristic_length;
use crate::math::sampling::{uniform_to_power_law, unit_sphere_direction};
use crate::model::fragments::Fragments;
use crate::model::satellite::{SatKind, Satellite};
use crate::simulation::distributions::sample_area_to_mass_ratio;
use crate::simulation::rng::FragmentRng;

/// Standard deviation of the log10 ejection velocity distribution.
const DELTA_VELOCITY_SIGMA: f64 = 0.4;

/// The kind of breakup event, carrying kind-specific state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EventKind {
    /// A single parent disintegrates.
    Explosion,
    /// Two parents collide; `catastrophic` is decided during the fragment
    /// count step.
    Collision {
        /// Whether both parents fully fragment.
        catastrophic: bool,
    },
}

/// A breakup event simulation (explosion or collision).
#[derive(Debug)]
pub struct Breakup {
    /// The parent satellites: one (explosion) or two (collision).
    pub(crate) input: Vec<Satellite>,
    pub(crate) event: EventKind,

    /// Fragments are generated down to this characteristic length (m).
    pub(crate) minimal_characteristic_length: f64,
    /// Largest characteristic length, derived from the parents (m).
    pub(crate) maximal_characteristic_length: f64,
    /// Fragments receive ids greater than this value.
    current_max_id: u64,
    /// Selects the distribution family for the A/m values.
    pub(crate) sat_kind: SatKind,
    /// Mass sum of the parents (kg).
    pub(crate) input_mass: f64,
    /// Mass sum of the generated fragments (kg).
    pub(crate) output_mass: f64,
    /// Grow the output toward the mass budget when it falls short.
    enforce_mass_conservation: bool,

    /// Exponent of the characteristic length power law.
    lc_power_law_exponent: f64,
    /// `(factor, offset)` of the ejection velocity mean `mu = factor chi + offset`.
    delta_velocity_factor_offset: (f64, f64),

    pub(crate) rng: FragmentRng,
    /// Run the row-parallel steps on a single thread. Required (together
    /// with a fixed seed) for reproducible output.
    sequential: bool,

    pub(crate) output: Fragments,
}

impl Breakup {
    /// Create an explosion of a single parent.
    #[must_use]
    pub fn explosion(
        parent: Satellite,
        minimal_characteristic_length: f64,
        current_max_id: u64,
        enforce_mass_conservation: bool,
    ) -> Self {
        Self::new(
            vec![parent],
            EventKind::Explosion,
            minimal_characteristic_length,
            current_max_id,
            enforce_mass_conservation,
        )
    }

    /// Create a collision of two parents.
    ///
    /// There is no check that the two parents are actually at the same
    /// position.
    #[must_use]
    pub fn collision(
        parents: [Satellite; 2],
        minimal_characteristic_length: f64,
        current_max_id: u64,
        enforce_mass_conservation: bool,
    ) -> Self {
        Self::new(
            parents.into(),
            EventKind::Collision {
                catastrophic: false,
            },
            minimal_characteristic_length,
            current_max_id,
            enforce_mass_conservation,
        )
    }

    fn new(
        input: Vec<Satellite>,
        event: EventKind,
        minimal_characteristic_length: f64,
        current_max_id: u64,
        enforce_mass_conservation: bool,
    ) -> Self {
        Self {
            input,
            event,
            minimal_characteristic_length,
            maximal_characteristic_length: 0.0,
            current_max_id,
            sat_kind: SatKind::Spacecraft,
            input_mass: 0.0,
            output_mass: 0.0,
            enforce_mass_conservation,
            lc_power_law_exponent: 0.0,
            delta_velocity_factor_offset: (0.0, 0.0),
            rng: FragmentRng::from_entropy(),
            sequential: false,
            output: Fragments::default(),
        }
    }

    /// Use one synchronized generator with this seed for all samples, or
    /// reset to per-worker entropy generators with `None`.
    ///
    /// Reproducible output additionally requires [`Self::set_sequential`]:
    /// with parallel execution the workers race for the generator in
    /// nondeterministic order even under a fixed seed.
    pub fn set_seed(&mut self, seed: Option<u64>) -> &mut Self {
        self.rng = match seed {
            Some(seed) => FragmentRng::seeded(seed),
            None => FragmentRng::from_entropy(),
        };
        self
    }

    /// Toggle single-threaded execution of the row-parallel steps.
    pub fn set_sequential(&mut self, sequential: bool) -> &mut Self {
        self.sequential = sequential;
        self
    }

    /// Run the simulation. Afterwards the result is available through
    /// [`Self::result`] and [`Self::result_soa`].
    pub fn run(&mut self) {
        // 1. Prepare constants and accumulators.
        self.init();
        // 2. Generate the new fragments.
        self.calculate_fragment_count();
        // 3. Assign every fragment a characteristic length.
        self.characteristic_length_distribution();
        // 4. Assign A/m, area and mass values.
        self.area_to_mass_ratio_distribution();
        // 5. Enforce the mass conservation, removing or adding fragments.
        self.enforce_mass_conservation();
        // 6. Assign a parent and thereby a base velocity to each fragment.
        self.assign_parent_properties();
        // 7. Add the sampled ejection velocity.
        self.delta_velocity_distribution();
        // The ids [start+1, start+len] are now in use.
        self.current_max_id += self.output.len() as u64;
    }

    /// The parent satellites of this event.
    #[must_use]
    pub fn input(&self) -> &[Satellite] {
        &self.input
    }

    /// The generated fragments in row form.
    #[must_use]
    pub fn result(&self) -> Vec<Satellite> {
        self.output.to_satellites()
    }

    /// The generated fragments in columnar form.
    #[must_use]
    pub const fn result_soa(&self) -> &Fragments {
        &self.output
    }

    /// Minimal characteristic length of this simulation (m).
    #[must_use]
    pub const fn minimal_characteristic_length(&self) -> f64 {
        self.minimal_characteristic_length
    }

    /// Maximal characteristic length, valid after [`Self::run`] (m).
    #[must_use]
    pub const fn maximal_characteristic_length(&self) -> f64 {
        self.maximal_characteristic_length
    }

    /// The largest id in use; after [`Self::run`] this covers the fragments.
    #[must_use]
    pub const fn current_max_id(&self) -> u64 {
        self.current_max_id
    }

    /// Whether a collision was catastrophic. `None` for explosions or
    /// before [`Self::run`] decided the regime.
    #[must_use]
    pub const fn is_catastrophic(&self) -> Option<bool> {
        match self.event {
            EventKind::Explosion => None,
            EventKind::Collision { catastrophic } => Some(catastrophic),
        }
    }

    fn init(&mut self) {
        self.input_mass = 0.0;
        self.output_mass = 0.0;
        match self.event {
            EventKind::Explosion => {
                // The pdf for explosions is 0.0132578/x^2.6 (Eq. 2).
                self.lc_power_law_exponent = -2.6;
                // Equation 11: mu = 0.2 chi + 1.85
                self.delta_velocity_factor_offset = (0.2, 1.85);
            }
            EventKind::Collision { .. } => {
                // The pdf for collisions is 0.0101914/x^2.71 (Eq. 4).
                self.lc_power_law_exponent = -2.71;
                // Equation 12: mu = 0.9 chi + 2.9
                self.delta_velocity_factor_offset = (0.9, 2.9);
            }
        }
    }

    fn calculate_fragment_count(&mut self) {
        match self.event {
            EventKind::Explosion => self.explosion_fragment_count(),
            EventKind::Collision { .. } => self.collision_fragment_count(),
        }
    }

    /// Allocate the output batch with the computed count and the designated
    /// parent position.
    pub(crate) fn generate_fragments(&mut self, fragment_count: usize, position: Vector3<f64>) {
        self.output = Fragments::new(self.current_max_id, SatKind::Debris, position, fragment_count);
    }

    /// Sample one characteristic length from the bounded power law (Eq. 2/4).
    pub(crate) fn sample_characteristic_length(&self) -> f64 {
        uniform_to_power_law(
            self.minimal_characteristic_length,
            self.maximal_characteristic_length,
            self.lc_power_law_exponent,
            self.rng.uniform(),
        )
    }

    fn characteristic_length_distribution(&mut self) {
        let rng = &self.rng;
        let min = self.minimal_characteristic_length;
        let max = self.maximal_characteristic_length;
        let exponent = self.lc_power_law_exponent;
        let sample = |lc: &mut f64| {
            *lc = uniform_to_power_law(min, max, exponent, rng.uniform());
        };
        if self.sequential {
            self.output.characteristic_length.iter_mut().for_each(sample);
        } else {
            self.output
                .characteristic_length
                .par_iter_mut()
                .for_each(sample);
        }
    }

    fn area_to_mass_ratio_distribution(&mut self) {
        let rng = &self.rng;
        let kind = self.sat_kind;
        let output = &mut self.output;
        let sample = |((lc, ratio), (area, mass)): ((&mut f64, &mut f64), (&mut f64, &mut f64))| {
            *ratio = sample_area_to_mass_ratio(rng, kind, *lc);
            *area = area_from_characteristic_length(*lc);
            *mass = *area / *ratio;
        };
        if self.sequential {
            output
                .characteristic_length
                .iter_mut()
                .zip(output.area_to_mass_ratio.iter_mut())
                .zip(output.area.iter_mut().zip(output.mass.iter_mut()))
                .for_each(sample);
        } else {
            output
                .characteristic_length
                .par_iter_mut()
                .zip(output.area_to_mass_ratio.par_iter_mut())
                .zip(output.area.par_iter_mut().zip(output.mass.par_iter_mut()))
                .for_each(sample);
        }
    }

    fn enforce_mass_conservation(&mut self) {
        self.output_mass = self.output.mass.iter().sum();
        debug!(
            "the simulation got {} kg of input mass for fragments",
            self.input_mass
        );
        debug!("the simulation produced {} kg of debris", self.output_mass);

        let old_count = self.output.len();
        // Shrink from the tail while the output exceeds the mass budget.
        while self.output_mass > self.input_mass && !self.output.is_empty() {
            let last = self.output.len() - 1;
            self.output_mass -= self.output.mass[last];
            self.output.pop_back();
        }
        let truncated_count = self.output.len();

        // Grow toward the budget only if no excess had to be removed.
        if self.enforce_mass_conservation && truncated_count == old_count {
            self.add_further_fragments();
        }

        let new_count = self.output.len();
        if old_count != new_count {
            warn!("the simulation modified the number of fragments to enforce the mass conservation");
            warn!("the fragment count was adapted from {old_count} to {new_count} fragments");
            debug!("the simulation corrected to {} kg of debris", self.output_mass);
        }
    }

    fn add_further_fragments(&mut self) {
        match self.event {
            EventKind::Explosion | EventKind::Collision { catastrophic: true } => {
                self.append_fragments_to_budget();
            }
            EventKind::Collision {
                catastrophic: false,
            } => self.collision_prepend_remnant(),
        }
    }

    /// Append fragments sampled from the distributions until the budget is
    /// crossed, then drop the overshoot row.
    fn append_fragments_to_budget(&mut self) {
        while self.output_mass < self.input_mass {
            let lc = self.sample_characteristic_length();
            let ratio = sample_area_to_mass_ratio(&self.rng, self.sat_kind, lc);
            let area = area_from_characteristic_length(lc);
            let mass = area / ratio;

            let row = self.output.append_element();
            *row.characteristic_length = lc;
            *row.area_to_mass_ratio = ratio;
            *row.area = area;
            *row.mass = mass;
            self.output_mass += mass;
        }
        // Remove the element which led to exceeding the mass budget.
        if let Some(last) = self.output.mass.last() {
            self.output_mass -= *last;
        }
        self.output.pop_back();
    }

    fn assign_parent_properties(&mut self) {
        match self.event {
            EventKind::Explosion => self.explosion_assign_parents(),
            EventKind::Collision { .. } => self.collision_assign_parents(),
        }
    }

    fn delta_velocity_distribution(&mut self) {
        let rng = &self.rng;
        let (factor, offset) = self.delta_velocity_factor_offset;
        let output = &mut self.output;
        let sample = |(ratio, (velocity, ejection)): (
            &f64,
            (&mut Vector3<f64>, &mut Vector3<f64>),
        )| {
            // Equation 11/12: the magnitude is log-normal around
            // mu = factor chi + offset with chi = log10(A/m).
            let chi = ratio.log10();
            let mu = factor * chi + offset;
            let magnitude = 10f64.powf(rng.normal(mu, DELTA_VELOCITY_SIGMA));

            // Uniformly random direction on the unit sphere.
            let u = rng.uniform() * 2.0 - 1.0;
            let theta = rng.uniform() * 2.0 * std::f64::consts::PI;
            *ejection = unit_sphere_direction(u, theta) * magnitude;
            *velocity += *ejection;
        };
        if self.sequential {
            output
                .area_to_mass_ratio
                .iter()
                .zip(output.velocity.iter_mut().zip(output.ejection_velocity.iter_mut()))
                .for_each(sample);
        } else {
            output
                .area_to_mass_ratio
                .par_iter()
                .zip(
                    output
                        .velocity
                        .par_iter_mut()
                        .zip(output.ejection_velocity.par_iter_mut()),
                )
                .for_each(sample);
        }
    }
}
