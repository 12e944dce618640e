//! Explosion specialization of the breakup pipeline.

use std::sync::Arc;

use crate::simulation::pipeline::Breakup;

impl Breakup {
    /// Fragment count of an explosion (Eq. 2): `6 L_min^-1.6` fragments,
    /// all parented by the single input satellite.
    pub(crate) fn explosion_fragment_count(&mut self) {
        let parent = &self.input[0];

        self.maximal_characteristic_length = parent.characteristic_length();
        // The A/m distribution family follows the exploding object.
        self.sat_kind = parent.kind();
        self.input_mass = parent.mass();

        let fragment_count = (6.0 * self.minimal_characteristic_length.powf(-1.6)) as usize;
        let position = parent.position();
        self.generate_fragments(fragment_count, position);
    }

    /// Every fragment inherits the parent velocity and the parent-derived
    /// name.
    pub(crate) fn explosion_assign_parents(&mut self) {
        let parent = &self.input[0];
        let name: Arc<str> = Arc::from(format!("{}-Explosion-Fragment", parent.name()));
        let velocity = parent.velocity();

        for row in 0..self.output.len() {
            self.output.velocity[row] = velocity;
            self.output.name[row] = Some(Arc::clone(&name));
        }
    }
}
