//! The breakup simulation: pipeline skeleton, the explosion and collision
//! specializations, the fragment distributions and the simulation builder.

pub mod builder;
mod collision;
pub mod distributions;
mod explosion;
pub mod pipeline;
pub mod rng;

pub use builder::{BreakupBuilder, SimulationKind};
pub use pipeline::Breakup;
pub use rng::FragmentRng;
