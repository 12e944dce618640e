//! # breakup
//!
//! Stochastic satellite fragmentation simulator implementing the NASA
//! Standard Breakup Model (Johnson et al., 2001, with the 2020 erratum).
//!
//! Given one (explosion) or two (collision) orbiting parent objects, the
//! simulation synthesizes a population of debris fragments, each with a
//! characteristic length, an area, an area-to-mass ratio, a mass, a
//! position inherited from a parent and a velocity equal to the parent
//! base velocity plus a sampled ejection velocity.
//!
//! ## Example
//!
//! ```rust
//! use breakup::prelude::*;
//! use nalgebra::Vector3;
//!
//! let mut builder = SatelliteBuilder::new();
//! let parent = builder
//!     .id(25544)
//!     .name("Nimbus 6 R/B")
//!     .kind(SatKind::RocketBody)
//!     .mass(839.0)
//!     .velocity(Vector3::new(7500.0, 0.0, 0.0))
//!     .build()
//!     .expect("complete satellite");
//!
//! let mut explosion = Breakup::explosion(parent, 0.05, 25544, false);
//! explosion.set_seed(Some(1234)).set_sequential(true);
//! explosion.run();
//! assert!(!explosion.result_soa().is_empty());
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::many_single_char_names, // Standard orbital mechanics notation
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops,  // Numerical code mirrors the published equations
    clippy::imprecise_flops,
    clippy::missing_const_for_fn,
    clippy::needless_range_loop, // Index loops over SoA columns are clearer
    clippy::float_cmp // Tests compare exact propagated values
)]

pub mod config;
pub mod error;
pub mod input;
pub mod math;
pub mod model;
pub mod output;
pub mod simulation;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::BreakupConfig;
    pub use crate::error::{BreakupError, BreakupResult};
    pub use crate::model::builder::SatelliteBuilder;
    pub use crate::model::fragments::Fragments;
    pub use crate::model::orbital_elements::{AngularUnit, AnomalyKind, Epoch, OrbitalElements};
    pub use crate::model::satellite::{SatKind, Satellite};
    pub use crate::simulation::builder::{BreakupBuilder, SimulationKind};
    pub use crate::simulation::pipeline::Breakup;
}

pub use error::{BreakupError, BreakupResult};
