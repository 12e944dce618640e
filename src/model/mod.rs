//! Data model: orbital elements, the satellite entity, its validating
//! builder and the columnar fragment batch.

pub mod builder;
pub mod fragments;
pub mod orbital_elements;
pub mod satellite;

pub use builder::SatelliteBuilder;
pub use fragments::Fragments;
pub use orbital_elements::{AngularUnit, AnomalyKind, Epoch, OrbitalElements};
pub use satellite::{SatKind, Satellite};
