//! Structure-of-Arrays storage for the fragments of one breakup event.
//!
//! The columnar layout vectorizes the distribution steps and shares the
//! parent-derived fields (start id, type, position) across all rows instead
//! of copying them per fragment.

use std::sync::Arc;

use nalgebra::Vector3;

use crate::model::satellite::{SatKind, Satellite};

/// Writable view of the geometric columns of one row, as handed out by
/// [`Fragments::append_element`] and [`Fragments::prepend_element`].
#[derive(Debug)]
pub struct GeometryRowMut<'a> {
    /// Characteristic length (m).
    pub characteristic_length: &'a mut f64,
    /// Area-to-mass ratio (m²/kg).
    pub area_to_mass_ratio: &'a mut f64,
    /// Area (m²).
    pub area: &'a mut f64,
    /// Mass (kg).
    pub mass: &'a mut f64,
}

/// The fragments of one breakup in columnar (SoA) form.
///
/// Every per-row vector has the same length at all times.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragments {
    /// Largest id already in use; row `k` becomes `start_id + k + 1`.
    pub start_id: u64,
    /// The type shared by all fragments (always debris for a breakup).
    pub kind: SatKind,
    /// The position inherited from the designated parent (m).
    pub position: Vector3<f64>,

    /// Shared name pointer of each fragment.
    pub name: Vec<Option<Arc<str>>>,
    /// Characteristic length of each fragment (m).
    pub characteristic_length: Vec<f64>,
    /// Area-to-mass ratio of each fragment (m²/kg).
    pub area_to_mass_ratio: Vec<f64>,
    /// Mass of each fragment (kg).
    pub mass: Vec<f64>,
    /// Area of each fragment (m²).
    pub area: Vec<f64>,
    /// Ejection velocity of each fragment (m/s).
    pub ejection_velocity: Vec<Vector3<f64>>,
    /// Total velocity of each fragment: parent base plus ejection (m/s).
    pub velocity: Vec<Vector3<f64>>,
}

impl Default for Fragments {
    fn default() -> Self {
        Self {
            start_id: 0,
            kind: SatKind::Debris,
            position: Vector3::zeros(),
            name: Vec::new(),
            characteristic_length: Vec::new(),
            area_to_mass_ratio: Vec::new(),
            mass: Vec::new(),
            area: Vec::new(),
            ejection_velocity: Vec::new(),
            velocity: Vec::new(),
        }
    }
}

impl Fragments {
    /// Create a batch of `size` zeroed fragments sharing the given id base,
    /// type and parent position.
    #[must_use]
    pub fn new(start_id: u64, kind: SatKind, position: Vector3<f64>, size: usize) -> Self {
        let mut fragments = Self {
            start_id,
            kind,
            position,
            ..Self::default()
        };
        fragments.resize(size);
        fragments
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.characteristic_length.len()
    }

    /// Whether the batch holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.characteristic_length.is_empty()
    }

    /// Resize every column jointly to `new_len`.
    pub fn resize(&mut self, new_len: usize) {
        self.name.resize(new_len, None);
        self.characteristic_length.resize(new_len, 0.0);
        self.area_to_mass_ratio.resize(new_len, 0.0);
        self.mass.resize(new_len, 0.0);
        self.area.resize(new_len, 0.0);
        self.ejection_velocity.resize(new_len, Vector3::zeros());
        self.velocity.resize(new_len, Vector3::zeros());
    }

    /// Drop the last row of every column.
    pub fn pop_back(&mut self) {
        let new_len = self.len().saturating_sub(1);
        self.resize(new_len);
    }

    /// Grow by one row and return writable references to the geometric
    /// columns of the new row.
    pub fn append_element(&mut self) -> GeometryRowMut<'_> {
        let index = self.len();
        self.resize(index + 1);
        GeometryRowMut {
            characteristic_length: &mut self.characteristic_length[index],
            area_to_mass_ratio: &mut self.area_to_mass_ratio[index],
            area: &mut self.area[index],
            mass: &mut self.mass[index],
        }
    }

    /// Insert a fresh row at index 0, shifting all existing rows by one, and
    /// return writable references to its geometric columns.
    ///
    /// Used for the remnant of a non-catastrophic collision, which occupies
    /// row 0 by contract.
    pub fn prepend_element(&mut self) -> GeometryRowMut<'_> {
        self.name.insert(0, None);
        self.characteristic_length.insert(0, 0.0);
        self.area_to_mass_ratio.insert(0, 0.0);
        self.mass.insert(0, 0.0);
        self.area.insert(0, 0.0);
        self.ejection_velocity.insert(0, Vector3::zeros());
        self.velocity.insert(0, Vector3::zeros());
        GeometryRowMut {
            characteristic_length: &mut self.characteristic_length[0],
            area_to_mass_ratio: &mut self.area_to_mass_ratio[0],
            area: &mut self.area[0],
            mass: &mut self.mass[0],
        }
    }

    /// Export the batch as row-oriented satellites (AoS view).
    ///
    /// Row `k` gets `id = start_id + k + 1`, a clone of the shared position
    /// and its shared name pointer.
    #[must_use]
    pub fn to_satellites(&self) -> Vec<Satellite> {
        (0..self.len())
            .map(|row| {
                Satellite::from_parts(
                    self.start_id + row as u64 + 1,
                    self.name[row].clone(),
                    self.kind,
                    self.characteristic_length[row],
                    self.area_to_mass_ratio[row],
                    self.mass[row],
                    self.area[row],
                    self.velocity[row],
                    self.ejection_velocity[row],
                    self.position,
                )
            })
            .collect()
    }
}
