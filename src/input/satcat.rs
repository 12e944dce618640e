//! Satellite-catalog (satcat) CSV rows and the combined TLE + satcat data
//! source.
//!
//! The catalog contributes name, type and radar cross section per id; the
//! TLE file contributes the orbital elements. Only satellites present in
//! both files are built.

use std::path::PathBuf;

use tracing::info;

use crate::error::{BreakupError, BreakupResult};
use crate::input::csv::{cell_or_default, CsvReader};
use crate::input::tle::TleReader;
use crate::model::builder::SatelliteBuilder;
use crate::model::satellite::{SatKind, Satellite};

/// One row of the satellite catalog.
///
/// The column layout follows the public satcat export; fields the
/// simulation does not use are kept as raw strings.
#[derive(Debug, Clone)]
pub struct SatcatRow {
    /// Object name.
    pub name: String,
    /// International designator.
    pub identifier: String,
    /// NORAD catalog id.
    pub id: u64,
    /// Object type.
    pub kind: SatKind,
    /// Operational status code.
    pub status_code: String,
    /// Owner abbreviation.
    pub owner: String,
    /// Launch date.
    pub launch_date: String,
    /// Launch site abbreviation.
    pub launch_site: String,
    /// Decay date, if decayed.
    pub decay_date: String,
    /// Orbital period (min).
    pub period: f64,
    /// Inclination (deg).
    pub inclination: f64,
    /// Apogee altitude (km).
    pub apogee: f64,
    /// Perigee altitude (km).
    pub perigee: f64,
    /// Radar cross section (m²).
    pub radar_cross_section: f64,
    /// Data status code.
    pub data_status_code: String,
    /// Orbit center.
    pub orbit_center: String,
    /// Orbit type.
    pub orbit_type: String,
}

impl SatcatRow {
    /// Parse a satcat row from its cells.
    ///
    /// Malformed primitive cells read as zero; an unknown object type token
    /// is fatal.
    ///
    /// # Errors
    ///
    /// [`BreakupError::Parse`] for an unknown type token.
    pub fn parse(cells: &[String]) -> BreakupResult<Self> {
        let cell = |index: usize| cells.get(index).map_or("", String::as_str);
        Ok(Self {
            name: cell(0).to_string(),
            identifier: cell(1).to_string(),
            id: cell_or_default(cell(2)),
            kind: cell(3).trim().parse()?,
            status_code: cell(4).to_string(),
            owner: cell(5).to_string(),
            launch_date: cell(6).to_string(),
            launch_site: cell(7).to_string(),
            decay_date: cell(8).to_string(),
            period: cell_or_default(cell(9)),
            inclination: cell_or_default(cell(10)),
            apogee: cell_or_default(cell(11)),
            perigee: cell_or_default(cell(12)),
            radar_cross_section: cell_or_default(cell(13)),
            data_status_code: cell(14).to_string(),
            orbit_center: cell(15).to_string(),
            orbit_type: cell(16).to_string(),
        })
    }
}

/// Data source joining a satcat CSV with a TLE file.
#[derive(Debug)]
pub struct TleSatcatReader {
    satcat: CsvReader,
    tle: TleReader,
}

impl TleSatcatReader {
    /// Create the combined reader from the catalog and TLE paths.
    ///
    /// # Errors
    ///
    /// [`BreakupError::Io`] if either file does not exist.
    pub fn new(satcat_path: impl Into<PathBuf>, tle_path: impl Into<PathBuf>) -> BreakupResult<Self> {
        Ok(Self {
            satcat: CsvReader::new(satcat_path, true)?,
            tle: TleReader::new(tle_path)?,
        })
    }

    /// Read and join both files into satellites.
    ///
    /// # Errors
    ///
    /// I/O, parse and builder errors.
    pub fn read(&self) -> BreakupResult<Vec<Satellite>> {
        let tle_mapping = self.tle.read()?;
        let mut satellites = Vec::new();
        let mut builder = SatelliteBuilder::new();

        let mut catalog = std::collections::HashMap::new();
        for cells in self.satcat.rows()? {
            let row = SatcatRow::parse(&cells).map_err(|source| {
                BreakupError::parse(format!(
                    "the satellite catalog {} is malformed: {source}",
                    self.satcat.path().display()
                ))
            })?;
            catalog.insert(row.id, row);
        }

        // Only ids appearing in both sources have complete data.
        for (id, elements) in tle_mapping {
            if let Some(row) = catalog.get(&id) {
                let satellite = builder
                    .reset()
                    .id(id)
                    .name(row.name.as_str())
                    .kind(row.kind)
                    .mass_from_area(row.radar_cross_section)
                    .orbital_elements(elements)
                    .build()?;
                satellites.push(satellite);
            }
        }
        info!(
            "extracted {} satellites from {} and {}",
            satellites.len(),
            self.satcat.path().display(),
            self.tle.path().display()
        );
        Ok(satellites)
    }
}
