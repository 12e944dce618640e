//! Standard CSV result writer with an optional Keplerian element block.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::BreakupResult;
use crate::model::orbital_elements::{AngularUnit, AnomalyKind};
use crate::model::satellite::Satellite;
use crate::output::format_vector;

/// Writes satellites as CSV rows to a file.
#[derive(Debug)]
pub struct CsvWriter {
    path: PathBuf,
    with_kepler: bool,
}

impl CsvWriter {
    /// Create a writer targeting the given path. With `with_kepler` the
    /// Keplerian element columns are appended to each row.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, with_kepler: bool) -> Self {
        Self {
            path: path.into(),
            with_kepler,
        }
    }

    /// The target path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the satellite collection.
    ///
    /// # Errors
    ///
    /// I/O errors.
    pub fn write(&self, satellites: &[Satellite]) -> BreakupResult<()> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        self.write_to(&mut writer, satellites)?;
        writer.flush()?;
        Ok(())
    }

    /// Write the satellite collection to any sink (used by the tests).
    ///
    /// # Errors
    ///
    /// I/O errors.
    pub fn write_to(
        &self,
        writer: &mut impl Write,
        satellites: &[Satellite],
    ) -> BreakupResult<()> {
        write!(
            writer,
            "ID,Name,Satellite Type,Characteristic Length [m],A/M [m^2/kg],Area [m^2],Mass [kg],\
             Ejection Velocity [m/s],Velocity [m/s],Position [m]"
        )?;
        if self.with_kepler {
            write!(
                writer,
                ",Semi-Major-Axis [m],Eccentricity,Inclination [rad],\
                 Longitude of the ascending node [rad],Argument of periapsis [rad],\
                 Mean Anomaly [rad]"
            )?;
        }
        writeln!(writer)?;

        for satellite in satellites {
            write!(
                writer,
                "{},{},{},{},{},{},{},{},{},{}",
                satellite.id(),
                satellite.name(),
                satellite.kind(),
                satellite.characteristic_length(),
                satellite.area_to_mass_ratio(),
                satellite.area(),
                satellite.mass(),
                format_vector(&satellite.ejection_velocity()),
                format_vector(&satellite.velocity()),
                format_vector(&satellite.position()),
            )?;
            if self.with_kepler {
                let elements = satellite.orbital_elements();
                write!(
                    writer,
                    ",{},{},{},{},{},{}",
                    elements.semi_major_axis(),
                    elements.eccentricity(),
                    elements.inclination(AngularUnit::Radian),
                    elements.raan(AngularUnit::Radian),
                    elements.argument_of_periapsis(AngularUnit::Radian),
                    elements.anomaly(AnomalyKind::Mean, AngularUnit::Radian),
                )?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }
}
