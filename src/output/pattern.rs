//! CSV writer selecting its columns through a single-character mnemonic
//! pattern.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{BreakupError, BreakupResult};
use crate::model::orbital_elements::{AngularUnit, AnomalyKind, OrbitalElements};
use crate::model::satellite::Satellite;
use crate::output::format_vector;

/// The columns addressable by one pattern character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Id,
    Name,
    Kind,
    CharacteristicLength,
    AreaToMassRatio,
    Area,
    Mass,
    Velocity,
    EjectionVelocity,
    Position,
    SemiMajorAxis,
    Eccentricity,
    Inclination,
    Raan,
    ArgumentOfPeriapsis,
    MeanAnomaly,
    EccentricAnomaly,
    TrueAnomaly,
}

impl Column {
    fn from_mnemonic(mnemonic: char) -> Option<Self> {
        match mnemonic {
            'I' => Some(Self::Id),
            'n' => Some(Self::Name),
            't' => Some(Self::Kind),
            'L' => Some(Self::CharacteristicLength),
            'R' => Some(Self::AreaToMassRatio),
            'A' => Some(Self::Area),
            'm' => Some(Self::Mass),
            'v' => Some(Self::Velocity),
            'j' => Some(Self::EjectionVelocity),
            'p' => Some(Self::Position),
            'a' => Some(Self::SemiMajorAxis),
            'e' => Some(Self::Eccentricity),
            'i' => Some(Self::Inclination),
            'W' => Some(Self::Raan),
            'w' => Some(Self::ArgumentOfPeriapsis),
            'M' => Some(Self::MeanAnomaly),
            'E' => Some(Self::EccentricAnomaly),
            'T' => Some(Self::TrueAnomaly),
            _ => None,
        }
    }

    const fn header(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Name => "Name",
            Self::Kind => "Satellite Type",
            Self::CharacteristicLength => "Characteristic Length [m]",
            Self::AreaToMassRatio => "A/M [m^2/kg]",
            Self::Area => "Area [m^2]",
            Self::Mass => "Mass [kg]",
            Self::Velocity => "Velocity [m/s]",
            Self::EjectionVelocity => "Ejection Velocity [m/s]",
            Self::Position => "Position [m]",
            Self::SemiMajorAxis => "Semi-Major-Axis [m]",
            Self::Eccentricity => "Eccentricity",
            Self::Inclination => "Inclination [rad]",
            Self::Raan => "Longitude of the ascending node [rad]",
            Self::ArgumentOfPeriapsis => "Argument of periapsis [rad]",
            Self::MeanAnomaly => "Mean Anomaly [rad]",
            Self::EccentricAnomaly => "Eccentric Anomaly [rad]",
            Self::TrueAnomaly => "True Anomaly [rad]",
        }
    }

    const fn needs_orbital_elements(self) -> bool {
        matches!(
            self,
            Self::SemiMajorAxis
                | Self::Eccentricity
                | Self::Inclination
                | Self::Raan
                | Self::ArgumentOfPeriapsis
                | Self::MeanAnomaly
                | Self::EccentricAnomaly
                | Self::TrueAnomaly
        )
    }

    fn format(self, satellite: &Satellite, elements: Option<&OrbitalElements>) -> String {
        let element = |f: fn(&OrbitalElements) -> f64| {
            elements.map_or_else(String::new, |elements| f(elements).to_string())
        };
        match self {
            Self::Id => satellite.id().to_string(),
            Self::Name => satellite.name().to_string(),
            Self::Kind => satellite.kind().to_string(),
            Self::CharacteristicLength => satellite.characteristic_length().to_string(),
            Self::AreaToMassRatio => satellite.area_to_mass_ratio().to_string(),
            Self::Area => satellite.area().to_string(),
            Self::Mass => satellite.mass().to_string(),
            Self::Velocity => format_vector(&satellite.velocity()),
            Self::EjectionVelocity => format_vector(&satellite.ejection_velocity()),
            Self::Position => format_vector(&satellite.position()),
            Self::SemiMajorAxis => element(OrbitalElements::semi_major_axis),
            Self::Eccentricity => element(OrbitalElements::eccentricity),
            Self::Inclination => element(|e| e.inclination(AngularUnit::Radian)),
            Self::Raan => element(|e| e.raan(AngularUnit::Radian)),
            Self::ArgumentOfPeriapsis => element(|e| e.argument_of_periapsis(AngularUnit::Radian)),
            Self::MeanAnomaly => element(|e| e.anomaly(AnomalyKind::Mean, AngularUnit::Radian)),
            Self::EccentricAnomaly => {
                element(|e| e.anomaly(AnomalyKind::Eccentric, AngularUnit::Radian))
            }
            Self::TrueAnomaly => element(|e| e.anomaly(AnomalyKind::True, AngularUnit::Radian)),
        }
    }
}

/// Writes satellites as CSV with the columns selected by a mnemonic
/// pattern, e.g. `"IL"` for id and characteristic length.
#[derive(Debug)]
pub struct PatternWriter {
    path: PathBuf,
    columns: Vec<Column>,
}

impl PatternWriter {
    /// Create a writer for the given path and pattern.
    ///
    /// # Errors
    ///
    /// [`BreakupError::Config`] for an unknown pattern character.
    pub fn new(path: impl Into<PathBuf>, pattern: &str) -> BreakupResult<Self> {
        let columns = pattern
            .chars()
            .map(|mnemonic| {
                Column::from_mnemonic(mnemonic).ok_or_else(|| {
                    BreakupError::config(format!(
                        "unknown CSV pattern character '{mnemonic}' in pattern \"{pattern}\""
                    ))
                })
            })
            .collect::<BreakupResult<Vec<Column>>>()?;
        Ok(Self {
            path: path.into(),
            columns,
        })
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
        let header: Vec<&str> = self.columns.iter().map(|column| column.header()).collect();
        writeln!(writer, "{}", header.join(","))?;

        let needs_elements = self
            .columns
            .iter()
            .any(|column| column.needs_orbital_elements());
        for satellite in satellites {
            // The element view is derived once per row, not per column.
            let elements = needs_elements.then(|| satellite.orbital_elements());
            let cells: Vec<String> = self
                .columns
                .iter()
                .map(|column| column.format(satellite, elements.as_ref()))
                .collect();
            writeln!(writer, "{}", cells.join(","))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn satellite() -> Satellite {
        Satellite::from_parts(
            7,
            Some(std::sync::Arc::from("Frag")),
            crate::model::satellite::SatKind::Debris,
            0.1,
            0.5,
            0.02,
            0.01,
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::zeros(),
            Vector3::new(7e6, 1.0, 0.5),
        )
    }

    #[test]
    fn test_header_follows_pattern() {
        let writer = PatternWriter::new("unused.csv", "InL");
        assert!(writer.is_ok());
        if let Ok(writer) = writer {
            let mut buffer = Vec::new();
            assert!(writer.write_to(&mut buffer, &[satellite()]).is_ok());
            let text = String::from_utf8_lossy(&buffer);
            let mut lines = text.lines();
            assert_eq!(lines.next(), Some("ID,Name,Characteristic Length [m]"));
            assert_eq!(lines.next(), Some("7,Frag,0.1"));
        }
    }

    #[test]
    fn test_all_mnemonics_resolve() {
        let writer = PatternWriter::new("unused.csv", "IntLRAmvjpaeiWwMET");
        assert!(writer.is_ok());
        if let Ok(writer) = writer {
            let mut buffer = Vec::new();
            assert!(writer.write_to(&mut buffer, &[satellite()]).is_ok());
            let text = String::from_utf8_lossy(&buffer);
            let mut lines = text.lines();
            let header = lines.next().unwrap_or("");
            assert_eq!(header.split(',').count(), 18);
            assert!(header.starts_with("ID,Name,Satellite Type"));
            assert!(header.contains("True Anomaly [rad]"));
            let row = lines.next().unwrap_or("");
            // The three vector columns also hold exactly one cell each.
            assert_eq!(row.split(',').count(), 18);
        }
    }

    #[test]
    fn test_unknown_mnemonic_fails() {
        assert!(matches!(
            PatternWriter::new("unused.csv", "Ix"),
            Err(BreakupError::Config { .. })
        ));
    }

    #[test]
    fn test_vector_columns_render_bracketed() {
        let writer = PatternWriter::new("unused.csv", "v");
        assert!(writer.is_ok());
        if let Ok(writer) = writer {
            let mut buffer = Vec::new();
            assert!(writer.write_to(&mut buffer, &[satellite()]).is_ok());
            let text = String::from_utf8_lossy(&buffer);
            assert!(text.contains("[1 2 3]"));
        }
    }
}
