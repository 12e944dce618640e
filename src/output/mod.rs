//! Output writers: standard CSV, pattern CSV and VTK.

pub mod csv;
pub mod pattern;
pub mod vtk;

use std::path::Path;

use nalgebra::Vector3;

use crate::config::OutputSection;
use crate::error::{BreakupError, BreakupResult};
use crate::model::satellite::Satellite;

pub use csv::CsvWriter;
pub use pattern::PatternWriter;
pub use vtk::VtkWriter;

/// Render a cartesian vector as `[x y z]` for the CSV outputs.
#[must_use]
pub fn format_vector(vector: &Vector3<f64>) -> String {
    format!("[{} {} {}]", vector.x, vector.y, vector.z)
}

/// One configured output target.
#[derive(Debug)]
pub enum OutputTarget {
    /// Standard CSV, optionally with Keplerian columns.
    Csv(CsvWriter),
    /// Pattern-selected CSV columns.
    Pattern(PatternWriter),
    /// VTK unstructured grid.
    Vtk(VtkWriter),
}

impl OutputTarget {
    /// Write the satellite collection to this target.
    ///
    /// # Errors
    ///
    /// I/O errors.
    pub fn write(&self, satellites: &[Satellite]) -> BreakupResult<()> {
        match self {
            Self::Csv(writer) => writer.write(satellites),
            Self::Pattern(writer) => writer.write(satellites),
            Self::Vtk(writer) => writer.write(satellites),
        }
    }

    /// The path this target writes to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Csv(writer) => writer.path(),
            Self::Pattern(writer) => writer.path(),
            Self::Vtk(writer) => writer.path(),
        }
    }
}

/// Build the writers of one output section.
///
/// The file extension selects the writer: `.csv` becomes the standard or,
/// with a configured pattern, the pattern writer; `.vtu` becomes the VTK
/// writer.
///
/// # Errors
///
/// [`BreakupError::Config`] for a target of unsupported extension, an
/// invalid pattern, or a section without targets.
pub fn build_output_targets(section: &OutputSection) -> BreakupResult<Vec<OutputTarget>> {
    if section.target.is_empty() {
        return Err(BreakupError::config(
            "an output section was specified without any targets",
        ));
    }
    section
        .target
        .iter()
        .map(|path| {
            let extension = path
                .extension()
                .and_then(|extension| extension.to_str())
                .unwrap_or("");
            if extension.eq_ignore_ascii_case("csv") {
                match &section.csv_pattern {
                    Some(pattern) => Ok(OutputTarget::Pattern(PatternWriter::new(path, pattern)?)),
                    None => Ok(OutputTarget::Csv(CsvWriter::new(path, section.kepler))),
                }
            } else if extension.eq_ignore_ascii_case("vtu") {
                Ok(OutputTarget::Vtk(VtkWriter::new(path)))
            } else {
                Err(BreakupError::config(format!(
                    "the file {} is no available output form, available are csv and vtu",
                    path.display()
                )))
            }
        })
        .collect()
}
