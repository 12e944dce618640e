//! VTK (unstructured grid) result writer.
//!
//! Emits one `<Piece>` with the fragments as points: scalar point data for
//! characteristic length, mass, area and A/m, 3-vector point data for
//! velocity and ejection velocity, and the positions as `<Points>`. There
//! are no cells.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use nalgebra::Vector3;

use crate::error::BreakupResult;
use crate::model::satellite::Satellite;

/// Writes satellites as a VTK `.vtu` file.
#[derive(Debug)]
pub struct VtkWriter {
    path: PathBuf,
}

impl VtkWriter {
    /// Create a writer targeting the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
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
        writeln!(writer, r#"<?xml version="1.0" encoding="UTF-8" standalone="no" ?>"#)?;
        writeln!(
            writer,
            r#"<VTKFile byte_order="LittleEndian" type="UnstructuredGrid" version="0.1">"#
        )?;
        writeln!(writer, "  <UnstructuredGrid>")?;
        writeln!(
            writer,
            r#"    <Piece NumberOfCells="0" NumberOfPoints="{}">"#,
            satellites.len()
        )?;
        writeln!(writer, "      <PointData>")?;

        write_scalar_property(writer, "characteristic-length", satellites, |satellite| {
            satellite.characteristic_length()
        })?;
        write_scalar_property(writer, "mass", satellites, Satellite::mass)?;
        write_scalar_property(writer, "area", satellites, Satellite::area)?;
        write_scalar_property(writer, "area-to-mass", satellites, |satellite| {
            satellite.area_to_mass_ratio()
        })?;
        write_vector_property(writer, "velocity", satellites, Satellite::velocity)?;
        write_vector_property(writer, "ejection-velocity", satellites, |satellite| {
            satellite.ejection_velocity()
        })?;

        writeln!(writer, "      </PointData>")?;
        writeln!(writer, "      <CellData/>")?;
        writeln!(writer, "      <Points>")?;
        write_vector_property(writer, "position", satellites, Satellite::position)?;
        writeln!(writer, "      </Points>")?;
        writeln!(writer, "      <Cells>")?;
        writeln!(
            writer,
            r#"        <DataArray Name="types" NumberOfComponents="0" format="ascii" type="Float32"/>"#
        )?;
        writeln!(writer, "      </Cells>")?;
        writeln!(writer, "    </Piece>")?;
        writeln!(writer, "  </UnstructuredGrid>")?;
        writeln!(writer, "</VTKFile>")?;
        Ok(())
    }
}

fn write_scalar_property(
    writer: &mut impl Write,
    name: &str,
    satellites: &[Satellite],
    property: impl Fn(&Satellite) -> f64,
) -> BreakupResult<()> {
    writeln!(
        writer,
        r#"        <DataArray Name="{name}" NumberOfComponents="1" format="ascii" type="Float64">"#
    )?;
    for satellite in satellites {
        writeln!(writer, "          {}", property(satellite))?;
    }
    writeln!(writer, "        </DataArray>")?;
    Ok(())
}

fn write_vector_property(
    writer: &mut impl Write,
    name: &str,
    satellites: &[Satellite],
    property: impl Fn(&Satellite) -> Vector3<f64>,
) -> BreakupResult<()> {
    writeln!(
        writer,
        r#"        <DataArray Name="{name}" NumberOfComponents="3" format="ascii" type="Float64">"#
    )?;
    for satellite in satellites {
        let vector = property(satellite);
        writeln!(writer, "          {} {} {}", vector.x, vector.y, vector.z)?;
    }
    writeln!(writer, "        </DataArray>")?;
    Ok(())
}
