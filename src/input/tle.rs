//! Two-Line-Element reader with the Alpha-5 numbering scheme.
//!
//! Only the fields used by the simulation are extracted; everything else in
//! the record is ignored.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{BreakupError, BreakupResult};
use crate::model::orbital_elements::{Epoch, OrbitalElements};

/// Maps the first character of an Alpha-5 id to its numeric offset.
///
/// The letters `I` and `O` have no mapping (they read as digits too easily).
fn alpha5_offset(first: char) -> Option<u64> {
    match first {
        ' ' | '0' => Some(0),
        '1'..='9' => first.to_digit(10).map(|digit| u64::from(digit) * 10_000),
        'A'..='H' => Some((first as u64 - 'A' as u64 + 10) * 10_000),
        'J'..='N' => Some((first as u64 - 'A' as u64 + 9) * 10_000),
        'P'..='Z' => Some((first as u64 - 'A' as u64 + 8) * 10_000),
        _ => None,
    }
}

/// Extract a column range from a TLE line, trimmed.
fn column(line: &str, range: std::ops::Range<usize>) -> BreakupResult<&str> {
    line.get(range.clone())
        .map(str::trim)
        .ok_or_else(|| BreakupError::parse(format!("TLE line too short for columns {range:?}: {line}")))
}

fn parse_f64(line: &str, range: std::ops::Range<usize>) -> BreakupResult<f64> {
    let cell = column(line, range)?;
    cell.parse().map_err(|_| {
        BreakupError::parse(format!("TLE field \"{cell}\" is not a valid number in line: {line}"))
    })
}

/// Parse one TLE entry into the satellite id and its orbital elements.
///
/// # Errors
///
/// [`BreakupError::Parse`] for malformed columns and
/// [`BreakupError::ConvergenceExhausted`] if the mean anomaly does not
/// convert.
pub fn parse_tle_entry(line1: &str, line2: &str) -> BreakupResult<(u64, OrbitalElements)> {
    // The id: an Alpha-5 leading character plus four digits.
    let id_field = column(line2, 2..7)?;
    let mut chars = line2.chars().skip(2);
    let first = chars.next().unwrap_or(' ');
    let offset = alpha5_offset(first).ok_or_else(|| {
        BreakupError::parse(format!("invalid Alpha-5 character '{first}' in id field \"{id_field}\""))
    })?;
    let rest: u64 = line2
        .get(3..7)
        .map(str::trim_start)
        .and_then(|digits| digits.parse().ok())
        .ok_or_else(|| {
            BreakupError::parse(format!("invalid numeric part of the id field \"{id_field}\""))
        })?;
    let id = offset + rest;

    let tle_data = [
        // Mean motion [rev/day]
        parse_f64(line2, 52..63)?,
        // Eccentricity, with the implied leading "0."
        format!("0.{}", column(line2, 26..33)?)
            .parse()
            .map_err(|_| BreakupError::parse(format!("invalid eccentricity in line: {line2}")))?,
        // Inclination [deg]
        parse_f64(line2, 8..16)?,
        // Right ascension of the ascending node [deg]
        parse_f64(line2, 17..25)?,
        // Argument of perigee [deg]
        parse_f64(line2, 34..42)?,
        // Mean anomaly [deg]
        parse_f64(line2, 43..51)?,
    ];

    // Two-digit epoch year: 57 and above is the 1900s.
    let year: i32 = column(line1, 18..20)?
        .parse()
        .map_err(|_| BreakupError::parse(format!("invalid epoch year in line: {line1}")))?;
    let year = if year < 57 { year + 2000 } else { year + 1900 };
    let day_fraction = parse_f64(line1, 20..28)?;

    let elements = OrbitalElements::from_tle(tle_data, Epoch::new(year, day_fraction))?;
    Ok((id, elements))
}

/// Reader for a file of TLE records.
#[derive(Debug)]
pub struct TleReader {
    path: PathBuf,
}

impl TleReader {
    /// Create a reader for the given TLE file.
    ///
    /// # Errors
    ///
    /// [`BreakupError::Io`] if the file does not exist.
    pub fn new(path: impl Into<PathBuf>) -> BreakupResult<Self> {
        let path = path.into();
        if !path.exists() {
            return Err(BreakupError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("the TLE file {} does not exist", path.display()),
            )));
        }
        Ok(Self { path })
    }

    /// The path of the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file into a mapping from satellite id to orbital elements.
    ///
    /// Lines are paired up by their leading `1`/`2` record markers; any
    /// other line (e.g. the optional name line) is skipped.
    ///
    /// # Errors
    ///
    /// I/O and parse errors.
    pub fn read(&self) -> BreakupResult<BTreeMap<u64, OrbitalElements>> {
        let content = std::fs::read_to_string(&self.path)?;
        let mut mapping = BTreeMap::new();
        let mut pending_line1: Option<&str> = None;
        for line in content.lines() {
            if line.starts_with('1') {
                pending_line1 = Some(line);
            } else if line.starts_with('2') {
                if let Some(line1) = pending_line1.take() {
                    let (id, elements) = parse_tle_entry(line1, line).map_err(|source| {
                        BreakupError::parse(format!(
                            "the TLE file {} is malformed: {source}",
                            self.path.display()
                        ))
                    })?;
                    mapping.insert(id, elements);
                }
            }
        }
        Ok(mapping)
    }
}
