//! Input data readers: TLE, satellite catalog CSV and YAML satellite data,
//! plus the extension-based source dispatch.

pub mod csv;
pub mod satcat;
pub mod tle;
pub mod yaml;

use std::path::{Path, PathBuf};

use crate::error::{BreakupError, BreakupResult};
use crate::model::satellite::Satellite;

pub use csv::CsvReader;
pub use satcat::TleSatcatReader;
pub use tle::TleReader;
pub use yaml::YamlDataReader;

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            extensions
                .iter()
                .any(|candidate| extension.eq_ignore_ascii_case(candidate))
        })
}

/// Read the input satellites from the configured source files.
///
/// Accepted configurations: a single `.yaml` data file, or a `.csv` catalog
/// plus a `.txt`/`.tle` TLE file in either order.
///
/// # Errors
///
/// [`BreakupError::Config`] for any other file combination, plus the I/O
/// and parse errors of the selected reader.
pub fn read_satellites(sources: &[PathBuf]) -> BreakupResult<Vec<Satellite>> {
    match sources {
        [single] if has_extension(single, &["yaml", "yml"]) => {
            YamlDataReader::new(single)?.read()
        }
        [first, second] if has_extension(first, &["csv"]) && has_extension(second, &["txt", "tle"]) => {
            TleSatcatReader::new(first, second)?.read()
        }
        [first, second] if has_extension(first, &["txt", "tle"]) && has_extension(second, &["csv"]) => {
            TleSatcatReader::new(second, first)?.read()
        }
        _ => {
            let mut message =
                String::from("the following files were parsed as data input:\n");
            for (index, source) in sources.iter().enumerate() {
                message.push_str(&format!("{{{index}: {}}}\n", source.display()));
            }
            message.push_str("this is no valid configuration");
            Err(BreakupError::config(message))
        }
    }
}
