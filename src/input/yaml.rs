//! YAML satellite data reader.
//!
//! Extracts a list of satellites under the `satellites` key. The orbit of
//! an entry is given either directly (cartesian vectors or a `kepler` map)
//! or as a string path to a TLE file from which the matching id's elements
//! are taken.

use std::path::{Path, PathBuf};

use nalgebra::Vector3;
use serde::Deserialize;

use crate::error::{BreakupError, BreakupResult};
use crate::input::tle::TleReader;
use crate::model::builder::SatelliteBuilder;
use crate::model::orbital_elements::{AnomalyKind, OrbitalElements};
use crate::model::satellite::Satellite;

#[derive(Debug, Deserialize)]
struct SatelliteFile {
    #[serde(default)]
    satellites: Option<Vec<SatelliteNode>>,
}

#[derive(Debug, Deserialize)]
struct SatelliteNode {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "satType", default)]
    sat_type: Option<String>,
    #[serde(default)]
    mass: Option<f64>,
    #[serde(default)]
    area: Option<f64>,
    #[serde(default)]
    velocity: Option<[f64; 3]>,
    #[serde(default)]
    position: Option<[f64; 3]>,
    #[serde(default)]
    kepler: Option<KeplerNode>,
}

/// A `kepler` entry: either the elements themselves or a TLE file path.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum KeplerNode {
    TlePath(String),
    Elements(KeplerElementsNode),
}

#[derive(Debug, Deserialize)]
struct KeplerElementsNode {
    #[serde(rename = "semi-major-axis", default)]
    semi_major_axis: Option<f64>,
    #[serde(default)]
    eccentricity: Option<f64>,
    #[serde(default)]
    inclination: Option<f64>,
    #[serde(rename = "longitude-of-the-ascending-node", default)]
    longitude_of_the_ascending_node: Option<f64>,
    #[serde(rename = "argument-of-periapsis", default)]
    argument_of_periapsis: Option<f64>,
    #[serde(rename = "eccentric-anomaly", default)]
    eccentric_anomaly: Option<f64>,
    #[serde(rename = "mean-anomaly", default)]
    mean_anomaly: Option<f64>,
    #[serde(rename = "true-anomaly", default)]
    true_anomaly: Option<f64>,
}

impl KeplerElementsNode {
    /// Turn the node into orbital elements (all values in radians).
    ///
    /// The anomaly priority is eccentric > mean > true when multiple are
    /// present.
    fn to_orbital_elements(&self) -> BreakupResult<OrbitalElements> {
        let (Some(a), Some(e), Some(i), Some(raan), Some(argp)) = (
            self.semi_major_axis,
            self.eccentricity,
            self.inclination,
            self.longitude_of_the_ascending_node,
            self.argument_of_periapsis,
        ) else {
            return Err(BreakupError::parse(
                "one satellite input is incomplete: the Keplerian elements are not fully given",
            ));
        };
        let (anomaly, kind) = if let Some(anomaly) = self.eccentric_anomaly {
            (anomaly, AnomalyKind::Eccentric)
        } else if let Some(anomaly) = self.mean_anomaly {
            (anomaly, AnomalyKind::Mean)
        } else if let Some(anomaly) = self.true_anomaly {
            (anomaly, AnomalyKind::True)
        } else {
            return Err(BreakupError::parse(
                "one satellite input is incomplete: give at least one of the orbital anomalies \
                 (priority: eccentric > mean > true)",
            ));
        };
        OrbitalElements::from_radians([a, e, i, raan, argp, anomaly], kind, None)
    }
}

/// Reader for a YAML satellite data file.
#[derive(Debug)]
pub struct YamlDataReader {
    path: PathBuf,
}

impl YamlDataReader {
    /// Create a reader for the given YAML file.
    ///
    /// # Errors
    ///
    /// [`BreakupError::Io`] if the file does not exist.
    pub fn new(path: impl Into<PathBuf>) -> BreakupResult<Self> {
        let path = path.into();
        if !path.exists() {
            return Err(BreakupError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("the YAML file {} does not exist", path.display()),
            )));
        }
        Ok(Self { path })
    }

    /// Read the satellite collection.
    ///
    /// # Errors
    ///
    /// I/O, YAML, parse and builder errors.
    pub fn read(&self) -> BreakupResult<Vec<Satellite>> {
        let content = std::fs::read_to_string(&self.path)?;
        let file: SatelliteFile = serde_yaml::from_str(&content)?;
        let Some(nodes) = file.satellites else {
            return Err(BreakupError::parse(format!(
                "there was no satellites tag inside {}, so no satellites were extracted",
                self.path.display()
            )));
        };
        let mut builder = SatelliteBuilder::new();
        nodes
            .iter()
            .map(|node| self.parse_satellite(&mut builder, node))
            .collect()
    }

    fn parse_satellite(
        &self,
        builder: &mut SatelliteBuilder,
        node: &SatelliteNode,
    ) -> BreakupResult<Satellite> {
        builder.reset();
        // The id is also needed to resolve a TLE-file kepler entry.
        let id = node.id.unwrap_or(0);
        if node.id.is_some() {
            builder.id(id);
        }
        if let Some(name) = &node.name {
            builder.name(name.as_str());
        }
        if let Some(token) = &node.sat_type {
            builder.kind_from_token(token)?;
        }
        if let Some(mass) = node.mass {
            builder.mass(mass);
        }
        if let Some(area) = node.area {
            builder.mass_from_area(area);
        }
        if let Some(velocity) = node.velocity {
            builder.velocity(Vector3::from(velocity));
        }
        if let Some(position) = node.position {
            builder.position(Vector3::from(position));
        }
        match &node.kepler {
            Some(KeplerNode::Elements(elements)) => {
                builder.orbital_elements(elements.to_orbital_elements()?);
            }
            Some(KeplerNode::TlePath(tle_path)) => {
                let tle_path = self.resolve_sibling(tle_path);
                let mapping = TleReader::new(tle_path)?.read()?;
                let elements = mapping.get(&id).ok_or_else(|| {
                    BreakupError::parse(format!(
                        "the TLE file did not contain Kepler elements for the satellite with id {id}"
                    ))
                })?;
                builder.orbital_elements(*elements);
            }
            None => {}
        }
        builder.build()
    }

    /// TLE paths inside the data file resolve relative to the data file.
    fn resolve_sibling(&self, relative: &str) -> PathBuf {
        let candidate = Path::new(relative);
        if candidate.is_absolute() || candidate.exists() {
            candidate.to_path_buf()
        } else {
            self.path
                .parent()
                .map_or_else(|| candidate.to_path_buf(), |parent| parent.join(candidate))
        }
    }
}
