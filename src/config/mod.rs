//! YAML configuration of a breakup run.
//!
//! Type-safe deserialization via serde plus runtime validation of the
//! numeric constraints. Unknown tags are ignored, matching the permissive
//! reader the file format grew up with.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;
use validator::Validate;

use crate::error::{BreakupError, BreakupResult};
use crate::simulation::builder::SimulationKind;

/// Top-level configuration file.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BreakupConfig {
    /// The `simulation` section with the run parameters.
    #[validate(nested)]
    pub simulation: SimulationSection,

    /// Output targets for the simulation result.
    #[serde(rename = "resultOutput", default)]
    pub result_output: Option<OutputSection>,

    /// Output targets for the (possibly filtered) input satellites.
    #[serde(rename = "inputOutput", default)]
    pub input_output: Option<OutputSection>,
}

/// The `simulation` section of the configuration.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SimulationSection {
    /// Smallest characteristic length generated by the run (m).
    #[serde(rename = "minimalCharacteristicLength", default)]
    #[validate(range(exclusive_min = 0.0))]
    pub minimal_characteristic_length: Option<f64>,

    /// Declared simulation type token (`COLLISION|CO|EXPLOSION|EX`).
    #[serde(rename = "simulationType", default)]
    pub simulation_type: Option<String>,

    /// The largest NORAD id currently in use, if known.
    #[serde(rename = "currentMaxID", default)]
    pub current_max_id: Option<u64>,

    /// Input files: one `.yaml`, or a `.csv` satcat plus a `.txt`/`.tle`.
    #[serde(rename = "inputSource", default)]
    pub input_source: Vec<PathBuf>,

    /// Restrict the input to these ids.
    #[serde(rename = "idFilter", default)]
    pub id_filter: Option<Vec<u64>>,

    /// Grow the output toward the mass budget when it falls short.
    #[serde(rename = "enforceMassConservation", default)]
    pub enforce_mass_conservation: bool,
}

/// An output section (`resultOutput` or `inputOutput`).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OutputSection {
    /// Output file paths; the extension selects the writer.
    #[serde(default)]
    pub target: Vec<PathBuf>,

    /// Column mnemonic pattern for CSV targets.
    #[serde(rename = "csvPattern", default)]
    pub csv_pattern: Option<String>,

    /// Append the Keplerian element columns to CSV targets.
    #[serde(default)]
    pub kepler: bool,
}

impl BreakupConfig {
    /// Load and validate a configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// I/O, YAML or validation errors.
    pub fn load(path: impl AsRef<Path>) -> BreakupResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// YAML or validation errors.
    pub fn from_yaml(yaml: &str) -> BreakupResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// The minimal characteristic length, which is the one required tag.
    ///
    /// # Errors
    ///
    /// [`BreakupError::Config`] if the tag is missing.
    pub fn minimal_characteristic_length(&self) -> BreakupResult<f64> {
        self.simulation.minimal_characteristic_length.ok_or_else(|| {
            BreakupError::config(
                "the minimal characteristic length was not specified in the configuration file",
            )
        })
    }

    /// The declared simulation kind; unparseable or missing tokens fall
    /// back to [`SimulationKind::Unknown`] with a warning.
    #[must_use]
    pub fn simulation_kind(&self) -> SimulationKind {
        match self.simulation.simulation_type.as_deref() {
            Some("COLLISION" | "CO") => SimulationKind::Collision,
            Some("EXPLOSION" | "EX") => SimulationKind::Explosion,
            Some(other) => {
                warn!("the simulation type \"{other}\" could not be parsed, therefore UNKNOWN");
                SimulationKind::Unknown
            }
            None => {
                warn!("the simulation type was not given, therefore UNKNOWN");
                SimulationKind::Unknown
            }
        }
    }

    /// The id filter as a set, if configured.
    #[must_use]
    pub fn id_filter(&self) -> Option<HashSet<u64>> {
        self.simulation
            .id_filter
            .as_ref()
            .map(|ids| ids.iter().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_CONFIG: &str = "\
simulation:
  minimalCharacteristicLength: 0.05
  simulationType: COLLISION
  currentMaxID: 48514
  inputSource: [\"satellites.yaml\"]
  idFilter: [24946, 22675]
  enforceMassConservation: true
resultOutput:
  target: [\"result.csv\", \"result.vtu\"]
  kepler: true
inputOutput:
  target: [\"input.csv\"]
  csvPattern: \"InL\"
";

    #[test]
    fn test_full_config_parses() {
        let config = BreakupConfig::from_yaml(FULL_CONFIG);
        assert!(config.is_ok());
        if let Ok(config) = config {
            assert!(matches!(config.minimal_characteristic_length(), Ok(lc) if lc == 0.05));
            assert_eq!(config.simulation_kind(), SimulationKind::Collision);
            assert_eq!(config.simulation.current_max_id, Some(48514));
            assert!(config.simulation.enforce_mass_conservation);
            let filter = config.id_filter();
            assert!(matches!(filter, Some(f) if f.contains(&24946) && f.contains(&22675)));
            assert!(matches!(&config.result_output, Some(out) if out.kepler));
            assert!(
                matches!(&config.input_output, Some(out) if out.csv_pattern.as_deref() == Some("InL"))
            );
        }
    }

    #[test]
    fn test_missing_minimal_characteristic_length() {
        let config = BreakupConfig::from_yaml("simulation:\n  simulationType: EX\n");
        assert!(config.is_ok());
        if let Ok(config) = config {
            assert!(matches!(
                config.minimal_characteristic_length(),
                Err(BreakupError::Config { .. })
            ));
        }
    }

    #[test]
    fn test_negative_minimal_characteristic_length_fails_validation() {
        let config =
            BreakupConfig::from_yaml("simulation:\n  minimalCharacteristicLength: -0.05\n");
        assert!(matches!(config, Err(BreakupError::Validation(_))));
    }

    #[test]
    fn test_simulation_type_abbreviations() {
        for (token, expected) in [
            ("CO", SimulationKind::Collision),
            ("COLLISION", SimulationKind::Collision),
            ("EX", SimulationKind::Explosion),
            ("EXPLOSION", SimulationKind::Explosion),
        ] {
            let yaml = format!(
                "simulation:\n  minimalCharacteristicLength: 0.05\n  simulationType: {token}\n"
            );
            let config = BreakupConfig::from_yaml(&yaml);
            assert!(matches!(&config, Ok(c) if c.simulation_kind() == expected));
        }
    }

    #[test]
    fn test_unknown_simulation_type_falls_back() {
        let yaml = "simulation:\n  minimalCharacteristicLength: 0.05\n  simulationType: BANG\n";
        let config = BreakupConfig::from_yaml(yaml);
        assert!(matches!(&config, Ok(c) if c.simulation_kind() == SimulationKind::Unknown));
    }

    #[test]
    fn test_defaults() {
        let config = BreakupConfig::from_yaml("simulation:\n  minimalCharacteristicLength: 1.0\n");
        assert!(config.is_ok());
        if let Ok(config) = config {
            assert!(!config.simulation.enforce_mass_conservation);
            assert!(config.simulation.current_max_id.is_none());
            assert!(config.id_filter().is_none());
            assert!(config.result_output.is_none());
            assert!(config.input_output.is_none());
        }
    }
}
