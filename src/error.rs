//! Error types for the breakup simulation.
//!
//! All fallible operations return [`BreakupResult`] instead of panicking;
//! the pipeline itself never swallows errors.

use thiserror::Error;

/// Result type alias for breakup operations.
pub type BreakupResult<T> = Result<T, BreakupError>;

/// Unified error type for all breakup operations.
#[derive(Debug, Error)]
pub enum BreakupError {
    /// A required file is missing or unreadable.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error (configuration or satellite data).
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Configuration constraint violation.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// A cell, line or record could not be parsed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the malformed input.
        message: String,
    },

    /// Satellite builder finalization with a missing required attribute.
    #[error("incomplete satellite {satellite}: no {missing} or way to derive it")]
    IncompleteSatellite {
        /// Display form of the partially built satellite.
        satellite: String,
        /// Name of the missing attribute.
        missing: &'static str,
    },

    /// The filtered parent count does not match the declared simulation kind.
    #[error(
        "no breakup simulation was created: simulation type {simulation_type} \
         requires {expected} satellite(s), but the filtered input contained {actual}"
    )]
    InputCardinality {
        /// The declared simulation kind.
        simulation_type: String,
        /// Human readable requirement, e.g. "1" or "1 or 2".
        expected: &'static str,
        /// Number of satellites after filtering.
        actual: usize,
    },

    /// Newton-Raphson did not converge on the anomaly solve.
    #[error("anomaly solve did not converge within {iterations} iterations")]
    ConvergenceExhausted {
        /// The iteration cap that was reached.
        iterations: usize,
    },

    /// Missing required configuration tag or unsupported output target.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },
}

impl BreakupError {
    /// Create a parse error with a message.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
