//! Line-based CSV reading.
//!
//! Cells are split on commas with whitespace preserved; how a cell is typed
//! is the caller's business. Malformed primitive cells read as zero, which
//! matches the permissive catalog files this reader grew up with.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{BreakupError, BreakupResult};

/// Parse a primitive cell, yielding the default (zero) for malformed input.
#[must_use]
pub fn cell_or_default<T: FromStr + Default>(cell: &str) -> T {
    cell.trim().parse().unwrap_or_default()
}

/// Reader splitting a CSV file into rows of string cells.
#[derive(Debug)]
pub struct CsvReader {
    path: PathBuf,
    has_header: bool,
}

impl CsvReader {
    /// Create a reader for the given CSV file.
    ///
    /// # Errors
    ///
    /// [`BreakupError::Io`] if the file does not exist.
    pub fn new(path: impl Into<PathBuf>, has_header: bool) -> BreakupResult<Self> {
        let path = path.into();
        if !path.exists() {
            return Err(BreakupError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("the CSV file {} does not exist", path.display()),
            )));
        }
        Ok(Self { path, has_header })
    }

    /// The path of the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All data rows, tokenized into cells. Skips the header if configured
    /// and empty lines.
    ///
    /// # Errors
    ///
    /// I/O errors.
    pub fn rows(&self) -> BreakupResult<Vec<Vec<String>>> {
        let content = std::fs::read_to_string(&self.path)?;
        let mut lines = content.lines();
        if self.has_header {
            let _ = lines.next();
        }
        Ok(lines
            .filter(|line| !line.is_empty())
            .map(|line| line.split(',').map(str::to_string).collect())
            .collect())
    }

    /// The header cells of the file.
    ///
    /// # Errors
    ///
    /// [`BreakupError::Config`] if the reader was configured without a
    /// header, I/O errors otherwise.
    pub fn header(&self) -> BreakupResult<Vec<String>> {
        if !self.has_header {
            return Err(BreakupError::config(format!(
                "the CSV file {} was configured without a header",
                self.path.display()
            )));
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(content
            .lines()
            .next()
            .unwrap_or("")
            .split(',')
            .map(str::to_string)
            .collect())
    }
}
