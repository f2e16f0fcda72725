//! File-based assumption loading
//!
//! Two formats are supported:
//! - JSON: a full or partial `Assumptions` object, merged over the SaaS template
//! - CSV: two columns (`field,value`) with a header row; values are entered the
//!   way the form takes them, so percentage fields are written as percentages

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::info;
use thiserror::Error;

use super::{find_field, parse_field_input, Assumptions, AssumptionsUpdate};

/// Errors raised while reading or editing assumptions
#[derive(Debug, Error)]
pub enum AssumptionsError {
    #[error("unknown assumption field: {0}")]
    UnknownField(String),

    #[error("unknown business type: {0}")]
    UnknownBusinessType(String),

    #[error("invalid number {value:?} for field {field}")]
    InvalidNumber { field: String, value: String },

    #[error("expected `field=value`, got {0:?}")]
    InvalidAssignment(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid assumptions JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid assumptions CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Raw CSV row: `field,value`
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    field: String,
    value: String,
}

impl AssumptionsUpdate {
    /// Parse a JSON object holding any subset of the assumption fields
    pub fn from_json_str(json: &str) -> Result<Self, AssumptionsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a partial update from a JSON file
    pub fn from_json_path(path: &Path) -> Result<Self, AssumptionsError> {
        let json = read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Load a partial update from any `field,value` CSV source
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, AssumptionsError> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut update = AssumptionsUpdate::new();

        for result in reader.deserialize() {
            let row: CsvRow = result?;
            let field = find_field(&row.field)
                .ok_or_else(|| AssumptionsError::UnknownField(row.field.clone()))?;
            let value = parse_field_input(field, &row.value)?;
            update.set(field.name, value)?;
        }

        Ok(update)
    }

    /// Load a partial update from a `field,value` CSV file
    pub fn from_csv_path(path: &Path) -> Result<Self, AssumptionsError> {
        let file = File::open(path).map_err(|source| AssumptionsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let update = Self::from_csv_reader(file)?;
        info!("Loaded assumption overrides from {}", path.display());
        Ok(update)
    }

    /// Parse a `field=value` assignment as typed on the command line
    pub fn parse_assignment(&mut self, assignment: &str) -> Result<(), AssumptionsError> {
        let (name, raw) = assignment
            .split_once('=')
            .ok_or_else(|| AssumptionsError::InvalidAssignment(assignment.to_string()))?;
        self.set_input(name, raw)
    }
}

impl Assumptions {
    /// Load assumptions from a JSON file; missing fields keep the SaaS template values
    pub fn from_json_path(path: &Path) -> Result<Self, AssumptionsError> {
        let update = AssumptionsUpdate::from_json_path(path)?;
        info!("Loaded assumptions from {}", path.display());
        Ok(Assumptions::saas_template().merge(&update))
    }
}

fn read_to_string(path: &Path) -> Result<String, AssumptionsError> {
    std::fs::read_to_string(path).map_err(|source| AssumptionsError::Io {
        path: path.to_path_buf(),
        source,
    })
}
