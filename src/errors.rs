use std::path::PathBuf;

use thiserror::Error;

use crate::persistence::schema::{MissingColumnError, SchemaError};

// * Unified Error type for the pipeline stages.
// * Per-listing problems never reach this type; they are dropped or left absent.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    MissingColumns(#[from] MissingColumnError),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid value '{value}' for column '{column}' in {} (row {row})", .path.display())]
    InvalidField {
        path: PathBuf,
        column: String,
        row: usize,
        value: String,
    },
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        PipelineError::Csv {
            path: path.into(),
            source,
        }
    }

    /// True for errors caused by a malformed input batch rather than the environment
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            PipelineError::Schema(_) | PipelineError::MissingColumns(_) | PipelineError::InvalidField { .. }
        )
    }
}
