//! Error types for loading and exporting the wildfire datasets.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A source table could not be opened or read at all.
    #[error("failed to load {source_name} from {path}: {reason}")]
    Load {
        source_name: String,
        path: String,
        reason: String,
    },

    #[error("{source_name}: missing required column `{column}`")]
    MissingColumn { source_name: String, column: String },

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    pub fn load(source_name: &str, path: &str, reason: impl ToString) -> Self {
        Self::Load {
            source_name: source_name.to_string(),
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn missing_column(source_name: &str, column: &str) -> Self {
        Self::MissingColumn {
            source_name: source_name.to_string(),
            column: column.to_string(),
        }
    }
}
