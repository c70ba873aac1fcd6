use std::path::PathBuf;
use thiserror::Error;

/// The main error type for cocofilter operations.
#[derive(Debug, Error)]
pub enum CocoFilterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to parse COCO JSON from {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize JSON for {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Categories not found in dataset: {} (pass --allow-missing to continue)", .missing.join(", "))]
    MissingCategories { missing: Vec<String> },

    #[error("Output path already exists: {} (pass --force to overwrite)", .path.display())]
    OutputExists { path: PathBuf },

    #[error("Validation split file {} is missing or unreadable: {reason}", .path.display())]
    MissingSplitFile { path: PathBuf, reason: String },

    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),
}
