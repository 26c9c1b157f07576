//! Indexer type definitions.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexerError {
    /// Error when a glob pattern cannot be compiled
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
    /// Error when the root directory does not exist
    #[error("Directory not found: {0}")]
    InvalidPath(String),
}
