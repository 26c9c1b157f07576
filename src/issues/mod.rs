//! Repository issue statistics: download issues and chart open issues over time
pub mod fetch;
pub mod html;
pub mod timeline;

use std::path::PathBuf;

use thiserror::Error;

pub use fetch::{
    FetchSummary,
    fetch_issues,
};
pub use html::render_html;
pub use timeline::{
    Issue,
    TimelinePoint,
    extract_labels,
    load_issues,
    timeline,
};

use crate::http::FetchError;
use crate::indexer::IndexerError;

#[derive(Error, Debug)]
pub enum IssuesError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Indexer(#[from] IndexerError),
    #[error("Malformed issue JSON: {0}")]
    Json(#[from] serde_json::Error),
}
