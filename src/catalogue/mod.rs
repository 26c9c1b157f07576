//! gettext catalogues: model, file format, generation and merging
mod entry;
pub mod emit;
pub mod merge;
pub mod po;

use std::path::PathBuf;

use thiserror::Error;

pub use emit::{
    emit_cities_catalogue,
    emit_countries_catalogue,
    emit_relay_translations,
    emit_template,
};
pub use entry::{
    Catalogue,
    CatalogueEntry,
};
pub use merge::{
    MergeError,
    MergeOutcome,
    merge_catalogues,
};
pub use po::{
    read_catalogue,
    write_catalogue,
};

#[derive(Error, Debug)]
pub enum CatalogueError {
    #[error("Duplicate message id '{0}'")]
    Duplicate(String),
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
}
