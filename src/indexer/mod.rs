//! Reference dataset indexes and generated file discovery
pub mod places;
pub mod types;
pub mod workspace;

pub use places::{
    CountryIndex,
    PlaceIndex,
    build_country_index,
    build_index,
};
pub use types::IndexerError;
pub use workspace::find_files;
