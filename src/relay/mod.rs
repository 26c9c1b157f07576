//! Relay location list: download and structuring
pub mod fetch;
pub mod structure;

pub use fetch::fetch_relay_list;
pub use structure::{
    StructureReport,
    structure_locations,
};
