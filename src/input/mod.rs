//! Raw inputs: reference dataset features and the relay list.
pub mod dataset;
pub mod relay;

pub use dataset::{
    DatasetError,
    DatasetReader,
    Feature,
    Properties,
    ShapefileReader,
};
pub use relay::{
    RawLocation,
    RawLocations,
    RelayList,
};
