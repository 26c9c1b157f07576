//! Reference dataset input definitions

use std::path::{
    Path,
    PathBuf,
};

use serde_json::{
    Map,
    Value,
    json,
};
use shapefile::dbase::FieldValue;
use shapefile::{
    PolygonRing,
    Shape,
};
use thiserror::Error;

/// Feature properties with lower-cased keys.
pub type Properties = Map<String, Value>;

/// A single dataset feature.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feature {
    pub properties: Properties,
    /// GeoJSON geometry object, if the shape type is supported.
    pub geometry: Option<Value>,
}

impl Feature {
    #[must_use]
    pub const fn new(properties: Properties, geometry: Option<Value>) -> Self {
        Self { properties, geometry }
    }

    /// Non-empty string property.
    #[must_use]
    pub fn str_property(&self, key: &str) -> Option<&str> {
        str_property(&self.properties, key)
    }

    /// Numeric property, accepting integers and floats.
    #[must_use]
    pub fn number_property(&self, key: &str) -> Option<f64> {
        self.properties.get(key).and_then(Value::as_f64)
    }
}

/// Non-empty string value of `key`.
#[must_use]
pub fn str_property<'a>(properties: &'a Properties, key: &str) -> Option<&'a str> {
    properties.get(key).and_then(Value::as_str).filter(|value| !value.is_empty())
}

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to open dataset {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: shapefile::Error,
    },
    #[error("Failed to read a feature of {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: shapefile::Error,
    },
}

/// Source of reference dataset features.
pub trait DatasetReader {
    /// Reads every feature of `dataset` once, in file order.
    fn read_features(&self, dataset: &str) -> Result<Vec<Feature>, DatasetError>;
}

/// Reads `<dataset_dir>/<dataset>/<dataset>.shp` with its `.dbf` records.
#[derive(Debug, Clone)]
pub struct ShapefileReader {
    dataset_dir: PathBuf,
}

impl ShapefileReader {
    #[must_use]
    pub const fn new(dataset_dir: PathBuf) -> Self {
        Self { dataset_dir }
    }

    #[must_use]
    pub fn shape_path(&self, dataset: &str) -> PathBuf {
        self.dataset_dir.join(dataset).join(format!("{dataset}.shp"))
    }

    fn read_path(path: &Path) -> Result<Vec<Feature>, DatasetError> {
        let mut reader = shapefile::Reader::from_path(path)
            .map_err(|source| DatasetError::Open { path: path.to_path_buf(), source })?;

        let mut features = Vec::new();
        for result in reader.iter_shapes_and_records() {
            let (shape, record) =
                result.map_err(|source| DatasetError::Read { path: path.to_path_buf(), source })?;

            let properties = record
                .into_iter()
                .map(|(key, value)| (key.to_lowercase(), field_value_to_json(value)))
                .collect();

            features.push(Feature::new(properties, shape_to_geometry(&shape)));
        }

        tracing::debug!(path = %path.display(), count = features.len(), "Read dataset");
        Ok(features)
    }
}

impl DatasetReader for ShapefileReader {
    fn read_features(&self, dataset: &str) -> Result<Vec<Feature>, DatasetError> {
        Self::read_path(&self.shape_path(dataset))
    }
}

fn field_value_to_json(value: FieldValue) -> Value {
    match value {
        FieldValue::Character(Some(text)) => Value::String(text.trim_end().to_string()),
        FieldValue::Numeric(Some(number)) | FieldValue::Double(number) => json!(number),
        FieldValue::Float(Some(number)) => json!(number),
        FieldValue::Integer(number) => json!(number),
        FieldValue::Logical(Some(flag)) => Value::Bool(flag),
        FieldValue::Memo(text) => Value::String(text),
        _ => Value::Null,
    }
}

/// Convert a shape into a GeoJSON geometry.
///
/// Only the 2D point, polyline and polygon shapes used by the datasets are
/// supported.
fn shape_to_geometry(shape: &Shape) -> Option<Value> {
    match shape {
        Shape::Point(point) => Some(json!({ "type": "Point", "coordinates": [point.x, point.y] })),
        Shape::Polyline(line) => {
            let parts: Vec<Vec<[f64; 2]>> = line
                .parts()
                .iter()
                .map(|part| to_positions(part))
                .collect();
            Some(json!({ "type": "MultiLineString", "coordinates": parts }))
        }
        Shape::Polygon(polygon) => {
            // Each outer ring starts a polygon; inner rings are its holes.
            let mut polygons: Vec<Vec<Vec<[f64; 2]>>> = Vec::new();
            for ring in polygon.rings() {
                match ring {
                    PolygonRing::Outer(points) => polygons.push(vec![to_positions(points)]),
                    PolygonRing::Inner(points) => match polygons.last_mut() {
                        Some(current) => current.push(to_positions(points)),
                        None => polygons.push(vec![to_positions(points)]),
                    },
                }
            }
            Some(json!({ "type": "MultiPolygon", "coordinates": polygons }))
        }
        Shape::NullShape => None,
        other => {
            tracing::debug!(shape_type = ?other.shapetype(), "Unsupported shape type");
            None
        }
    }
}

fn to_positions(points: &[shapefile::Point]) -> Vec<[f64; 2]> {
    points.iter().map(|p| [p.x, p.y]).collect()
}
