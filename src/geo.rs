//! GeoJSON / TopoJSON extraction for the app's map

use std::path::{
    Path,
    PathBuf,
};

use serde_json::{
    Map,
    Value,
    json,
};
use thiserror::Error;

use crate::catalogue::emit::is_populous;
use crate::config::ToolsConfig;
use crate::input::dataset::Feature;
use crate::process::{
    CommandError,
    CommandRunner,
};

/// Properties kept in `cities.json`.
const CITY_PROPERTIES: &[&str] = &["scalerank", "name", "latitude", "longitude"];

#[derive(Error, Debug)]
pub enum GeoError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize GeoJSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Command(#[from] CommandError),
}

fn feature_collection(features: Vec<Value>) -> Value {
    json!({ "type": "FeatureCollection", "features": features })
}

/// Populated places with `pop_max >= population_min`, reduced to the
/// properties the map needs.
#[must_use]
pub fn extract_cities(features: &[Feature], population_min: u32) -> Value {
    let cities: Vec<Value> = features
        .iter()
        .filter(|feature| is_populous(feature, population_min))
        .map(|feature| {
            let properties: Map<String, Value> = CITY_PROPERTIES
                .iter()
                .filter_map(|key| feature.properties.get(*key).map(|value| ((*key).to_string(), value.clone())))
                .collect();
            json!({ "type": "Feature", "properties": properties, "geometry": feature.geometry })
        })
        .collect();

    tracing::debug!(count = cities.len(), "Extracted cities");
    feature_collection(cities)
}

/// One point per country at the dataset's label position.
///
/// Countries without `label_x`/`label_y` are skipped.
#[must_use]
pub fn extract_countries(features: &[Feature]) -> Value {
    let countries: Vec<Value> = features
        .iter()
        .filter_map(|feature| {
            let name = feature.properties.get("name").cloned().unwrap_or(Value::Null);
            let (Some(x), Some(y)) = (feature.number_property("label_x"), feature.number_property("label_y"))
            else {
                tracing::warn!("Skipping country {name} without a label point");
                return None;
            };
            Some(json!({
                "type": "Feature",
                "properties": { "name": name },
                "geometry": { "type": "Point", "coordinates": [x, y] },
            }))
        })
        .collect();

    tracing::debug!(count = countries.len(), "Extracted countries");
    feature_collection(countries)
}

/// Bounding box `[min_x, min_y, max_x, max_y]` of a GeoJSON geometry.
#[must_use]
pub fn bounding_box(geometry: &Value) -> Option<[f64; 4]> {
    let mut bbox: Option<[f64; 4]> = None;
    visit_positions(geometry.get("coordinates")?, &mut |x, y| {
        bbox = Some(match bbox {
            None => [x, y, x, y],
            Some([min_x, min_y, max_x, max_y]) => [min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y)],
        });
    });
    bbox
}

fn visit_positions(coordinates: &Value, visit: &mut impl FnMut(f64, f64)) {
    let Value::Array(items) = coordinates else { return };
    match items.as_slice() {
        [Value::Number(x), Value::Number(y), ..] => {
            if let (Some(x), Some(y)) = (x.as_f64(), y.as_f64()) {
                visit(x, y);
            }
        }
        _ => {
            for item in items {
                visit_positions(item, visit);
            }
        }
    }
}

/// Geometry-only features with their bounding boxes.
#[must_use]
pub fn geometry_collection(features: &[Feature]) -> Value {
    let features: Vec<Value> = features
        .iter()
        .filter_map(|feature| {
            let geometry = feature.geometry.as_ref()?;
            let mut value = json!({ "type": "Feature", "geometry": geometry });
            if let (Some(bbox), Some(object)) = (bounding_box(geometry), value.as_object_mut()) {
                object.insert("bbox".to_string(), json!(bbox));
            }
            Some(value)
        })
        .collect();
    feature_collection(features)
}

#[must_use]
pub fn topology_arguments(quantization: &str, output: &Path) -> Vec<String> {
    vec![
        "-q".to_string(),
        quantization.to_string(),
        "geometry=-".to_string(),
        "-o".to_string(),
        output.display().to_string(),
    ]
}

/// Pipe the features' geometry through `geo2topo` into `output`.
///
/// Returns whether the tool succeeded; a failure is logged, not raised.
pub fn extract_topology(
    runner: &dyn CommandRunner,
    tools: &ToolsConfig,
    features: &[Feature],
    output: &Path,
) -> Result<bool, GeoError> {
    create_parent(output)?;
    let input = serde_json::to_vec(&geometry_collection(features))?;

    let result = runner.run(&tools.geo2topo, &topology_arguments(&tools.quantization, output), Some(&input))?;
    if result.success() {
        tracing::info!("Extracted data to {}", output.display());
    } else {
        tracing::error!("{} exited with {:?}. {}", tools.geo2topo, result.status, result.stderr.trim());
    }
    Ok(result.success())
}

/// Write `value` as compact JSON, creating parent directories.
pub fn write_json(value: &Value, path: &Path) -> Result<(), GeoError> {
    create_parent(path)?;
    let content = serde_json::to_string(value)?;
    std::fs::write(path, content).map_err(|source| GeoError::Io { path: path.to_path_buf(), source })?;
    tracing::info!("Extracted data to {}", path.display());
    Ok(())
}

fn create_parent(path: &Path) -> Result<(), GeoError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| GeoError::Io { path: path.to_path_buf(), source })?;
    }
    Ok(())
}
