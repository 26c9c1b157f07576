//! Name and country-code indexes over the reference dataset

use std::collections::HashMap;
use std::rc::Rc;

use crate::input::dataset::{
    DatasetError,
    DatasetReader,
    Feature,
    Properties,
    str_property,
};

/// Properties used as lookup keys for a place.
///
/// - `name`: primary name
/// - `namepar`: parenthetical name, matches e.g. "Wien"
/// - `nameascii`: ASCII transliteration, matches e.g. "Sao Paulo"
const PLACE_NAME_KEYS: [&str; 3] = ["name", "namepar", "nameascii"];

/// Placeholder the dataset uses for countries without an official code.
const MISSING_ISO_CODE: &str = "-99";

/// Place name -> shared feature properties.
///
/// All name variants of a feature point to the same `Rc`. When two features
/// produce the same key the later one wins.
#[derive(Debug, Clone, Default)]
pub struct PlaceIndex {
    entries: HashMap<String, Rc<Properties>>,
}

impl PlaceIndex {
    /// Build the index in a single pass over `features`.
    #[must_use]
    pub fn from_features(features: impl IntoIterator<Item = Feature>) -> Self {
        let mut entries = HashMap::new();

        for feature in features {
            let properties = Rc::new(feature.properties);
            for key in PLACE_NAME_KEYS {
                if let Some(name) = str_property(&properties, key) {
                    entries.insert(name.to_string(), Rc::clone(&properties));
                }
            }
        }

        Self { entries }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Rc<Properties>> {
        self.entries.get(name)
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read `dataset` once and index it by place name.
///
/// # Errors
/// Returns an error if the dataset cannot be read.
pub fn build_index(reader: &dyn DatasetReader, dataset: &str) -> Result<PlaceIndex, DatasetError> {
    let index = PlaceIndex::from_features(reader.read_features(dataset)?);
    tracing::info!(dataset, keys = index.len(), "Built place index");
    Ok(index)
}

/// Lower-cased ISO 3166-1 alpha-2 code -> shared country properties.
///
/// Keyed by code rather than name so that relay country codes resolve
/// unambiguously.
#[derive(Debug, Clone, Default)]
pub struct CountryIndex {
    entries: HashMap<String, Rc<Properties>>,
}

impl CountryIndex {
    #[must_use]
    pub fn from_features(features: impl IntoIterator<Item = Feature>) -> Self {
        let mut entries = HashMap::new();

        for feature in features {
            let Some(code) = country_code(&feature.properties) else {
                tracing::debug!(
                    name = feature.str_property("name").unwrap_or_default(),
                    "Country without an ISO code"
                );
                continue;
            };
            entries.insert(code, Rc::new(feature.properties));
        }

        Self { entries }
    }

    /// Case-insensitive lookup.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Rc<Properties>> {
        self.entries.get(&code.to_lowercase())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read `dataset` once and index it by country code.
///
/// # Errors
/// Returns an error if the dataset cannot be read.
pub fn build_country_index(
    reader: &dyn DatasetReader,
    dataset: &str,
) -> Result<CountryIndex, DatasetError> {
    let index = CountryIndex::from_features(reader.read_features(dataset)?);
    tracing::info!(dataset, keys = index.len(), "Built country index");
    Ok(index)
}

/// `iso_a2`, or `iso_a2_eh` when the former is the `-99` placeholder.
fn country_code(properties: &Properties) -> Option<String> {
    ["iso_a2", "iso_a2_eh"]
        .into_iter()
        .filter_map(|key| str_property(properties, key))
        .find(|code| *code != MISSING_ISO_CODE)
        .map(str::to_lowercase)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use serde_json::{
        Value,
        json,
    };

    use super::*;
    use crate::test_utils::{
        MemoryDataset,
        feature,
    };

    fn vienna() -> Feature {
        feature(json!({
            "name": "Vienna",
            "namepar": "Wien",
            "nameascii": "Vienna",
            "name_de": "Wien",
        }))
    }

    #[googletest::test]
    fn test_all_name_variants_share_one_record() {
        let index = PlaceIndex::from_features([
            vienna(),
            feature(json!({"name": "São Paulo", "nameascii": "Sao Paulo", "name_sv": "São Paulo"})),
        ]);

        let by_name = index.get("Vienna").unwrap();
        let by_par = index.get("Wien").unwrap();
        expect_that!(Rc::ptr_eq(by_name, by_par), eq(true));

        let by_ascii = index.get("Sao Paulo").unwrap();
        let by_unicode = index.get("São Paulo").unwrap();
        expect_that!(Rc::ptr_eq(by_ascii, by_unicode), eq(true));

        // "Vienna" appears as both name and nameascii: a single key
        expect_that!(index.len(), eq(4));
    }

    #[googletest::test]
    fn test_colliding_key_last_write_wins() {
        let index = PlaceIndex::from_features([
            feature(json!({"name": "Portland", "name_de": "Portland (Oregon)"})),
            feature(json!({"name": "Portland", "name_de": "Portland (Maine)"})),
        ]);

        expect_that!(
            index.get("Portland").and_then(|p| p.get("name_de")),
            some(eq(&Value::from("Portland (Maine)")))
        );
    }

    #[googletest::test]
    fn test_empty_and_missing_names_are_not_indexed() {
        let index = PlaceIndex::from_features([feature(json!({"name": "", "pop_max": 10}))]);

        expect_that!(index.is_empty(), eq(true));
    }

    #[googletest::test]
    fn test_build_index_reads_dataset_once() {
        let dataset = MemoryDataset::new().with("places", vec![vienna()]);

        let index = build_index(&dataset, "places").unwrap();

        expect_that!(index.get("Wien"), some(anything()));
        expect_that!(dataset.reads("places"), eq(1));
    }

    #[googletest::test]
    fn test_country_index_by_code() {
        let index = CountryIndex::from_features([
            feature(json!({"name": "Sweden", "iso_a2": "SE", "name_de": "Schweden"})),
            feature(json!({"name": "France", "iso_a2": "-99", "iso_a2_eh": "FR"})),
            feature(json!({"name": "Somaliland", "iso_a2": "-99", "iso_a2_eh": "-99"})),
        ]);

        expect_that!(index.len(), eq(2));
        expect_that!(
            index.get("se").and_then(|p| p.get("name_de")),
            some(eq(&Value::from("Schweden")))
        );
        expect_that!(index.get("FR"), some(anything()));
    }
}
