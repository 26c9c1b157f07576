//! Relay location list -> ordered country/city structure

use serde_json::Value;

use crate::input::relay::{
    RawLocation,
    RawLocations,
};
use crate::types::{
    Countries,
    LocationKey,
};

/// What happened to the raw records while structuring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StructureReport {
    /// Records inserted into the structure.
    pub accepted: usize,
    /// Malformed keys and records without country/city names.
    pub skipped: usize,
    /// Records for an already seen `(country, city)` pair.
    pub duplicates: usize,
}

/// Build the country -> city structure from the relay list's `locations`.
///
/// Invalid records are logged and skipped; this never fails.
#[must_use]
pub fn structure_locations(raw_locations: &RawLocations) -> (Countries, StructureReport) {
    let mut countries = Countries::new();
    let mut report = StructureReport::default();

    for (raw_key, value) in raw_locations.iter() {
        if insert_location(&mut countries, raw_key, value, &mut report) {
            report.accepted += 1;
        }
    }

    tracing::debug!(
        countries = countries.len(),
        cities = countries.city_count(),
        skipped = report.skipped,
        duplicates = report.duplicates,
        "Structured relay locations"
    );
    (countries, report)
}

fn insert_location(
    countries: &mut Countries,
    raw_key: &str,
    value: &Value,
    report: &mut StructureReport,
) -> bool {
    let Some(key) = LocationKey::parse(raw_key) else {
        tracing::warn!("Skipping malformed location key '{raw_key}'");
        report.skipped += 1;
        return false;
    };

    let location = RawLocation::from_value(value).unwrap_or_default();
    let (Some(country_name), Some(city_name)) = (
        location.country.as_deref().filter(|name| !name.is_empty()),
        location.city.as_deref().filter(|name| !name.is_empty()),
    ) else {
        tracing::warn!("Skipping location '{key}' without a country or city name");
        report.skipped += 1;
        return false;
    };

    let country = countries.get_or_insert(&key.country_code, country_name);
    if let Err(existing) = country.insert_city(&key.city_code, city_name) {
        tracing::warn!(
            "Duplicate city '{key}': keeping '{}', dropping '{city_name}'",
            existing.name
        );
        report.duplicates += 1;
        return false;
    }

    true
}
