//! Catalogue generation from relay locations and dataset features

use crate::input::dataset::Feature;
use crate::locale::LocaleMapper;
use crate::stats::TranslationStats;
use crate::translator::PlaceTranslator;
use crate::types::{
    CityRecord,
    Countries,
    CountryRecord,
};

use super::{
    Catalogue,
    CatalogueEntry,
};

/// Short country names used by the app in addition to the dataset names.
const SHORT_COUNTRY_NAMES: &[(&str, &str)] = &[("USA", "USA"), ("GBR", "UK")];

fn country_comment(country: &CountryRecord) -> String {
    country.code.to_uppercase()
}

fn city_comment(country: &CountryRecord, city: &CityRecord) -> String {
    format!("{} {}", country.code.to_uppercase(), city.code.to_uppercase())
}

/// Build the relay location template: one untranslated entry per country and
/// per city, in relay list order.
///
/// A city sharing its name with an earlier entry is logged and dropped.
#[must_use]
pub fn emit_template(countries: &Countries) -> Catalogue {
    let mut catalogue = Catalogue::new();

    for country in countries {
        catalogue.append_or_log(CatalogueEntry::new(&country.name, "").with_comment(country_comment(country)));
        for city in country.cities() {
            catalogue.append_or_log(CatalogueEntry::new(&city.name, "").with_comment(city_comment(country, city)));
        }
    }

    tracing::debug!(entries = catalogue.len(), "Generated relay location template");
    catalogue
}

/// Build the relay location catalogue of `locale`.
///
/// Same ids and comments as [`emit_template`]; misses get an empty
/// translation and are counted.
#[must_use]
pub fn emit_relay_translations(
    countries: &Countries,
    translator: &PlaceTranslator,
    locale: &str,
) -> (Catalogue, TranslationStats) {
    let mut catalogue = Catalogue::new();
    let mut stats = TranslationStats::default();

    for country in countries {
        let translated = translator.translate_country(locale, &country.code);
        stats.record(translated.is_some());
        catalogue.append_or_log(
            CatalogueEntry::new(&country.name, translated.unwrap_or_default())
                .with_comment(country_comment(country)),
        );

        for city in country.cities() {
            let translated = translator.translate_city(locale, &country.code, &city.name);
            match &translated {
                Some(name) => tracing::debug!("{} ({}) -> \"{name}\"", city.name, city.code),
                None => tracing::debug!("{} ({}) -> untranslated", city.name, city.code),
            }
            stats.record(translated.is_some());
            catalogue.append_or_log(
                CatalogueEntry::new(&city.name, translated.unwrap_or_default())
                    .with_comment(city_comment(country, city)),
            );
        }
    }

    (catalogue, stats)
}

/// Localized name of a dataset feature, falling back to the English name.
///
/// Returns `(translation, found)`; `None` when the feature has no name at all.
fn localized_or_english(feature: &Feature, name_key: &str) -> Option<(String, bool)> {
    if let Some(translated) = feature.str_property(name_key) {
        return Some((translated.to_string(), true));
    }
    let name = feature.str_property("name")?;
    tracing::warn!("Missing translation for {name} under the {name_key} key");
    Some((name.to_string(), false))
}

/// Country names of `locale` from the admin-0 countries dataset.
///
/// Besides `name`, the formal name and the app's short names of the United
/// States and the United Kingdom map to the same translation. Sorted by id.
#[must_use]
pub fn emit_countries_catalogue(features: &[Feature], locale: &str, mapper: &LocaleMapper) -> Catalogue {
    let name_key = mapper.name_key(locale);
    let mut catalogue = Catalogue::new();

    for feature in features {
        let (Some(name), Some((translated, _))) =
            (feature.str_property("name"), localized_or_english(feature, &name_key))
        else {
            tracing::warn!("Skipping a country without a name ({locale})");
            continue;
        };

        catalogue.append_or_log(CatalogueEntry::new(name, translated.clone()));

        if let Some(formal_name) = feature.str_property("formal_en").filter(|formal| *formal != name) {
            catalogue.append_or_log(CatalogueEntry::new(formal_name, translated.clone()));
        }

        let iso_a3 = feature.str_property("iso_a3");
        for (code, short_name) in SHORT_COUNTRY_NAMES {
            if iso_a3 == Some(*code) {
                catalogue.append_or_log(CatalogueEntry::new(*short_name, translated.clone()));
            }
        }
    }

    catalogue.sort_by_message_id();
    catalogue
}

/// City names of `locale` for populated places with `pop_max >= population_min`.
///
/// Sorted by id; returns the hit/miss counts.
#[must_use]
pub fn emit_cities_catalogue(
    features: &[Feature],
    locale: &str,
    mapper: &LocaleMapper,
    population_min: u32,
) -> (Catalogue, TranslationStats) {
    let name_key = mapper.name_key(locale);
    let mut catalogue = Catalogue::new();
    let mut stats = TranslationStats::default();

    for feature in features.iter().filter(|feature| is_populous(feature, population_min)) {
        let (Some(name), Some((translated, found))) =
            (feature.str_property("name"), localized_or_english(feature, &name_key))
        else {
            tracing::warn!("Skipping a populated place without a name ({locale})");
            continue;
        };

        stats.record(found);
        catalogue.append_or_log(CatalogueEntry::new(name, translated));
    }

    catalogue.sort_by_message_id();
    (catalogue, stats)
}

/// Whether the feature's `pop_max` reaches `population_min`. Missing counts
/// as not populous.
#[must_use]
pub fn is_populous(feature: &Feature, population_min: u32) -> bool {
    feature.number_property("pop_max").is_some_and(|pop_max| pop_max >= f64::from(population_min))
}
