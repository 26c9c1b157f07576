//! Place name translation through the reference dataset indexes

use serde_json::Value;

use crate::indexer::{
    CountryIndex,
    PlaceIndex,
};
use crate::input::dataset::Properties;
use crate::locale::LocaleMapper;

/// Translates English place names using the dataset's `name_<locale>` fields.
#[derive(Debug, Clone, Default)]
pub struct PlaceTranslator {
    places: PlaceIndex,
    countries: CountryIndex,
    mapper: LocaleMapper,
    /// Country whose city names end with `", <jurisdiction>"`.
    jurisdiction_country: Option<String>,
}

impl PlaceTranslator {
    #[must_use]
    pub fn new(places: PlaceIndex, countries: CountryIndex, mapper: LocaleMapper) -> Self {
        Self { places, countries, mapper, jurisdiction_country: Some("us".to_string()) }
    }

    #[must_use]
    pub fn with_jurisdiction_country(mut self, country_code: Option<String>) -> Self {
        self.jurisdiction_country = country_code.map(|code| code.to_lowercase());
        self
    }

    /// Look up `english_name` by name, parenthetical name or ASCII name.
    ///
    /// Returns `None` when there is no match or the match has no translation
    /// for `locale`.
    #[must_use]
    pub fn translate(&self, locale: &str, english_name: &str) -> Option<String> {
        let properties = self.places.get(english_name)?;
        self.localized_name(properties, locale, english_name)
    }

    /// Translate a country by its two-letter code.
    #[must_use]
    pub fn translate_country(&self, locale: &str, country_code: &str) -> Option<String> {
        let properties = self.countries.get(country_code)?;
        self.localized_name(properties, locale, country_code)
    }

    /// Translate a relay city name.
    ///
    /// Cities of the jurisdiction country are written `"City, XX"`; only the
    /// text before the first comma is looked up and the rest is put back
    /// untranslated.
    #[must_use]
    pub fn translate_city(&self, locale: &str, country_code: &str, city_name: &str) -> Option<String> {
        if self.jurisdiction_country.as_deref() != Some(country_code) {
            return self.translate(locale, city_name);
        }

        match city_name.split_once(',') {
            Some((city, suffix)) => {
                let translated = self.translate(locale, city.trim())?;
                let suffix = suffix.trim();
                if suffix.is_empty() {
                    Some(translated)
                } else {
                    Some(format!("{translated}, {suffix}"))
                }
            }
            None => self.translate(locale, city_name.trim()),
        }
    }

    fn localized_name(&self, properties: &Properties, locale: &str, source: &str) -> Option<String> {
        let name_key = self.mapper.name_key(locale);
        match properties.get(&name_key).and_then(Value::as_str) {
            Some(value) if !value.is_empty() => Some(value.to_string()),
            _ => {
                tracing::warn!("Missing translation for {source} ({locale}) under the {name_key} key");
                None
            }
        }
    }
}
