//! Core types used throughout the project.

use std::collections::HashMap;
use std::fmt;

/// Separator between the country and city codes of a relay location key.
pub const LOCATION_KEY_SEPARATOR: char = '-';

/// A relay location key such as `se-got`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationKey {
    pub country_code: String,
    pub city_code: String,
}

impl LocationKey {
    /// Parses `<country_code>-<city_code>`.
    ///
    /// Returns `None` unless the key contains exactly one separator with a
    /// non-empty code on each side.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split(LOCATION_KEY_SEPARATOR);
        let country_code = parts.next()?;
        let city_code = parts.next()?;

        if parts.next().is_some() || country_code.is_empty() || city_code.is_empty() {
            return None;
        }

        Some(Self { country_code: country_code.to_string(), city_code: city_code.to_string() })
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{LOCATION_KEY_SEPARATOR}{}", self.country_code, self.city_code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityRecord {
    pub code: String,
    pub name: String,
}

/// A country and its cities in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryRecord {
    pub code: String,
    pub name: String,
    cities: Vec<CityRecord>,
}

impl CountryRecord {
    #[must_use]
    pub const fn new(code: String, name: String) -> Self {
        Self { code, name, cities: Vec::new() }
    }

    #[must_use]
    pub fn cities(&self) -> &[CityRecord] {
        &self.cities
    }

    #[must_use]
    pub fn city(&self, code: &str) -> Option<&CityRecord> {
        self.cities.iter().find(|city| city.code == code)
    }

    /// Adds a city unless its code is already present.
    ///
    /// Returns the already stored record on conflict.
    pub(crate) fn insert_city(&mut self, code: &str, name: &str) -> Result<(), &CityRecord> {
        if let Some(index) = self.cities.iter().position(|city| city.code == code) {
            return self.cities.get(index).map_or(Ok(()), Err);
        }
        self.cities.push(CityRecord { code: code.to_string(), name: name.to_string() });
        Ok(())
    }
}

/// Countries keyed by code, iterated in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Countries {
    countries: Vec<CountryRecord>,
    positions: HashMap<String, usize>,
}

impl Countries {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CountryRecord> {
        self.countries.iter()
    }

    #[must_use]
    pub fn get(&self, code: &str) -> Option<&CountryRecord> {
        self.positions.get(code).and_then(|&index| self.countries.get(index))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.countries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Total number of cities across all countries.
    #[must_use]
    pub fn city_count(&self) -> usize {
        self.countries.iter().map(|country| country.cities.len()).sum()
    }

    /// Returns the country for `code`, inserting it with `name` when unseen.
    ///
    /// The name of an already known country is never replaced.
    pub(crate) fn get_or_insert(&mut self, code: &str, name: &str) -> &mut CountryRecord {
        let index = match self.positions.get(code) {
            Some(&index) => index,
            None => {
                self.countries.push(CountryRecord::new(code.to_string(), name.to_string()));
                let index = self.countries.len() - 1;
                self.positions.insert(code.to_string(), index);
                index
            }
        };

        // positions always point into countries
        #[allow(clippy::indexing_slicing)]
        &mut self.countries[index]
    }
}

impl<'a> IntoIterator for &'a Countries {
    type Item = &'a CountryRecord;
    type IntoIter = std::slice::Iter<'a, CountryRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.countries.iter()
    }
}
