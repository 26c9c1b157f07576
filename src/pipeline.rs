//! Orchestration of the relay, geo and integration runs

use std::path::PathBuf;

use thiserror::Error;

use crate::catalogue::{
    CatalogueError,
    emit_cities_catalogue,
    emit_countries_catalogue,
    emit_relay_translations,
    emit_template,
    write_catalogue,
};
use crate::config::{
    L10nSettings,
    ResolvedPaths,
};
use crate::geo::{
    GeoError,
    extract_cities,
    extract_countries,
    extract_topology,
    write_json,
};
use crate::http::{
    FetchError,
    HttpClient,
};
use crate::indexer::{
    build_country_index,
    build_index,
};
use crate::input::dataset::{
    DatasetError,
    DatasetReader,
};
use crate::integrate::{
    IntegrateError,
    IntegrationSummary,
    integrate,
};
use crate::locale::{
    LocaleMapper,
    discover_locales,
};
use crate::process::CommandRunner;
use crate::relay::{
    StructureReport,
    fetch_relay_list,
    structure_locations,
};
use crate::stats::LocaleStats;
use crate::translator::PlaceTranslator;

/// Populated places used to translate relay cities.
pub const PLACES_INDEX_DATASET: &str = "ne_10m_populated_places";
/// Populated places for the map and the cities catalogue.
pub const CITIES_DATASET: &str = "ne_50m_populated_places";
pub const COUNTRIES_DATASET: &str = "ne_50m_admin_0_countries";
pub const STATE_LINES_DATASET: &str = "ne_50m_admin_1_states_provinces_lines";

pub const RELAY_TEMPLATE_FILE: &str = "relay-locations.pot";
pub const RELAY_CATALOGUE_FILE: &str = "relay-locations.po";
pub const COUNTRIES_CATALOGUE_FILE: &str = "countries.po";
pub const CITIES_CATALOGUE_FILE: &str = "cities.po";

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Catalogue(#[from] CatalogueError),
    #[error(transparent)]
    Geo(#[from] GeoError),
    #[error(transparent)]
    Integrate(#[from] IntegrateError),
    #[error("Failed to list locales in {path}: {source}")]
    Locales {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelaySummary {
    pub structure: StructureReport,
    pub countries: usize,
    pub cities: usize,
    pub template_entries: usize,
    pub locales: Vec<LocaleStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoSummary {
    /// `geo2topo` runs that exited unsuccessfully.
    pub topology_failures: usize,
    /// Cities catalogue statistics per locale.
    pub cities: Vec<LocaleStats>,
}

/// One run over the configured directories with injected collaborators.
///
/// Every step is a single linear pass; nothing is retried.
pub struct Pipeline<'a> {
    settings: &'a L10nSettings,
    paths: ResolvedPaths,
    reader: &'a dyn DatasetReader,
    http: &'a dyn HttpClient,
    runner: &'a dyn CommandRunner,
}

impl std::fmt::Debug for Pipeline<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline").field("settings", self.settings).field("paths", &self.paths).finish_non_exhaustive()
    }
}

impl<'a> Pipeline<'a> {
    #[must_use]
    pub const fn new(
        settings: &'a L10nSettings,
        paths: ResolvedPaths,
        reader: &'a dyn DatasetReader,
        http: &'a dyn HttpClient,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        Self { settings, paths, reader, http, runner }
    }

    fn mapper(&self) -> LocaleMapper {
        LocaleMapper::with_overrides(&self.settings.locale_overrides)
    }

    fn locales(&self) -> Result<Vec<String>, PipelineError> {
        discover_locales(&self.paths.locale_dir)
            .map_err(|source| PipelineError::Locales { path: self.paths.locale_dir.clone(), source })
    }

    fn locale_catalogue_path(&self, locale: &str, file_name: &str) -> PathBuf {
        self.paths.locale_output_dir.join(locale).join(file_name)
    }

    /// Fetch the relay list, write the template and one translated relay
    /// catalogue per app locale.
    ///
    /// The reference index is built once and reused for every locale.
    pub fn run_relays(&self) -> Result<RelaySummary, PipelineError> {
        let raw_locations = fetch_relay_list(self.http, &self.settings.relay_list_url)?;
        let (countries, structure) = structure_locations(&raw_locations);
        if structure.skipped > 0 || structure.duplicates > 0 {
            tracing::warn!(
                "Skipped {} malformed and {} duplicate relay locations",
                structure.skipped,
                structure.duplicates
            );
        }

        let template = emit_template(&countries);
        write_catalogue(&template, &self.paths.locale_output_dir.join(RELAY_TEMPLATE_FILE))?;

        let translator = PlaceTranslator::new(
            build_index(self.reader, PLACES_INDEX_DATASET)?,
            build_country_index(self.reader, COUNTRIES_DATASET)?,
            self.mapper(),
        )
        .with_jurisdiction_country(Some(self.settings.jurisdiction_country.clone()));

        let mut locales = Vec::new();
        for locale in self.locales()? {
            tracing::info!("Generating {locale}/{RELAY_CATALOGUE_FILE}");
            let (catalogue, stats) = emit_relay_translations(&countries, &translator, &locale);
            write_catalogue(&catalogue, &self.locale_catalogue_path(&locale, RELAY_CATALOGUE_FILE))?;
            locales.push(LocaleStats::new(locale, stats));
        }

        Ok(RelaySummary {
            structure,
            countries: countries.len(),
            cities: countries.city_count(),
            template_entries: template.len(),
            locales,
        })
    }

    /// Write the map artifacts and the per-locale countries and cities
    /// catalogues.
    pub fn run_geo(&self) -> Result<GeoSummary, PipelineError> {
        let population_min = self.settings.population_min;
        let cities = self.reader.read_features(CITIES_DATASET)?;
        let countries = self.reader.read_features(COUNTRIES_DATASET)?;
        let state_lines = self.reader.read_features(STATE_LINES_DATASET)?;

        let output_dir = &self.paths.output_dir;
        write_json(&extract_cities(&cities, population_min), &output_dir.join("cities.json"))?;
        write_json(&extract_countries(&countries), &output_dir.join("countries.json"))?;

        let mut summary = GeoSummary::default();
        let tools = &self.settings.tools;
        for (features, file_name) in [(&countries, "geometry.json"), (&state_lines, "states-provinces-lines.json")] {
            if !extract_topology(self.runner, tools, features, &output_dir.join(file_name))? {
                summary.topology_failures += 1;
            }
        }

        let mapper = self.mapper();
        for locale in self.locales()? {
            tracing::info!("Generating {locale}/{COUNTRIES_CATALOGUE_FILE}");
            let catalogue = emit_countries_catalogue(&countries, &locale, &mapper);
            write_catalogue(&catalogue, &self.locale_catalogue_path(&locale, COUNTRIES_CATALOGUE_FILE))?;

            tracing::info!("Generating {locale}/{CITIES_CATALOGUE_FILE}");
            let (catalogue, stats) = emit_cities_catalogue(&cities, &locale, &mapper, population_min);
            write_catalogue(&catalogue, &self.locale_catalogue_path(&locale, CITIES_CATALOGUE_FILE))?;
            summary.cities.push(LocaleStats::new(locale, stats));
        }

        Ok(summary)
    }

    /// Copy and merge the generated artifacts into the app.
    pub fn run_integrate(&self) -> Result<IntegrationSummary, PipelineError> {
        Ok(integrate(&self.paths, &self.settings.tools, self.runner)?)
    }
}
