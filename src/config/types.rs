use std::collections::HashMap;
use std::path::{
    Path,
    PathBuf,
};

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "tools.msgcat")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Configuration file not found: {}", .0.display())]
    NotFound(std::path::PathBuf),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct L10nSettings {
    /// Application locale tree; one sub-directory per locale.
    pub locale_dir: String,
    /// Where generated artifacts are written before integration.
    pub output_dir: String,
    /// Directory holding `<dataset>/<dataset>.shp`.
    pub dataset_dir: String,
    /// Application asset directory receiving the geo JSON artifacts.
    pub asset_dir: String,

    pub relay_list_url: String,

    /// Minimum `pop_max` for a city to be extracted.
    pub population_min: u32,

    /// Extra app locale -> dataset locale overrides, e.g. `{"zh-TW": "zh_TW"}`.
    pub locale_overrides: HashMap<String, String>,

    /// Country whose city names carry a `", <state>"` suffix.
    pub jurisdiction_country: String,

    pub tools: ToolsConfig,

    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolsConfig {
    pub msgcat: String,
    pub geo2topo: String,
    /// Value passed to `geo2topo -q`.
    pub quantization: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            msgcat: "msgcat".to_string(),
            geo2topo: "geo2topo".to_string(),
            quantization: "1e5".to_string(),
        }
    }
}

/// Settings paths resolved against the working root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub locale_dir: PathBuf,
    pub output_dir: PathBuf,
    /// `<output_dir>/locales`
    pub locale_output_dir: PathBuf,
    pub dataset_dir: PathBuf,
    pub asset_dir: PathBuf,
}

impl L10nSettings {
    /// # Errors
    /// - Required field is empty
    /// - Invalid URL scheme
    /// - Zero timeout
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        let paths = [
            ("localeDir", &self.locale_dir),
            ("outputDir", &self.output_dir),
            ("datasetDir", &self.dataset_dir),
            ("assetDir", &self.asset_dir),
        ];
        for (field, value) in paths {
            if value.trim().is_empty() {
                errors.push(ValidationError::new(
                    field,
                    "The path cannot be empty. Please specify a directory relative to the root",
                ));
            }
        }

        if self.relay_list_url.is_empty() {
            errors.push(ValidationError::new(
                "relayListUrl",
                "The URL cannot be empty. Example: \"https://api.mullvad.net/app/v1/relays\"",
            ));
        } else if !self.relay_list_url.starts_with("http://")
            && !self.relay_list_url.starts_with("https://")
        {
            errors.push(ValidationError::new(
                "relayListUrl",
                format!("Unsupported URL '{}': expected http:// or https://", self.relay_list_url),
            ));
        }

        for (locale, mapped) in &self.locale_overrides {
            if locale.is_empty() || mapped.is_empty() {
                errors.push(ValidationError::new(
                    format!("localeOverrides.{locale}"),
                    "Locale overrides cannot contain empty identifiers",
                ));
            }
        }

        if self.jurisdiction_country.len() != 2 {
            errors.push(ValidationError::new(
                "jurisdictionCountry",
                format!(
                    "Expected a two-letter country code, got '{}'",
                    self.jurisdiction_country
                ),
            ));
        }

        let tools = [
            ("tools.msgcat", &self.tools.msgcat),
            ("tools.geo2topo", &self.tools.geo2topo),
            ("tools.quantization", &self.tools.quantization),
        ];
        for (field, value) in tools {
            if value.is_empty() {
                errors.push(ValidationError::new(field, "The value cannot be empty"));
            }
        }

        if self.request_timeout_secs == 0 {
            errors.push(ValidationError::new(
                "requestTimeoutSecs",
                "The timeout must be at least 1 second",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Resolves the configured directories against `root`.
    #[must_use]
    pub fn resolve(&self, root: &Path) -> ResolvedPaths {
        let output_dir = root.join(&self.output_dir);
        ResolvedPaths {
            locale_dir: root.join(&self.locale_dir),
            locale_output_dir: output_dir.join("locales"),
            output_dir,
            dataset_dir: root.join(&self.dataset_dir),
            asset_dir: root.join(&self.asset_dir),
        }
    }
}

impl Default for L10nSettings {
    fn default() -> Self {
        Self {
            locale_dir: "gui/locales".to_string(),
            output_dir: "gui/scripts/out".to_string(),
            dataset_dir: "gui/scripts".to_string(),
            asset_dir: "gui/assets/geo".to_string(),
            relay_list_url: "https://api.mullvad.net/app/v1/relays".to_string(),
            population_min: 50_000,
            locale_overrides: HashMap::new(),
            jurisdiction_country: "us".to_string(),
            tools: ToolsConfig::default(),
            request_timeout_secs: 30,
        }
    }
}
