//! App locale identifiers and their reference dataset counterparts

use std::collections::HashMap;
use std::path::Path;

/// App locales whose dataset name differs from the generic rule.
///
/// `zh` in Natural Earth refers to simplified Chinese.
const LOCALE_OVERRIDES: &[(&str, &str)] = &[("zh-CN", "zh")];

/// Convert dashes to underscores (`en-US` -> `en_US`)
fn convert_locale_ident(locale_ident: &str) -> String {
    locale_ident.replace('-', "_")
}

/// Map an app locale to the dataset convention using the built-in overrides.
///
/// # Examples
/// ```
/// use relay_l10n::locale::map_locale;
///
/// assert_eq!(map_locale("zh-CN"), "zh");
/// assert_eq!(map_locale("en-US"), "en_US");
/// assert_eq!(map_locale("sv"), "sv");
/// ```
#[must_use]
pub fn map_locale(locale_ident: &str) -> String {
    LocaleMapper::default().map(locale_ident)
}

/// Locale mapper with the built-in overrides plus configured ones.
#[derive(Debug, Clone)]
pub struct LocaleMapper {
    overrides: HashMap<String, String>,
}

impl Default for LocaleMapper {
    fn default() -> Self {
        Self {
            overrides: LOCALE_OVERRIDES
                .iter()
                .map(|(from, to)| ((*from).to_string(), (*to).to_string()))
                .collect(),
        }
    }
}

impl LocaleMapper {
    /// Configured overrides take precedence over the built-in table.
    #[must_use]
    pub fn with_overrides(extra: &HashMap<String, String>) -> Self {
        let mut mapper = Self::default();
        mapper.overrides.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        mapper
    }

    #[must_use]
    pub fn map(&self, locale_ident: &str) -> String {
        let locale = self.overrides.get(locale_ident).map_or(locale_ident, String::as_str);
        convert_locale_ident(locale)
    }

    /// Dataset property holding the translated name, e.g. `name_de`.
    #[must_use]
    pub fn name_key(&self, locale_ident: &str) -> String {
        format!("name_{}", self.map(locale_ident))
    }
}

/// List the locales of an app locale tree (its immediate sub-directories).
///
/// Sorted so that runs are reproducible.
///
/// # Errors
/// Returns an error if the directory cannot be read.
pub fn discover_locales(locale_dir: &Path) -> std::io::Result<Vec<String>> {
    let mut locales = Vec::new();

    for entry in std::fs::read_dir(locale_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => locales.push(name),
            Err(name) => tracing::warn!("Skipping non UTF-8 locale directory {:?}", name),
        }
    }

    locales.sort();
    Ok(locales)
}
