//! Copy generated artifacts into the app's tree

use std::path::PathBuf;

use thiserror::Error;

use crate::catalogue::merge::copy_file;
use crate::catalogue::{
    MergeError,
    MergeOutcome,
    merge_catalogues,
};
use crate::config::{
    ResolvedPaths,
    ToolsConfig,
};
use crate::indexer::{
    IndexerError,
    find_files,
};
use crate::process::CommandRunner;

/// Geo artifacts at the top of the output directory.
const ASSET_PATTERNS: &[&str] = &["*.json"];
/// Per-locale catalogues, relative to the locale output directory.
const CATALOGUE_PATTERNS: &[&str] = &["*/*.po"];
/// Templates, relative to the locale output directory.
const TEMPLATE_PATTERNS: &[&str] = &["*.pot"];

#[derive(Error, Debug)]
pub enum IntegrateError {
    #[error(transparent)]
    Indexer(#[from] IndexerError),
    #[error(transparent)]
    Merge(#[from] MergeError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrationSummary {
    /// Assets copied into the asset directory.
    pub assets: Vec<PathBuf>,
    /// Merge result per app catalogue.
    pub catalogues: Vec<(PathBuf, MergeOutcome)>,
}

impl IntegrationSummary {
    #[must_use]
    pub fn failed_merges(&self) -> usize {
        self.catalogues.iter().filter(|(_, outcome)| matches!(outcome, MergeOutcome::Failed { .. })).count()
    }
}

/// Copy the geo artifacts to the asset directory and merge the generated
/// catalogues into the app's locale tree.
pub fn integrate(
    paths: &ResolvedPaths,
    tools: &ToolsConfig,
    runner: &dyn CommandRunner,
) -> Result<IntegrationSummary, IntegrateError> {
    let mut summary = IntegrationSummary::default();

    for source in find_files(&paths.output_dir, ASSET_PATTERNS)? {
        let Some(file_name) = source.file_name() else { continue };
        let destination = paths.asset_dir.join(file_name);
        copy_file(&source, &destination)?;
        tracing::info!("Copied {} to {}", source.display(), destination.display());
        summary.assets.push(destination);
    }

    let mut generated = find_files(&paths.locale_output_dir, CATALOGUE_PATTERNS)?;
    generated.extend(find_files(&paths.locale_output_dir, TEMPLATE_PATTERNS)?);

    for source in generated {
        let Ok(relative_path) = source.strip_prefix(&paths.locale_output_dir) else { continue };
        let destination = paths.locale_dir.join(relative_path);
        let outcome = merge_catalogues(runner, &tools.msgcat, &destination, &source)?;
        summary.catalogues.push((destination, outcome));
    }

    if summary.failed_merges() > 0 {
        tracing::warn!("{} catalogue merges failed", summary.failed_merges());
    }
    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;
    use std::path::Path;

    use googletest::prelude::*;
    use tempfile::TempDir;

    use super::*;
    use crate::config::L10nSettings;
    use crate::test_utils::FakeCommandRunner;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[googletest::test]
    fn test_integrate_copies_assets_and_merges_catalogues() {
        let temp_dir = TempDir::new().unwrap();
        let paths = L10nSettings::default().resolve(temp_dir.path());
        write(&paths.output_dir.join("cities.json"), "{}");
        write(&paths.output_dir.join("geometry.json"), "{}");
        write(&paths.output_dir.join("notes.txt"), "");
        write(&paths.locale_output_dir.join("relay-locations.pot"), "");
        write(&paths.locale_output_dir.join("de").join("cities.po"), "");
        write(&paths.locale_output_dir.join("de").join("countries.po"), "");
        write(&paths.locale_dir.join("de").join("cities.po"), "");
        let runner = FakeCommandRunner::new();

        let summary = integrate(&paths, &ToolsConfig::default(), &runner).unwrap();

        expect_that!(summary.assets.len(), eq(2));
        expect_that!(paths.asset_dir.join("cities.json").is_file(), eq(true));
        expect_that!(paths.asset_dir.join("notes.txt").exists(), eq(false));

        let outcomes: Vec<(PathBuf, MergeOutcome)> = summary.catalogues.clone();
        expect_that!(
            outcomes,
            unordered_elements_are![
                eq(&(paths.locale_dir.join("de").join("cities.po"), MergeOutcome::Merged)),
                eq(&(paths.locale_dir.join("de").join("countries.po"), MergeOutcome::Copied)),
                eq(&(paths.locale_dir.join("relay-locations.pot"), MergeOutcome::Copied)),
            ]
        );
        expect_that!(runner.calls().len(), eq(1));
        expect_that!(summary.failed_merges(), eq(0));
    }

    #[googletest::test]
    fn test_integrate_without_output_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = L10nSettings::default().resolve(temp_dir.path());

        let result = integrate(&paths, &ToolsConfig::default(), &FakeCommandRunner::new());

        expect_that!(matches!(result, Err(IntegrateError::Indexer(_))), eq(true));
    }
}
