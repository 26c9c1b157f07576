//! Merging generated catalogues into the app's catalogues with `msgcat`

use std::path::Path;

use crate::process::{
    CommandError,
    CommandRunner,
};

/// Result of merging one catalogue. Tool failures are not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// No existing catalogue; the generated one was copied into place.
    Copied,
    /// Merged with the existing catalogue taking precedence.
    Merged,
    /// The merge tool exited unsuccessfully; the existing file is untouched
    /// as far as this tool is concerned.
    Failed { status: Option<i32>, stderr: String },
}

#[derive(thiserror::Error, Debug)]
pub enum MergeError {
    #[error("Failed to copy {from} to {to}: {source}")]
    Copy {
        from: String,
        to: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Command(#[from] CommandError),
}

/// `msgcat` arguments merging `generated` into `existing`, keeping the
/// existing translation of every id both contain.
#[must_use]
pub fn merge_arguments(existing: &Path, generated: &Path) -> Vec<String> {
    let existing = existing.display().to_string();
    vec![
        existing.clone(),
        generated.display().to_string(),
        "--output-file".to_string(),
        existing,
        "--use-first".to_string(),
        "--sort-output".to_string(),
        "--no-wrap".to_string(),
    ]
}

/// Merge `generated` into `existing`.
///
/// A missing `existing` is created by copying. A nonzero exit of `program`
/// is logged and reported as [`MergeOutcome::Failed`]; only failing to run
/// it at all is an error.
pub fn merge_catalogues(
    runner: &dyn CommandRunner,
    program: &str,
    existing: &Path,
    generated: &Path,
) -> Result<MergeOutcome, MergeError> {
    if !existing.exists() {
        copy_file(generated, existing)?;
        tracing::info!("Copied {} to {}", generated.display(), existing.display());
        return Ok(MergeOutcome::Copied);
    }

    let output = runner.run(program, &merge_arguments(existing, generated), None)?;
    if output.success() {
        tracing::info!("Merged {} into {}", generated.display(), existing.display());
        Ok(MergeOutcome::Merged)
    } else {
        tracing::error!(
            "{program} exited with {:?} while merging {}: {}",
            output.status,
            existing.display(),
            output.stderr.trim()
        );
        Ok(MergeOutcome::Failed { status: output.status, stderr: output.stderr })
    }
}

/// Copy `from` to `to`, creating the parent directories of `to`.
pub(crate) fn copy_file(from: &Path, to: &Path) -> Result<(), MergeError> {
    let copy_error = |source| MergeError::Copy {
        from: from.display().to_string(),
        to: to.display().to_string(),
        source,
    };
    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent).map_err(copy_error)?;
    }
    std::fs::copy(from, to).map_err(copy_error)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use tempfile::TempDir;

    use super::*;
    use crate::catalogue::{
        Catalogue,
        CatalogueEntry,
        read_catalogue,
        write_catalogue,
    };
    use crate::process::{
        CommandOutput,
        SystemCommandRunner,
    };
    use crate::test_utils::{
        FakeCommandRunner,
        msgcat_available,
    };

    #[googletest::test]
    fn test_merge_arguments() {
        let args = merge_arguments(Path::new("app/de/cities.po"), Path::new("out/de/cities.po"));

        expect_that!(
            args,
            elements_are![
                eq("app/de/cities.po"),
                eq("out/de/cities.po"),
                eq("--output-file"),
                eq("app/de/cities.po"),
                eq("--use-first"),
                eq("--sort-output"),
                eq("--no-wrap"),
            ]
        );
    }

    #[googletest::test]
    fn test_missing_existing_is_copied_without_running_the_tool() {
        let temp_dir = TempDir::new().unwrap();
        let generated = temp_dir.path().join("out.po");
        let existing = temp_dir.path().join("app").join("de").join("cities.po");
        fs::write(&generated, "msgid \"Vienna\"\nmsgstr \"Wien\"\n").unwrap();
        let runner = FakeCommandRunner::new();

        let outcome = merge_catalogues(&runner, "msgcat", &existing, &generated).unwrap();

        expect_that!(outcome, eq(&MergeOutcome::Copied));
        expect_that!(fs::read_to_string(&existing).unwrap(), contains_substring("Wien"));
        expect_that!(runner.calls().len(), eq(0));
    }

    #[googletest::test]
    fn test_existing_is_merged_with_the_tool() {
        let temp_dir = TempDir::new().unwrap();
        let generated = temp_dir.path().join("out.po");
        let existing = temp_dir.path().join("app.po");
        fs::write(&generated, "").unwrap();
        fs::write(&existing, "").unwrap();
        let runner = FakeCommandRunner::new();

        let outcome = merge_catalogues(&runner, "msgcat-custom", &existing, &generated).unwrap();

        expect_that!(outcome, eq(&MergeOutcome::Merged));
        let calls = runner.calls();
        expect_that!(calls.len(), eq(1));
        expect_that!(calls.first().map(|call| call.program.clone()), some(eq("msgcat-custom")));
    }

    #[googletest::test]
    fn test_tool_failure_is_not_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let generated = temp_dir.path().join("out.po");
        let existing = temp_dir.path().join("app.po");
        fs::write(&generated, "").unwrap();
        fs::write(&existing, "broken").unwrap();
        let runner = FakeCommandRunner::new().with_output(CommandOutput {
            status: Some(1),
            stdout: String::new(),
            stderr: "app.po:1: syntax error\n".to_string(),
        });

        let outcome = merge_catalogues(&runner, "msgcat", &existing, &generated).unwrap();

        expect_that!(
            outcome,
            eq(&MergeOutcome::Failed { status: Some(1), stderr: "app.po:1: syntax error\n".to_string() })
        );
        expect_that!(fs::read_to_string(&existing).unwrap(), eq("broken"));
    }

    #[googletest::test]
    fn test_generated_entries_fill_gaps_only() {
        if !msgcat_available() {
            return;
        }
        let temp_dir = TempDir::new().unwrap();
        let existing = temp_dir.path().join("app.po");
        let generated = temp_dir.path().join("out.po");
        let mut app = Catalogue::new();
        app.append(CatalogueEntry::new("Malmö", "Malmø")).unwrap();
        write_catalogue(&app, &existing).unwrap();
        let mut fresh = Catalogue::new();
        fresh.append(CatalogueEntry::new("Malmö", "Malmö")).unwrap();
        fresh.append(CatalogueEntry::new("Aarhus", "Aarhus")).unwrap();
        write_catalogue(&fresh, &generated).unwrap();

        let outcome = merge_catalogues(&SystemCommandRunner, "msgcat", &existing, &generated).unwrap();

        expect_that!(outcome, eq(&MergeOutcome::Merged));
        let merged = read_catalogue(&existing).unwrap();
        let ids: Vec<String> = merged.message_ids().map(str::to_string).collect();
        expect_that!(ids, elements_are![eq("Aarhus"), eq("Malmö")]);
        expect_that!(merged.get("Malmö").map(|e| e.msgstr.clone()), some(eq("Malmø")));
    }

    #[googletest::test]
    fn test_self_merge_of_written_catalogue_keeps_bytes() {
        if !msgcat_available() {
            return;
        }
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("de").join("countries.po");
        let mut catalogue = Catalogue::new();
        for (id, translation) in [("Austria", "Österreich"), ("Sweden", "Schweden"), ("Uruguay", "")] {
            catalogue.append(CatalogueEntry::new(id, translation)).unwrap();
        }
        write_catalogue(&catalogue, &path).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        let outcome = merge_catalogues(&SystemCommandRunner, "msgcat", &path, &path).unwrap();

        expect_that!(outcome, eq(&MergeOutcome::Merged));
        pretty_assertions::assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }
}
