//! Generated artifact discovery
use std::path::{
    Path,
    PathBuf,
};

use globset::{
    GlobBuilder,
    GlobSet,
    GlobSetBuilder,
};
use ignore::WalkBuilder;

use crate::indexer::types::IndexerError;

fn build_glob_set(patterns: &[&str]) -> Result<GlobSet, IndexerError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        // `*` must not cross directory boundaries
        let glob = GlobBuilder::new(pattern).literal_separator(true).build().map_err(|e| {
            IndexerError::InvalidPattern { pattern: (*pattern).to_string(), message: e.to_string() }
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| IndexerError::InvalidPattern {
        pattern: patterns.join(", "),
        message: e.to_string(),
    })
}

/// Find files under `root` whose root-relative path matches `include_patterns`.
///
/// Results are sorted so that integration runs in a stable order.
pub fn find_files(root: &Path, include_patterns: &[&str]) -> Result<Vec<PathBuf>, IndexerError> {
    if !root.is_dir() {
        return Err(IndexerError::InvalidPath(root.display().to_string()));
    }

    let include_set = build_glob_set(include_patterns)?;
    let mut found_files = Vec::new();

    // 生成物ディレクトリは .gitignore に含まれることが多いので ignore ルールは無効化
    for result in WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .ignore(false)
        .parents(false)
        .follow_links(false)
        .build()
    {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(?err, "Failed to read directory entry");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        let Ok(relative_path) = path.strip_prefix(root) else {
            continue;
        };
        if include_set.is_match(relative_path) {
            found_files.push(path.to_path_buf());
        }
    }

    found_files.sort();
    Ok(found_files)
}
