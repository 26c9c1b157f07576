//! `.po` / `.pot` file reading and writing through `polib`

use std::path::Path;

use polib::catalog::Catalog;
use polib::message::Message;
use polib::metadata::CatalogMetadata;
use polib::po_file;

use super::{
    Catalogue,
    CatalogueEntry,
    CatalogueError,
};

/// Header written to every generated catalogue.
pub const CONTENT_TYPE: &str = "text/plain; charset=utf-8";

fn metadata() -> CatalogMetadata {
    let mut metadata = CatalogMetadata::new();
    metadata.mime_version = "1.0".to_string();
    metadata.content_type = CONTENT_TYPE.to_string();
    metadata.content_transfer_encoding = "8bit".to_string();
    metadata
}

fn to_polib(catalogue: &Catalogue) -> Catalog {
    let mut catalog = Catalog::new(metadata());
    for entry in catalogue.entries() {
        // an empty comment writes no comment line
        let message = Message::build_singular()
            .with_msgid(entry.msgid.clone())
            .with_msgstr(entry.msgstr.clone())
            .with_comments(entry.comment.clone().unwrap_or_default())
            .done();
        catalog.append_or_update(message);
    }
    catalog
}

/// Strip the blank line polib writes before the header and the one after
/// the last message. `msgcat` writes neither.
fn canonical_layout(content: &str) -> &str {
    let content = content.strip_prefix('\n').unwrap_or(content);
    match content.strip_suffix('\n') {
        Some(rest) if rest.ends_with('\n') => rest,
        _ => content,
    }
}

/// Write `catalogue` to `path`, creating parent directories.
///
/// The file uses the layout `msgcat` produces, so merging it with itself
/// leaves the bytes unchanged.
pub fn write_catalogue(catalogue: &Catalogue, path: &Path) -> Result<(), CatalogueError> {
    let io_error = |source| CatalogueError::Io { path: path.to_path_buf(), source };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    po_file::write(&to_polib(catalogue), path).map_err(io_error)?;

    let written = std::fs::read_to_string(path).map_err(io_error)?;
    let canonical = canonical_layout(&written);
    if canonical.len() != written.len() {
        std::fs::write(path, canonical).map_err(io_error)?;
    }

    tracing::info!("Wrote {} entries to {}", catalogue.len(), path.display());
    Ok(())
}

/// Read the singular messages of a catalogue file in file order.
///
/// Plural messages are not produced by this tool and are skipped.
pub fn read_catalogue(path: &Path) -> Result<Catalogue, CatalogueError> {
    let catalog = po_file::parse(path)
        .map_err(|e| CatalogueError::Parse { path: path.to_path_buf(), message: e.to_string() })?;

    let mut catalogue = Catalogue::new();
    for message in catalog.messages() {
        let Ok(msgstr) = message.msgstr() else {
            tracing::debug!("Skipping plural message '{}' in {}", message.msgid(), path.display());
            continue;
        };
        let comments = message.comments();
        let mut entry = CatalogueEntry::new(message.msgid(), msgstr);
        if !comments.is_empty() {
            entry = entry.with_comment(comments);
        }
        catalogue.append_or_log(entry);
    }
    Ok(catalogue)
}
