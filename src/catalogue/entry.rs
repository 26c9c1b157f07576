//! In-memory gettext catalogue

use std::collections::HashSet;

use super::CatalogueError;

/// A singular catalogue message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueEntry {
    pub msgid: String,
    pub msgstr: String,
    /// Extracted comment, e.g. `SE GOT`.
    pub comment: Option<String>,
}

impl CatalogueEntry {
    #[must_use]
    pub fn new(msgid: impl Into<String>, msgstr: impl Into<String>) -> Self {
        Self { msgid: msgid.into(), msgstr: msgstr.into(), comment: None }
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Ordered catalogue rejecting duplicate message ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalogue {
    entries: Vec<CatalogueEntry>,
    ids: HashSet<String>,
}

impl Catalogue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `entry`, refusing a message id that is already present.
    pub fn append(&mut self, entry: CatalogueEntry) -> Result<(), CatalogueError> {
        if self.ids.contains(&entry.msgid) {
            return Err(CatalogueError::Duplicate(entry.msgid));
        }
        self.ids.insert(entry.msgid.clone());
        self.entries.push(entry);
        Ok(())
    }

    /// Like [`Catalogue::append`], but a duplicate is logged and dropped.
    ///
    /// Returns whether the entry was added.
    pub fn append_or_log(&mut self, entry: CatalogueEntry) -> bool {
        match self.append(entry) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Cannot add an entry: {e}");
                false
            }
        }
    }

    #[must_use]
    pub fn contains(&self, msgid: &str) -> bool {
        self.ids.contains(msgid)
    }

    #[must_use]
    pub fn get(&self, msgid: &str) -> Option<&CatalogueEntry> {
        self.entries.iter().find(|entry| entry.msgid == msgid)
    }

    #[must_use]
    pub fn entries(&self) -> &[CatalogueEntry] {
        &self.entries
    }

    pub fn message_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.msgid.as_str())
    }

    /// Sort by message id, byte-wise.
    pub fn sort_by_message_id(&mut self) {
        self.entries.sort_by(|a, b| a.msgid.cmp(&b.msgid));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
