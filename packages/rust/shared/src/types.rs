//! Core domain types for Quarry documents.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Separator in the `"<ordinal> - <title>"` note-naming convention.
const ORDINAL_SEPARATOR: &str = " - ";

/// Parsed frontmatter: an ordered string-keyed map of JSON-compatible values.
///
/// Ordering is preserved (`serde_json` with `preserve_order`) so the
/// generated `DATA` constant serializes keys in authoring order.
pub type Frontmatter = serde_json::Map<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// DocumentIdentity
// ---------------------------------------------------------------------------

/// Identity derived from a note's file path: the exported slug plus the
/// display title and optional ordinal rendered in the header block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentIdentity {
    /// URL-safe identifier: last path segment, extension stripped, slugified.
    pub slug: String,
    /// Display title.
    pub title: String,
    /// Ordinal prefix, when the base name follows `"<ordinal> - <title>"`.
    pub ordinal: Option<String>,
}

impl DocumentIdentity {
    /// Derive the identity from a note path.
    ///
    /// Only the first `" - "` in the base name splits ordinal from title;
    /// further occurrences stay part of the title.
    pub fn from_path(path: &Path) -> Self {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (title, ordinal) = match stem.split_once(ORDINAL_SEPARATOR) {
            Some((ordinal, title)) => (title.to_string(), Some(ordinal.to_string())),
            None => (stem.clone(), None),
        };

        Self {
            slug: slug::slugify(&stem),
            title,
            ordinal,
        }
    }
}

// ---------------------------------------------------------------------------
// RenderedDocument
// ---------------------------------------------------------------------------

/// Output of the parse & render stage: the HTML body plus the frontmatter
/// extracted from the top of the note.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    /// Rendered HTML body (frontmatter excluded).
    pub html: String,
    /// Extracted frontmatter mapping; empty when the note has none.
    pub frontmatter: Frontmatter,
}
