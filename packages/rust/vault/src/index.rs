//! The permalink index: note identifiers → canonical slugified routes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

/// Immutable mapping from note identifier to canonical route.
///
/// Built once at startup from the full note corpus and never mutated
/// afterward. Wiki-link targets resolve either by bare note name
/// (`[[Intro]]`) or by vault-relative path (`[[guides/Intro]]`), both
/// case-insensitively — Obsidian's shortest-path-wins convention.
#[derive(Debug, Default)]
pub struct PermalinkIndex {
    routes: HashMap<String, String>,
}

impl PermalinkIndex {
    /// Build the index from the discovered note paths.
    ///
    /// Routes are the vault-relative path with the extension stripped and
    /// each segment slugified. When two notes share an identifier, the
    /// first discovered note wins.
    #[instrument(skip_all, fields(root = %root.display(), notes = paths.len()))]
    pub fn build(root: &Path, paths: &[PathBuf]) -> Self {
        let mut routes = HashMap::new();

        for path in paths {
            let relative = path.strip_prefix(root).unwrap_or(path);
            let Some(stem) = relative.file_stem().map(|s| s.to_string_lossy()) else {
                continue;
            };

            let route = route_for(relative);
            let relative_key = normalize(&relative.with_extension("").to_string_lossy());

            for key in [normalize(&stem), relative_key] {
                if let Some(existing) = routes.get(&key) {
                    debug!(%key, %existing, "permalink collision, keeping first");
                    continue;
                }
                routes.insert(key, route.clone());
            }
        }

        debug!(entries = routes.len(), "permalink index built");
        Self { routes }
    }

    /// Resolve a wiki-link target to its canonical route, if known.
    pub fn resolve(&self, target: &str) -> Option<&str> {
        self.routes.get(&normalize(target)).map(String::as_str)
    }

    /// Number of distinct identifiers in the index.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the index holds no identifiers.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Canonical route for a vault-relative note path.
fn route_for(relative: &Path) -> String {
    let without_ext = relative.with_extension("");
    without_ext
        .components()
        .map(|c| slug::slugify(c.as_os_str().to_string_lossy()))
        .collect::<Vec<_>>()
        .join("/")
}

/// Normalize an identifier for case-insensitive lookup.
fn normalize(identifier: &str) -> String {
    identifier.trim().replace('\\', "/").to_lowercase()
}
