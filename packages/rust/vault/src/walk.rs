//! Vault discovery: walk a note tree and produce candidate Markdown paths.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use tracing::{debug, instrument, warn};

use quarry_shared::{QuarryError, Result};

/// Options for the vault walk.
#[derive(Debug, Clone, Default)]
pub struct DiscoverOptions {
    /// Glob patterns excluded from the walk (e.g. `node_modules/**`).
    pub ignore: Vec<String>,
}

/// Walk `root` and return every Markdown note beneath it, sorted.
///
/// Ignore patterns from the options are applied on top of the standard
/// filters (hidden entries and gitignore rules are skipped, which also
/// keeps `.obsidian/` out of the candidate set). An unreadable root is
/// fatal; unreadable entries below it are logged and skipped — a note
/// that cannot be *read* still surfaces later as a per-document failure
/// in the pipeline's read stage.
#[instrument(skip(opts), fields(root = %root.display()))]
pub fn discover(root: &Path, opts: &DiscoverOptions) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(QuarryError::walk(format!(
            "vault root {} is not a directory",
            root.display()
        )));
    }

    let mut overrides = OverrideBuilder::new(root);
    for pattern in &opts.ignore {
        // Override globs whitelist by default; "!" inverts to exclusion.
        overrides
            .add(&format!("!{pattern}"))
            .map_err(|e| QuarryError::config(format!("ignore pattern '{pattern}': {e}")))?;
    }
    let overrides = overrides
        .build()
        .map_err(|e| QuarryError::config(format!("ignore patterns: {e}")))?;

    let mut paths = Vec::new();
    for entry in WalkBuilder::new(root).overrides(overrides).build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable vault entry");
                continue;
            }
        };

        let is_file = entry.file_type().is_some_and(|t| t.is_file());
        if is_file && entry.path().extension().is_some_and(|ext| ext == "md") {
            paths.push(entry.into_path());
        }
    }

    // Deterministic order for the report; completion order stays unordered.
    paths.sort();
    debug!(count = paths.len(), "vault walk complete");

    Ok(paths)
}
