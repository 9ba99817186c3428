//! Formatter boundary: final serialization through `dprint`.
//!
//! This is the last stage of the pipeline and doubles as validation that
//! template generation and the fixup passes produced syntactically valid
//! TSX. The formatter's internals are out of scope; only its
//! configuration and error mapping live here.

use std::path::Path;
use std::sync::LazyLock;

use dprint_plugin_typescript::configuration::{Configuration, ConfigurationBuilder, SemiColons};
use tracing::instrument;

use quarry_shared::{QuarryError, Result};

/// Formatter configuration for the generated modules: TSX, no trailing
/// semicolons.
static FORMAT_CONFIG: LazyLock<Configuration> =
    LazyLock::new(|| ConfigurationBuilder::new().semi_colons(SemiColons::Asi).build());

/// Format a generated module, or fail with a `Format` error when the text
/// is not valid TSX.
#[instrument(skip(text), fields(source = %source.display(), bytes = text.len()))]
pub fn format_module(source: &Path, text: &str) -> Result<String> {
    // The extension tells the formatter which grammar to parse.
    let tsx_path = source.with_extension("tsx");

    match dprint_plugin_typescript::format_text(&tsx_path, text, &FORMAT_CONFIG) {
        Ok(Some(formatted)) => Ok(formatted),
        // None means the input was already formatted.
        Ok(None) => Ok(text.to_string()),
        Err(e) => Err(QuarryError::format(format!("{}: {e}", source.display()))),
    }
}
