//! The per-document transform pipeline:
//! read → render → derive identity → generate → fixup → format.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use quarry_shared::{ComponentConfig, DocumentIdentity, QuarryError, Result};
use quarry_vault::PermalinkIndex;

/// The ordered transform chain applied to each discovered note.
///
/// A pure function of (file content, permalink index, component config):
/// it produces formatted module text and performs no writes — persistence
/// is a separate, explicitly invoked [`crate::sink::OutputSink`] step.
/// The index is shared read-only across all concurrent invocations; every
/// intermediate representation is owned by the single invocation that
/// produced it.
#[derive(Debug, Clone)]
pub struct TransformPipeline {
    index: Arc<PermalinkIndex>,
    component: ComponentConfig,
}

impl TransformPipeline {
    /// Create a pipeline over an already-built permalink index.
    pub fn new(index: Arc<PermalinkIndex>, component: ComponentConfig) -> Self {
        Self { index, component }
    }

    /// Run all stages for one note, producing formatted module text.
    ///
    /// Each failure mode is document-scoped: `Read` when the path is
    /// unreadable, `Render` when the Markdown processor cannot recover,
    /// `Format` when generation produced text the formatter rejects.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn transform(&self, path: &Path) -> Result<String> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| QuarryError::read(path, e))?;

        let rendered = quarry_render::render(&raw, &self.index)?;
        let identity = DocumentIdentity::from_path(path);
        debug!(slug = %identity.slug, "identity derived");

        let module = quarry_template::generate(
            path,
            &identity,
            &rendered.frontmatter,
            &rendered.html,
            &self.component,
        );
        let fixed = quarry_template::fixup::run_pipeline(&module);

        quarry_template::format::format_module(path, &fixed)
    }
}
