//! Output persistence seam.
//!
//! The pipeline's job ends at producing formatted text; writing it
//! anywhere is a separate, explicitly invoked step behind [`OutputSink`].
//! The default sink discards output, matching the reference behavior of
//! computing modules without persisting them.

use std::path::PathBuf;

use tracing::{debug, info};

use quarry_shared::{QuarryError, Result};

/// Destination for generated module text.
pub trait OutputSink: Send + Sync {
    /// Persist one generated module under its slug.
    fn persist(&self, slug: &str, text: &str) -> Result<()>;
}

/// Sink that discards output: modules are computed, never written.
pub struct NullSink;

impl OutputSink for NullSink {
    fn persist(&self, slug: &str, _text: &str) -> Result<()> {
        debug!(slug, "output discarded (null sink)");
        Ok(())
    }
}

/// Sink writing each module to `<root>/<slug>.tsx`.
pub struct DirSink {
    root: PathBuf,
}

impl DirSink {
    /// Create the sink, ensuring the output directory exists.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| QuarryError::io(&root, e))?;
        Ok(Self { root })
    }
}

impl OutputSink for DirSink {
    fn persist(&self, slug: &str, text: &str) -> Result<()> {
        let path = self.root.join(format!("{slug}.tsx"));
        std::fs::write(&path, text).map_err(|e| QuarryError::io(&path, e))?;
        info!(path = %path.display(), bytes = text.len(), "module written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_sink_writes_nothing() {
        NullSink.persist("intro", "export default 1\n").unwrap();
    }

    #[test]
    fn dir_sink_writes_slug_named_module() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirSink::new(dir.path().join("out")).unwrap();

        sink.persist("1-intro", "export default 1\n").unwrap();

        let written = std::fs::read_to_string(dir.path().join("out/1-intro.tsx")).unwrap();
        assert_eq!(written, "export default 1\n");
    }

    #[test]
    fn dir_sink_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        assert!(DirSink::new(&nested).is_ok());
        assert!(nested.is_dir());
    }
}
