//! Error types for Quarry.
//!
//! Library crates use [`QuarryError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! `Read`, `Render`, `Format`, and `Task` are document-scoped: they are
//! collected into the run report, never propagated past the coordinator.
//! `Config` and `Walk` are fatal and abort the run before any document is
//! processed.

use std::path::PathBuf;

/// Top-level error type for all Quarry operations.
#[derive(Debug, thiserror::Error)]
pub enum QuarryError {
    /// A note file could not be read.
    #[error("read error at {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Markdown parsing or HTML rendering failed.
    #[error("render error: {message}")]
    Render { message: String },

    /// Generated module text is not syntactically valid for the formatter.
    #[error("format error: {message}")]
    Format { message: String },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Vault discovery could not walk the note tree.
    #[error("walk error: {message}")]
    Walk { message: String },

    /// A transform task aborted (panicked or was cancelled) before
    /// producing a result.
    #[error("task error: {message}")]
    Task { message: String },

    /// Filesystem I/O error outside the read stage (config, output sink).
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, QuarryError>;

impl QuarryError {
    /// Wrap a `std::io::Error` from the read stage with the note path.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Create a render error from any displayable message.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    /// Create a format error from any displayable message.
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format {
            message: msg.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a walk error from any displayable message.
    pub fn walk(msg: impl Into<String>) -> Self {
        Self::Walk {
            message: msg.into(),
        }
    }

    /// Create a task error from any displayable message.
    pub fn task(msg: impl Into<String>) -> Self {
        Self::Task {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error is scoped to a single document (collected into
    /// the run report) rather than fatal to the whole run.
    pub fn is_document_scoped(&self) -> bool {
        matches!(
            self,
            Self::Read { .. } | Self::Render { .. } | Self::Format { .. } | Self::Task { .. }
        )
    }
}
