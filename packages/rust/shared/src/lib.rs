//! Shared types, error model, and configuration for Quarry.
//!
//! This crate is the foundation depended on by all other Quarry crates.
//! It provides:
//! - [`QuarryError`] — the unified error type
//! - Domain types ([`DocumentIdentity`], [`RenderedDocument`], [`Frontmatter`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ComponentConfig, DiscoveryConfig, OutputConfig, PipelineConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{QuarryError, Result};
pub use types::{DocumentIdentity, Frontmatter, RenderedDocument};
