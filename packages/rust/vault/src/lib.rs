//! Vault access for Quarry: note discovery and the permalink index.
//!
//! Both halves are the pipeline's external collaborators. [`discover`]
//! walks a note tree and produces the candidate Markdown paths, honoring
//! ignore patterns. [`PermalinkIndex`] is built once from those paths
//! before any document is processed and is read-only thereafter, so it is
//! safe to share across all concurrent pipeline invocations.

mod index;
mod walk;

pub use index::PermalinkIndex;
pub use walk::{DiscoverOptions, discover};
