//! Quarry core: the transform pipeline and its concurrency coordinator.
//!
//! [`TransformPipeline`] is the per-document chain of stages; [`runner`]
//! applies it across a discovered batch with bounded parallelism and
//! aggregates one outcome per document; [`sink`] is the explicit,
//! pluggable persistence seam.

pub mod pipeline;
pub mod runner;
pub mod sink;

pub use pipeline::TransformPipeline;
pub use runner::{
    DocumentOutcome, ProgressReporter, RunReport, SilentProgress, run_batch, run_pipeline,
};
pub use sink::{DirSink, NullSink, OutputSink};
