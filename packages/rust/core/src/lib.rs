//! Pipeline orchestration and output export for coursesmith.
//!
//! [`pipeline::run`] wires the fetch, classification, aggregation, and
//! generation stages together and writes the result via [`export`].

pub mod export;
pub mod pipeline;

pub use export::export_markdown;
pub use pipeline::{
    AggregatedDocument, PipelineConfig, PipelineResult, ProgressReporter, SilentProgress,
    aggregate, run, truncate_chars,
};
