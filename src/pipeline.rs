//! Offline dictionary maintenance: coverage, split and merge.
//!
//! Each operation reads its inputs fully, computes, and writes its output
//! once. Nothing is shared between runs.

pub mod coverage;
/// Pipeline error type
mod error;
pub mod json_edit;
pub mod merge;
pub mod split;

pub use coverage::{
    CoverageReport,
    LocaleCoverage,
    coverage_report,
};
pub use error::PipelineError;
pub use merge::{
    MergeMode,
    MergeOptions,
    MergeOutcome,
    MergeReport,
    merge_batch,
    merge_files,
};
pub use split::{
    Batch,
    split_batches,
    write_batches,
};
