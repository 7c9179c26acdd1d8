//! Run summary types and helpers.

mod result;
mod run_summary;

pub use result::{FailureStage, ProcessingResult};
pub use run_summary::RunSummary;
