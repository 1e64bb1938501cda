// src/core/control.rs

//! Flow-control signals returned by handlers and the outcome of a whole run.

/// Returned by a handler to let the pipeline go on or halt it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  Continue,
  /// Halt now. Remaining handlers of this step and all later steps are not run.
  Stop,
}

/// Outcome of a pipeline run that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  Completed,
  /// A handler returned `PipelineControl::Stop`.
  Stopped,
}
