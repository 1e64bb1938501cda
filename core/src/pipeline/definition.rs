// src/pipeline/definition.rs

//! The `Pipeline<TData, Err>` struct and its construction.

use crate::core::handler::Handler;
use crate::core::step::{SkipCondition, StepDef};
use crate::error::FlowError;
use std::collections::HashMap;
use std::sync::Arc;

/// An ordered set of named steps over a root context `TData`.
///
/// Handlers return `Result<_, Err>`. `Err` must absorb engine failures
/// (`From<FlowError>`), e.g. a non-optional step left without handlers.
pub struct Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub(crate) steps: Vec<StepDef<TData>>,
  pub(crate) before_hooks: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) on_hooks: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) after_hooks: HashMap<String, Vec<Handler<TData, Err>>>,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Creates a pipeline from `(name, optional, skip_if)` step definitions.
  pub fn new(step_defs: &[(&str, bool, Option<SkipCondition<TData>>)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(name, optional, skip_if)| StepDef {
        name: (*name).to_string(),
        optional: *optional,
        skip_if: skip_if.clone(),
      })
      .collect();

    Self {
      steps,
      before_hooks: HashMap::new(),
      on_hooks: HashMap::new(),
      after_hooks: HashMap::new(),
    }
  }

  /// Step names in execution order.
  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  /// Attaches (or replaces) the skip condition of an existing step.
  pub fn skip_step_if(&mut self, step_name: &str, condition: impl Fn(&TData) -> bool + Send + Sync + 'static) {
    let step = self.step_mut(step_name);
    step.skip_if = Some(Arc::new(condition));
  }

  fn step_mut(&mut self, step_name: &str) -> &mut StepDef<TData> {
    match self.steps.iter_mut().find(|s| s.name == step_name) {
      Some(step) => step,
      // Typo in a step name is a wiring bug, not a runtime condition.
      None => panic!("Flow setup error: step '{}' not found in pipeline definition.", step_name),
    }
  }

  pub(crate) fn ensure_step_exists(&self, step_name: &str) {
    if !self.steps.iter().any(|s| s.name == step_name) {
      panic!("Flow setup error: step '{}' not found in pipeline definition.", step_name);
    }
  }
}
