// src/lib.rs

//! Flow: async, type-safe step pipelines.
//!
//! The storefront expresses each multi-step operation (placing an order,
//! verifying a payment, signing up, signing in) as a `Pipeline` over a shared
//! context:
//!  - Named steps, run in declaration order, each with `before`/`on`/`after` hooks.
//!  - Async handlers that may stop the pipeline early or fail it with the
//!    pipeline's own error type.
//!  - Optional steps and per-step skip conditions evaluated against the context.
//!  - A `Registry` keyed by context type, so callers run a flow by handing over
//!    its context without naming the pipeline.
//!
//! Context data lives behind `ContextData<T>` (an `Arc<RwLock<T>>`). Handlers must
//! drop every lock guard before their next `.await`.

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;

pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::handler::Handler;
pub use crate::core::step::{SkipCondition, StepDef};

pub use crate::pipeline::definition::Pipeline;

pub use crate::error::{FlowError, FlowResult};

pub use crate::registry::Registry;
