// src/pipeline/mod.rs

//! The `Pipeline` struct: definition, handler registration and execution.

pub mod definition;
pub mod execution;
pub mod hooks;

pub use definition::Pipeline;
pub use hooks::Phase;
