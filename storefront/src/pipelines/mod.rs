// storefront/src/pipelines/mod.rs

//! Defines and registers every flow the service runs.

use crate::errors::AppError;
use flow::Registry;

pub mod contexts;

pub mod order_pipeline;
pub mod payment_pipeline;
pub mod signin_pipeline;
pub mod signup_pipeline;

/// Registers all flows with `registry`. Called once while building `AppState`.
pub fn register_all_pipelines(registry: &Registry<AppError>) {
  order_pipeline::register_order_pipeline(registry);
  payment_pipeline::register_payment_pipeline(registry);
  signup_pipeline::register_signup_pipeline(registry);
  signin_pipeline::register_signin_pipeline(registry);
  tracing::info!("All application pipelines registered.");
}
