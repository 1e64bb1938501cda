// storefront/src/lib.rs

//! Storefront order placement and payment verification.
//!
//! The server side (`web`, `services`, `pipelines`, `repos`) and the checkout
//! client (`client`) live in one crate so the client can be tested against a
//! real server in-process.

pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod repos;
pub mod services;
pub mod state;
pub mod web;

pub use errors::{AppError, Result};
pub use state::AppState;
