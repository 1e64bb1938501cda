// storefront/src/services/mod.rs

pub mod account_service;
pub mod auth_service;
pub mod gateway;
pub mod order_service;
pub mod payment_mock;
