// storefront/src/web/handlers/mod.rs

pub mod auth_handlers;
pub mod order_handlers;
