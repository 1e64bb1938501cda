// storefront/src/models/mod.rs

//! Domain records exchanged between the stores, the flows and the HTTP layer.

pub mod order;
pub mod user;

pub use order::{
  GatewayCheckout, NewOrder, Order, OrderCreated, OrderItem, OrderOwner, OrderWithOwner, PaymentMethod, PaymentProof,
  PaymentResult, ShippingAddress,
};
pub use user::{AuthenticatedUser, Session, User, UserProfile};
