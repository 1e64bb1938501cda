// storefront/src/repos/mod.rs

//! Persistence seams. Each store has a Postgres implementation and an
//! in-memory one with the same semantics.

pub mod orders;
pub mod users;

use crate::errors::Result;
use crate::models::{Order, PaymentResult, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub use orders::{InMemoryOrderRepo, PgOrderRepo};
pub use users::{InMemoryUserRepo, PgUserRepo};

#[async_trait]
pub trait OrderRepo: Send + Sync {
  /// Appends a new order; ids are never reused.
  async fn insert(&self, order: &Order) -> Result<Order>;

  async fn find(&self, id: Uuid) -> Result<Option<Order>>;

  /// The user's orders, newest first.
  async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Order>>;

  /// Flips `is_paid` from false to true together with `paid_at` and the
  /// payment result. Returns `None` when the order is missing or already paid,
  /// so concurrent confirmations settle exactly once.
  async fn mark_paid(&self, id: Uuid, result: &PaymentResult, paid_at: DateTime<Utc>) -> Result<Option<Order>>;
}

#[async_trait]
pub trait UserRepo: Send + Sync {
  /// Fails with a validation error when the email is taken.
  async fn create(&self, name: &str, email: &str, password_hash: &str, is_admin: bool) -> Result<User>;

  async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

  async fn find(&self, id: Uuid) -> Result<Option<User>>;
}
