// storefront/src/repos/users.rs

use super::UserRepo;
use crate::errors::{AppError, Result};
use crate::models::User;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{event, instrument, Level};
use uuid::Uuid;

const DUPLICATE_USER: &str = "User already exists";

pub struct PgUserRepo {
  pool: PgPool,
}

impl PgUserRepo {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl UserRepo for PgUserRepo {
  #[instrument(name = "users::create", skip(self, name, password_hash), fields(email = %email), err(Display))]
  async fn create(&self, name: &str, email: &str, password_hash: &str, is_admin: bool) -> Result<User> {
    let now = Utc::now();
    let inserted = sqlx::query_as::<_, User>(
      "INSERT INTO users (id, name, email, password_hash, is_admin, created_at, updated_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $6) \
       RETURNING id, name, email, password_hash, is_admin, created_at, updated_at",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(is_admin)
    .bind(now)
    .fetch_one(&self.pool)
    .await;

    match inserted {
      Ok(user) => Ok(user),
      Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
        event!(Level::WARN, "Email already registered.");
        Err(AppError::Validation(DUPLICATE_USER.to_string()))
      }
      Err(e) => Err(AppError::Sqlx(e)),
    }
  }

  async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
      "SELECT id, name, email, password_hash, is_admin, created_at, updated_at FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(&self.pool)
    .await?;
    Ok(user)
  }

  async fn find(&self, id: Uuid) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
      "SELECT id, name, email, password_hash, is_admin, created_at, updated_at FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;
    Ok(user)
  }
}

#[derive(Default)]
pub struct InMemoryUserRepo {
  users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepo {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl UserRepo for InMemoryUserRepo {
  async fn create(&self, name: &str, email: &str, password_hash: &str, is_admin: bool) -> Result<User> {
    let mut users = self.users.write();
    if users.values().any(|u| u.email == email) {
      return Err(AppError::Validation(DUPLICATE_USER.to_string()));
    }
    let now = Utc::now();
    let user = User {
      id: Uuid::new_v4(),
      name: name.to_string(),
      email: email.to_string(),
      password_hash: password_hash.to_string(),
      is_admin,
      created_at: now,
      updated_at: now,
    };
    users.insert(user.id, user.clone());
    Ok(user)
  }

  async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
    Ok(self.users.read().values().find(|u| u.email == email).cloned())
  }

  async fn find(&self, id: Uuid) -> Result<Option<User>> {
    Ok(self.users.read().get(&id).cloned())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn duplicate_email_is_rejected() {
    let repo = InMemoryUserRepo::new();
    let created = repo.create("Asha", "asha@example.com", "hash", false).await.unwrap();
    assert_eq!(repo.find_by_email("asha@example.com").await.unwrap().unwrap().id, created.id);

    let err = repo.create("Other", "asha@example.com", "hash2", false).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(ref m) if m == "User already exists"));
  }
}
