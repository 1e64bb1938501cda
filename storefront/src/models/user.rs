// storefront/src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id: Uuid,
  pub name: String,
  pub email: String,
  #[serde(skip_serializing)] // Never send password hash to client
  pub password_hash: String,
  pub is_admin: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
  pub id: Uuid,
  pub name: String,
  pub email: String,
  pub is_admin: bool,
}

impl From<&User> for UserProfile {
  fn from(user: &User) -> Self {
    Self {
      id: user.id,
      name: user.name.clone(),
      email: user.email.clone(),
      is_admin: user.is_admin,
    }
  }
}

/// Register/login response: the profile plus the issued bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
  #[serde(flatten)]
  pub profile: UserProfile,
  pub token: String,
}

/// Caller identity resolved from a token for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
  pub user_id: Uuid,
  pub name: String,
  pub email: String,
  pub is_admin: bool,
}

impl From<&User> for Session {
  fn from(user: &User) -> Self {
    Self {
      user_id: user.id,
      name: user.name.clone(),
      email: user.email.clone(),
      is_admin: user.is_admin,
    }
  }
}
