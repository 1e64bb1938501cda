// storefront/src/services/auth_service.rs

//! Password hashing and bearer token issuance.

use crate::errors::AppError;
use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};
use uuid::Uuid;

/// Token claims; `sub` is the user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
  pub sub: String,
  pub email: String,
  pub iat: usize,
  pub exp: usize,
}

/// Hashes a plain-text password using Argon2 with a fresh random salt.
#[instrument(name = "auth_service::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String, AppError> {
  if password.is_empty() {
    return Err(AppError::Validation("Password cannot be empty.".to_string()));
  }

  let salt = SaltString::generate(&mut OsRng);
  match Argon2::default().hash_password(password.as_bytes(), &salt) {
    Ok(hash) => {
      debug!("Password hashed successfully.");
      Ok(hash.to_string())
    }
    Err(argon_err) => {
      error!(error = %argon_err, "Argon2 password hashing failed.");
      Err(AppError::Internal(format!("Password hashing process failed: {}", argon_err)))
    }
  }
}

/// Returns `Ok(false)` on a plain mismatch; a corrupt stored hash is an internal error.
#[instrument(name = "auth_service::verify_password", skip_all, err(Display))]
pub fn verify_password(stored_hash: &str, provided_password: &str) -> Result<bool, AppError> {
  if provided_password.is_empty() {
    return Ok(false);
  }
  let parsed_hash = PasswordHash::new(stored_hash).map_err(|parse_err| {
    error!(error = %parse_err, "Failed to parse stored password hash string.");
    AppError::Internal(format!("Invalid stored password hash format: {}", parse_err))
  })?;

  match Argon2::default().verify_password(provided_password.as_bytes(), &parsed_hash) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => {
      debug!("Password verification failed: Passwords do not match.");
      Ok(false)
    }
    Err(other) => {
      error!(error = %other, "Argon2 password verification process encountered an error.");
      Err(AppError::Internal(format!("Password verification process failed: {}", other)))
    }
  }
}

/// Signs an HS256 token for `user_id` valid for `ttl_days`.
#[instrument(name = "auth_service::issue_token", skip(secret), err(Display))]
pub fn issue_token(user_id: Uuid, email: &str, secret: &str, ttl_days: i64) -> Result<String, AppError> {
  let now = Utc::now();
  let claims = Claims {
    sub: user_id.to_string(),
    email: email.to_string(),
    iat: now.timestamp() as usize,
    exp: (now + Duration::days(ttl_days)).timestamp() as usize,
  };
  jsonwebtoken::encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
    .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
}

/// Checks signature and expiry. Any failure is an authentication error.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AppError> {
  jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &Validation::default())
    .map(|data| data.claims)
    .map_err(|e| {
      debug!("JWT validation failed: {e}");
      AppError::Auth("Not authorized, token failed".to_string())
    })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_then_verify() {
    let hash = hash_password("correct horse").unwrap();
    assert_ne!(hash, "correct horse");
    assert!(verify_password(&hash, "correct horse").unwrap());
    assert!(!verify_password(&hash, "wrong horse").unwrap());
    assert!(!verify_password(&hash, "").unwrap());
  }

  #[test]
  fn corrupt_hash_is_internal_error() {
    assert!(matches!(verify_password("not-a-phc-string", "pw"), Err(AppError::Internal(_))));
  }

  #[test]
  fn token_carries_subject_and_email() {
    let user_id = Uuid::new_v4();
    let token = issue_token(user_id, "asha@example.com", "jwt-secret", 7).unwrap();
    let claims = decode_token(&token, "jwt-secret").unwrap();
    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.email, "asha@example.com");
    assert!(claims.exp > claims.iat);
  }

  #[test]
  fn token_with_wrong_secret_or_expired_is_rejected() {
    let token = issue_token(Uuid::new_v4(), "a@b.c", "jwt-secret", 7).unwrap();
    assert!(matches!(decode_token(&token, "other-secret"), Err(AppError::Auth(_))));

    let expired = issue_token(Uuid::new_v4(), "a@b.c", "jwt-secret", -1).unwrap();
    assert!(matches!(decode_token(&expired, "jwt-secret"), Err(AppError::Auth(_))));
    assert!(matches!(decode_token("garbage", "jwt-secret"), Err(AppError::Auth(_))));
  }
}
