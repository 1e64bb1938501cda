// storefront/src/web/extractors.rs

//! Resolves the caller's `Session` from a bearer token or the `token` cookie.

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::Session;
use crate::services::auth_service;
use crate::state::AppState;

/// Name of the cookie set on register and login.
pub const TOKEN_COOKIE: &str = "token";

fn token_from_request(req: &HttpRequest) -> Option<String> {
  let bearer = req
    .headers()
    .get(header::AUTHORIZATION)
    .and_then(|value| value.to_str().ok())
    .and_then(|value| value.strip_prefix("Bearer "))
    .map(|token| token.trim().to_string())
    .filter(|token| !token.is_empty());

  bearer.or_else(|| {
    req
      .cookie(TOKEN_COOKIE)
      .map(|cookie| cookie.value().to_string())
      .filter(|token| !token.is_empty())
  })
}

impl FromRequest for Session {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let state = req.app_data::<web::Data<AppState>>().cloned();
    let token = token_from_request(req);
    let path = req.path().to_string();

    Box::pin(async move {
      let state = state.ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))?;
      let Some(token) = token else {
        warn!(%path, "Request without a token.");
        return Err(AppError::Auth("Not authorized, no token".to_string()));
      };

      let claims = auth_service::decode_token(&token, &state.config.jwt_secret)?;
      let user_id =
        Uuid::parse_str(&claims.sub).map_err(|_| AppError::Auth("Not authorized, token failed".to_string()))?;

      match state.users.find(user_id).await? {
        Some(user) => Ok(Session::from(&user)),
        None => {
          warn!(%user_id, "Token subject no longer exists.");
          Err(AppError::Auth("Not authorized, user not found".to_string()))
        }
      }
    })
  }
}
