// storefront/src/web/handlers/auth_handlers.rs

use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::models::{AuthenticatedUser, Session, UserProfile};
use crate::pipelines::contexts::{LoginInput, RegisterInput};
use crate::services::account_service;
use crate::state::AppState;
use crate::web::extractors::TOKEN_COOKIE;

fn session_cookie(token: &str, ttl_days: i64) -> Cookie<'static> {
  Cookie::build(TOKEN_COOKIE, token.to_string())
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .max_age(CookieDuration::days(ttl_days))
    .finish()
}

fn with_session_cookie(mut response: HttpResponse, authenticated: &AuthenticatedUser, ttl_days: i64) -> HttpResponse {
  // The body still carries the token if the cookie cannot be set.
  if let Err(e) = response.add_cookie(&session_cookie(&authenticated.token, ttl_days)) {
    tracing::warn!(error = %e, "Failed to attach session cookie.");
  }
  response
}

#[instrument(name = "handler::register", skip(app_state, payload), fields(req_email = %payload.email))]
pub async fn register_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<RegisterInput>,
) -> Result<HttpResponse, AppError> {
  let authenticated = account_service::register(app_state.get_ref(), payload.into_inner()).await?;
  info!(user_id = %authenticated.profile.id, "User registered.");
  let response = HttpResponse::Created().json(&authenticated);
  Ok(with_session_cookie(response, &authenticated, app_state.config.jwt_ttl_days))
}

#[instrument(name = "handler::login", skip(app_state, payload), fields(req_email = %payload.email))]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<LoginInput>,
) -> Result<HttpResponse, AppError> {
  let authenticated = account_service::login(app_state.get_ref(), payload.into_inner()).await?;
  let response = HttpResponse::Ok().json(&authenticated);
  Ok(with_session_cookie(response, &authenticated, app_state.config.jwt_ttl_days))
}

pub async fn logout_handler() -> HttpResponse {
  let mut removal = Cookie::build(TOKEN_COOKIE, "").path("/").http_only(true).finish();
  removal.make_removal();
  HttpResponse::Ok().cookie(removal).json(json!({ "message": "Logged out" }))
}

#[instrument(name = "handler::profile", skip_all, fields(user_id = %session.user_id))]
pub async fn profile_handler(session: Session) -> Result<HttpResponse, AppError> {
  Ok(HttpResponse::Ok().json(UserProfile {
    id: session.user_id,
    name: session.name,
    email: session.email,
    is_admin: session.is_admin,
  }))
}
