// storefront/src/pipelines/signin_pipeline.rs

use crate::errors::{AppError, Result as AppResult};
use crate::pipelines::contexts::SigninCtxData;
use crate::services::auth_service;
use flow::{ContextData, Pipeline, PipelineControl, Registry};
use tracing::{event, instrument, warn, Level};
use validator::Validate;

const BAD_CREDENTIALS: &str = "Invalid email or password";

/// Registers the user sign-in pipeline with the registry.
pub fn register_signin_pipeline(registry: &Registry<AppError>) {
  let mut signin_p = Pipeline::<SigninCtxData, AppError>::new(&[
    ("validate_signin_input", false, None),
    ("fetch_user_by_email_signin", false, None),
    ("verify_user_password_signin", false, None),
    ("issue_session_token_signin", false, None),
  ]);

  signin_p.on("validate_signin_input", |ctx_data: ContextData<SigninCtxData>| async move {
    ctx_data.update(|data| data.input.email = data.input.email.trim().to_lowercase());
    ctx_data.with(|data| data.input.validate())?;
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  signin_p.on("fetch_user_by_email_signin", |ctx_data: ContextData<SigninCtxData>| async move {
    let (email_val, users) = ctx_data.with(|data| (data.input.email.clone(), data.app_state.users.clone()));

    event!(Level::DEBUG, email = %email_val, "Fetching user by email for signin.");
    match users.find_by_email(&email_val).await? {
      Some(user) => {
        event!(Level::INFO, user_id = %user.id, "User found for signin.");
        ctx_data.update(|data| data.user = Some(user));
        Ok::<_, AppError>(PipelineControl::Continue)
      }
      None => {
        warn!("User not found for email during signin: {}", email_val);
        Err(AppError::Auth(BAD_CREDENTIALS.to_string()))
      }
    }
  });

  signin_p.on("verify_user_password_signin", verify_user_password_signin);

  signin_p.on("issue_session_token_signin", |ctx_data: ContextData<SigninCtxData>| async move {
    let (user, config) = ctx_data.with(|data| (data.user.clone(), data.app_state.config.clone()));
    let user = user.ok_or_else(|| AppError::Internal("User must be resolved before issuing a token.".to_string()))?;

    let token = auth_service::issue_token(user.id, &user.email, &config.jwt_secret, config.jwt_ttl_days)?;
    event!(Level::INFO, user_id = %user.id, "Session token issued.");
    ctx_data.update(|data| data.token = Some(token));
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  registry.register(signin_p);
  tracing::info!("Sign-in pipeline registered.");
}

#[instrument(name = "signin_step::verify_user_password", skip_all, err(Display))]
async fn verify_user_password_signin(ctx_data: ContextData<SigninCtxData>) -> AppResult<PipelineControl> {
  let (stored_hash, password_val, user_id) = ctx_data.with(|data| {
    (
      data.user.as_ref().map(|u| u.password_hash.clone()),
      data.input.password.clone(),
      data.user.as_ref().map(|u| u.id),
    )
  });
  let stored_hash = stored_hash.ok_or_else(|| {
    AppError::Internal("Password hash unexpectedly missing for verification.".to_string())
  })?;

  if auth_service::verify_password(&stored_hash, &password_val)? {
    event!(Level::INFO, user_id = ?user_id, "Password verified successfully for signin.");
    Ok(PipelineControl::Continue)
  } else {
    warn!("Password mismatch for user_id (signin): {:?}", user_id);
    Err(AppError::Auth(BAD_CREDENTIALS.to_string()))
  }
}
