// storefront/src/pipelines/signup_pipeline.rs

use crate::errors::{AppError, Result as AppResult};
use crate::pipelines::contexts::SignupCtxData;
use crate::services::auth_service;
use flow::{ContextData, Pipeline, PipelineControl, Registry};
use tracing::{event, info, instrument, warn, Level};
use validator::Validate;

/// Registers the user sign-up pipeline with the registry.
pub fn register_signup_pipeline(registry: &Registry<AppError>) {
  let mut signup_p = Pipeline::<SignupCtxData, AppError>::new(&[
    ("validate_signup_input", false, None),
    ("check_existing_user_signup", false, None),
    ("create_user_in_db", false, None),
    ("issue_session_token_signup", false, None),
  ]);

  signup_p.on("validate_signup_input", |ctx_data: ContextData<SignupCtxData>| async move {
    ctx_data.update(|data| {
      data.input.email = data.input.email.trim().to_lowercase();
      data.input.name = data.input.name.trim().to_string();
    });
    ctx_data.with(|data| data.input.validate())?;
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  signup_p.on("check_existing_user_signup", |ctx_data: ContextData<SignupCtxData>| async move {
    let (email_val, users) = ctx_data.with(|data| (data.input.email.clone(), data.app_state.users.clone()));

    event!(Level::DEBUG, email = %email_val, "Checking if user email already exists.");
    if users.find_by_email(&email_val).await?.is_some() {
      warn!("Attempt to signup with existing email: {}", email_val);
      return Err(AppError::Validation("User already exists".to_string()));
    }
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  signup_p.on("create_user_in_db", create_user_in_db);

  signup_p.on("issue_session_token_signup", |ctx_data: ContextData<SignupCtxData>| async move {
    let (user, config) = ctx_data.with(|data| (data.user.clone(), data.app_state.config.clone()));
    let user = user.ok_or_else(|| AppError::Internal("User must exist before issuing a token.".to_string()))?;

    let token = auth_service::issue_token(user.id, &user.email, &config.jwt_secret, config.jwt_ttl_days)?;
    ctx_data.update(|data| data.token = Some(token));
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  registry.register(signup_p);
  tracing::info!("Sign-up pipeline registered.");
}

#[instrument(name = "signup_step::create_user_in_db", skip_all, err(Display))]
async fn create_user_in_db(ctx_data: ContextData<SignupCtxData>) -> AppResult<PipelineControl> {
  let (input, users) = ctx_data.with(|data| (data.input.clone(), data.app_state.users.clone()));

  let hashed_password = auth_service::hash_password(&input.password)?;
  let new_user = users
    .create(&input.name, &input.email, &hashed_password, input.is_admin)
    .await?;

  info!("User created successfully: ID={}, Email={}", new_user.id, new_user.email);
  ctx_data.update(|data| data.user = Some(new_user));
  Ok(PipelineControl::Continue)
}
